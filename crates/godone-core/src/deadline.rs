use std::fmt;
use std::str::FromStr;

use chrono::{
  Datelike,
  NaiveDate
};
use serde::Serialize;
use tracing::trace;

use crate::error::{
  EngineError,
  Result
};

const MONTH_NAMES: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December"
];

// Days from 0000-03-01 to 1970-01-01 in
// the proleptic Gregorian calendar.
const UNIX_EPOCH_DAY_OFFSET: i64 =
  719_468;

/// A calendar day with no time of day and
/// no timezone attached.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
)]
pub struct DateKey {
  year:  i32,
  month: u32,
  day:   u32
}

impl DateKey {
  pub fn new(
    year: i32,
    month: u32,
    day: u32
  ) -> Result<Self> {
    if !(1..=12).contains(&month)
      || day == 0
      || day > days_in_month(year, month)
    {
      return Err(
        EngineError::InvalidDate {
          year,
          month,
          day
        }
      );
    }

    Ok(Self {
      year,
      month,
      day
    })
  }

  // Callers have already checked the
  // month and the day range.
  pub(crate) fn from_parts_unchecked(
    year: i32,
    month: u32,
    day: u32
  ) -> Self {
    Self {
      year,
      month,
      day
    }
  }

  /// Boundary conversion for callers
  /// that derive "today" from a clock.
  #[must_use]
  pub fn from_naive(
    date: NaiveDate
  ) -> Self {
    Self {
      year:  date.year(),
      month: date.month(),
      day:   date.day()
    }
  }

  #[must_use]
  pub fn year(self) -> i32 {
    self.year
  }

  #[must_use]
  pub fn month(self) -> u32 {
    self.month
  }

  #[must_use]
  pub fn day(self) -> u32 {
    self.day
  }

  /// Days since 1970-01-01.
  #[must_use]
  pub fn day_number(self) -> i64 {
    let month = i64::from(self.month);
    let year = i64::from(self.year)
      - i64::from(self.month <= 2);
    let era = year.div_euclid(400);
    let year_of_era =
      year.rem_euclid(400);
    let shifted_month = (month + 9) % 12;
    let day_of_year = (153
      * shifted_month
      + 2)
      / 5
      + i64::from(self.day)
      - 1;
    let day_of_era = year_of_era * 365
      + year_of_era / 4
      - year_of_era / 100
      + day_of_year;

    era * 146_097 + day_of_era
      - UNIX_EPOCH_DAY_OFFSET
  }

  /// 0 = Sunday .. 6 = Saturday.
  #[must_use]
  pub fn weekday_from_sunday(
    self
  ) -> u32 {
    // 1970-01-01 was a Thursday.
    let idx = (self.day_number() + 4)
      .rem_euclid(7);
    u32::try_from(idx).unwrap_or(0)
  }
}

impl fmt::Display for DateKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{:04}-{:02}-{:02}",
      self.year, self.month, self.day
    )
  }
}

/// Extracts the calendar day from a raw
/// deadline string.
///
/// Anything from the first `T` onwards is
/// discarded. The rest must be exactly
/// three all-digit components separated by
/// `-` and must name a real day; otherwise
/// the task is dateless.
#[must_use]
pub fn parse_deadline(
  raw: Option<&str>
) -> Option<DateKey> {
  let trimmed = raw?.trim();
  let date_part = trimmed
    .split_once('T')
    .map_or(trimmed, |(date, _)| date);

  let mut parts = date_part.split('-');
  let (
    Some(year),
    Some(month),
    Some(day),
    None
  ) = (
    parts.next(),
    parts.next(),
    parts.next(),
    parts.next()
  )
  else {
    trace!(
      raw = trimmed,
      "deadline is not three components"
    );
    return None;
  };

  let key = DateKey::new(
    parse_component(year)?,
    parse_component(month)?,
    parse_component(day)?
  );

  match key {
    | Ok(key) => Some(key),
    | Err(err) => {
      trace!(
        raw = trimmed,
        error = %err,
        "deadline is not a calendar day"
      );
      None
    }
  }
}

fn parse_component<T: FromStr>(
  raw: &str
) -> Option<T> {
  if raw.is_empty()
    || !raw
      .bytes()
      .all(|b| b.is_ascii_digit())
  {
    return None;
  }
  raw.parse().ok()
}

/// Signed count of whole calendar days
/// from `from` to `to`.
#[must_use]
pub fn days_between(
  from: DateKey,
  to: DateKey
) -> i64 {
  to.day_number() - from.day_number()
}

#[must_use]
pub fn is_leap_year(year: i32) -> bool {
  (year % 4 == 0 && year % 100 != 0)
    || year % 400 == 0
}

#[must_use]
pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  match month {
    | 1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
    | 4 | 6 | 9 | 11 => 30,
    | 2 if is_leap_year(year) => 29,
    | 2 => 28,
    | _ => 0
  }
}

/// English month name for 1-12.
#[must_use]
pub fn month_name(
  month: u32
) -> &'static str {
  month
    .checked_sub(1)
    .and_then(|idx| {
      MONTH_NAMES.get(idx as usize)
    })
    .copied()
    .unwrap_or("")
}

#[must_use]
pub fn month_abbrev(
  month: u32
) -> &'static str {
  let name = month_name(month);
  name.get(..3).unwrap_or(name)
}
