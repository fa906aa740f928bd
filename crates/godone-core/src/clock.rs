use chrono::{
  DateTime,
  Timelike,
  Utc
};
use chrono_tz::Tz;

use crate::deadline::DateKey;

/// The calendar day `now` falls on in
/// `timezone`.
#[must_use]
pub fn today_in_timezone(
  now: DateTime<Utc>,
  timezone: Tz
) -> DateKey {
  DateKey::from_naive(
    now
      .with_timezone(&timezone)
      .date_naive()
  )
}

#[must_use]
pub fn local_hour(
  now: DateTime<Utc>,
  timezone: Tz
) -> u32 {
  now.with_timezone(&timezone).hour()
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeZone,
    Utc
  };

  use super::{
    local_hour,
    today_in_timezone
  };
  use crate::deadline::DateKey;

  #[test]
  fn day_follows_the_zone_not_utc() {
    // 18:30 UTC is already the next day
    // in Jakarta (UTC+7).
    let now = Utc
      .with_ymd_and_hms(
        2025, 11, 27, 18, 30, 0
      )
      .single()
      .expect("valid now");

    assert_eq!(
      today_in_timezone(
        now,
        chrono_tz::Asia::Jakarta
      ),
      DateKey::new(2025, 11, 28)
        .expect("valid date")
    );
    assert_eq!(
      today_in_timezone(
        now,
        chrono_tz::UTC
      ),
      DateKey::new(2025, 11, 27)
        .expect("valid date")
    );
    assert_eq!(
      local_hour(
        now,
        chrono_tz::Asia::Jakarta
      ),
      1
    );
  }
}
