use serde::Serialize;
use tracing::debug;

use crate::deadline::{
  DateKey,
  days_in_month,
  month_name
};
use crate::error::{
  EngineError,
  Result
};
use crate::task::{
  Priority,
  Task
};

pub const WEEKDAY_LABELS: [&str; 7] = [
  "Sun", "Mon", "Tue", "Wed", "Thu",
  "Fri", "Sat"
];

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
)]
pub struct MonthKey {
  year:  i32,
  month: u32
}

impl MonthKey {
  pub fn new(
    year: i32,
    month: u32
  ) -> Result<Self> {
    if !(1..=12).contains(&month) {
      return Err(
        EngineError::MonthOutOfRange(
          month
        )
      );
    }
    Ok(Self { year, month })
  }

  #[must_use]
  pub fn from_date(
    date: DateKey
  ) -> Self {
    Self {
      year:  date.year(),
      month: date.month()
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

  /// Moves by whole months; negative
  /// values go back.
  #[must_use]
  pub fn shift(self, months: i32) -> Self {
    let index = i64::from(self.year) * 12
      + i64::from(self.month)
      - 1
      + i64::from(months);
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) + 1;

    Self {
      year:  i32::try_from(year)
        .unwrap_or(self.year),
      month: u32::try_from(month)
        .unwrap_or(self.month)
    }
  }

  #[must_use]
  pub fn days(self) -> u32 {
    days_in_month(self.year, self.month)
  }

  #[must_use]
  pub fn first_day(self) -> DateKey {
    DateKey::from_parts_unchecked(
      self.year, self.month, 1
    )
  }

  /// Blank cells before day 1 in a
  /// Sunday-first grid.
  #[must_use]
  pub fn leading_blanks(self) -> u32 {
    self.first_day().weekday_from_sunday()
  }

  #[must_use]
  pub fn title(self) -> String {
    format!(
      "{} {}",
      month_name(self.month),
      self.year
    )
  }

  #[must_use]
  pub fn contains(
    self,
    date: DateKey
  ) -> bool {
    date.year() == self.year
      && date.month() == self.month
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  PartialEq,
  Eq,
)]
pub struct CalendarCell {
  pub day:        u32,
  pub date:       DateKey,
  pub tasks:      Vec<Task>,
  pub has_high:   bool,
  pub has_medium: bool,
  pub has_low:    bool
}

impl CalendarCell {
  fn empty(date: DateKey) -> Self {
    Self {
      day: date.day(),
      date,
      tasks: Vec::new(),
      has_high: false,
      has_medium: false,
      has_low: false
    }
  }

  fn push(&mut self, task: &Task) {
    match task.priority_tier() {
      | Priority::High => {
        self.has_high = true;
      }
      | Priority::Medium => {
        self.has_medium = true;
      }
      | Priority::Low => {
        self.has_low = true;
      }
    }
    self.tasks.push(task.clone());
  }

  #[must_use]
  pub fn has_priority(
    &self,
    priority: Priority
  ) -> bool {
    match priority {
      | Priority::High => self.has_high,
      | Priority::Medium => {
        self.has_medium
      }
      | Priority::Low => self.has_low
    }
  }

  /// Highest tier present in the cell.
  #[must_use]
  pub fn top_priority(
    &self
  ) -> Option<Priority> {
    Priority::ALL.into_iter().find(
      |priority| {
        self.has_priority(*priority)
      }
    )
  }

  /// Cell tasks high first, input order
  /// kept within a tier.
  #[must_use]
  pub fn tasks_by_priority(
    &self
  ) -> Vec<&Task> {
    let mut ordered =
      self.tasks.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|task| {
      task.priority_tier().rank()
    });
    ordered
  }
}

/// Bins visible tasks into the day cells of
/// one month.
///
/// The result starts with `None` padding for
/// the weekdays before day 1 (Sunday-first)
/// followed by one cell per day.
#[tracing::instrument(skip(tasks), fields(count = tasks.len()))]
pub fn bin_by_month(
  tasks: &[Task],
  year: i32,
  month: u32
) -> Result<Vec<Option<CalendarCell>>> {
  let month_key =
    MonthKey::new(year, month)?;
  let blanks =
    month_key.leading_blanks() as usize;

  let mut cells = (1..=month_key.days())
    .map(|day| {
      CalendarCell::empty(
        DateKey::from_parts_unchecked(
          year, month, day
        )
      )
    })
    .collect::<Vec<_>>();

  let mut placed = 0_usize;
  for task in
    tasks.iter().filter(|task| {
      task.is_visible()
    })
  {
    let Some(deadline) =
      task.deadline_key()
    else {
      continue;
    };
    if !month_key.contains(deadline) {
      continue;
    }
    if let Some(cell) = cells
      .get_mut(deadline.day() as usize - 1)
    {
      cell.push(task);
      placed += 1;
    }
  }

  debug!(
    month = %month_key.title(),
    placed,
    "binned tasks into calendar"
  );

  let mut grid =
    Vec::with_capacity(blanks + cells.len());
  grid.extend(
    std::iter::repeat_n(None, blanks)
  );
  grid.extend(cells.into_iter().map(Some));
  Ok(grid)
}
