use serde::Serialize;
use tracing::debug;

use crate::deadline::{
  DateKey,
  days_between,
  month_abbrev
};
use crate::task::Task;

pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum RelativeBucket {
  Overdue,
  Today,
  Upcoming,
  Future
}

impl RelativeBucket {
  #[must_use]
  pub fn from_offset(
    day_offset: i64
  ) -> Self {
    match day_offset {
      | offset if offset < 0 => {
        Self::Overdue
      }
      | 0 => Self::Today,
      | 1..=UPCOMING_WINDOW_DAYS => {
        Self::Upcoming
      }
      | _ => Self::Future
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  PartialEq,
  Eq,
)]
pub struct Classification {
  pub bucket:     Option<RelativeBucket>,
  pub day_offset: Option<i64>,
  pub label:      String
}

/// Places a deadline relative to `today`.
///
/// A dateless task gets neither bucket nor
/// offset; it is never treated as due today
/// or overdue.
#[must_use]
pub fn classify(
  deadline: Option<DateKey>,
  today: DateKey
) -> Classification {
  let label =
    deadline_label(deadline, today);
  let Some(deadline) = deadline else {
    return Classification {
      bucket: None,
      day_offset: None,
      label
    };
  };

  let day_offset =
    days_between(today, deadline);
  Classification {
    bucket: Some(
      RelativeBucket::from_offset(
        day_offset
      )
    ),
    day_offset: Some(day_offset),
    label
  }
}

#[must_use]
pub fn deadline_label(
  deadline: Option<DateKey>,
  today: DateKey
) -> String {
  let Some(deadline) = deadline else {
    return "No deadline".to_string();
  };

  match days_between(today, deadline) {
    | -1 => "1 day overdue".to_string(),
    | offset if offset < 0 => {
      format!(
        "{} days overdue",
        offset.unsigned_abs()
      )
    }
    | 0 => "Today".to_string(),
    | 1 => "Tomorrow".to_string(),
    | offset
      if offset
        <= UPCOMING_WINDOW_DAYS =>
    {
      format!("{offset} days left")
    }
    | _ => short_date_label(
      deadline, today
    )
  }
}

fn short_date_label(
  deadline: DateKey,
  today: DateKey
) -> String {
  let base = format!(
    "{} {}",
    month_abbrev(deadline.month()),
    deadline.day()
  );
  if deadline.year() == today.year() {
    base
  } else {
    format!(
      "{base}, {}",
      deadline.year()
    )
  }
}

/// Stable deadline-ascending order, dateless
/// tasks last.
#[tracing::instrument(skip(tasks), fields(count = tasks.len()))]
pub fn order_by_deadline(
  tasks: &[Task],
  today: DateKey
) -> Vec<Task> {
  let mut keyed = tasks
    .iter()
    .map(|task| {
      let offset = task
        .deadline_key()
        .map(|key| {
          days_between(today, key)
        });
      (offset.is_none(), offset, task)
    })
    .collect::<Vec<_>>();

  keyed.sort_by_key(
    |(dateless, offset, _)| {
      (*dateless, *offset)
    }
  );

  debug!(
    dateless = keyed
      .iter()
      .filter(|(dateless, _, _)| {
        *dateless
      })
      .count(),
    "ordered tasks by deadline"
  );

  keyed
    .into_iter()
    .map(|(_, _, task)| task.clone())
    .collect()
}
