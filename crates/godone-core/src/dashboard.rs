use serde::Serialize;
use tracing::debug;

use crate::deadline::{DateKey, days_between};
use crate::relative::RelativeBucket;
use crate::task::Task;

pub const DEFAULT_UPCOMING_LIMIT: usize = 5;
pub const DEFAULT_OVERDUE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardLimits {
    pub upcoming: usize,
    pub overdue: usize,
}

impl Default for DashboardLimits {
    fn default() -> Self {
        Self {
            upcoming: DEFAULT_UPCOMING_LIMIT,
            overdue: DEFAULT_OVERDUE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardBuckets {
    pub upcoming: Vec<Task>,
    #[serde(rename = "today_list")]
    pub today: Vec<Task>,
    pub overdue: Vec<Task>,
}

impl DashboardBuckets {
    pub fn is_empty(&self) -> bool {
        self.upcoming.is_empty() && self.today.is_empty() && self.overdue.is_empty()
    }
}

/// Splits visible, dated tasks into the dashboard's overdue, today and
/// upcoming lists.
///
/// Due-today tasks are not part of `upcoming`. Both sorted lists are
/// ordered by day offset with input order on ties, then truncated to
/// `limits`. Tasks further out than the upcoming window are left out.
#[tracing::instrument(skip(tasks), fields(count = tasks.len()))]
pub fn bucket_for_dashboard(
    tasks: &[Task],
    today: DateKey,
    limits: DashboardLimits,
) -> DashboardBuckets {
    let mut upcoming: Vec<(i64, &Task)> = Vec::new();
    let mut due_today: Vec<&Task> = Vec::new();
    let mut overdue: Vec<(i64, &Task)> = Vec::new();

    for task in tasks.iter().filter(|task| task.is_visible()) {
        let Some(deadline) = task.deadline_key() else {
            continue;
        };
        let offset = days_between(today, deadline);
        match RelativeBucket::from_offset(offset) {
            RelativeBucket::Upcoming => upcoming.push((offset, task)),
            RelativeBucket::Today => due_today.push(task),
            RelativeBucket::Overdue => overdue.push((offset, task)),
            RelativeBucket::Future => {}
        }
    }

    // sort_by_key is stable, ties keep input order
    upcoming.sort_by_key(|(offset, _)| *offset);
    overdue.sort_by_key(|(offset, _)| *offset);

    debug!(
        upcoming = upcoming.len(),
        today = due_today.len(),
        overdue = overdue.len(),
        upcoming_limit = limits.upcoming,
        overdue_limit = limits.overdue,
        "bucketed dashboard tasks"
    );

    DashboardBuckets {
        upcoming: take_sorted(upcoming, limits.upcoming),
        today: due_today.into_iter().cloned().collect(),
        overdue: take_sorted(overdue, limits.overdue),
    }
}

fn take_sorted(entries: Vec<(i64, &Task)>, limit: usize) -> Vec<Task> {
    entries
        .into_iter()
        .take(limit)
        .map(|(_, task)| task.clone())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Greeting {
    pub fn text(self) -> &'static str {
        match self {
            Self::Morning => "Good Morning",
            Self::Afternoon => "Good Afternoon",
            Self::Evening => "Good Evening",
            Self::Night => "Good Night",
        }
    }
}

pub fn greeting_for_hour(hour: u32) -> Greeting {
    match hour {
        4..=10 => Greeting::Morning,
        11..=14 => Greeting::Afternoon,
        15..=18 => Greeting::Evening,
        _ => Greeting::Night,
    }
}

#[cfg(test)]
mod tests {
    use super::{DashboardLimits, Greeting, bucket_for_dashboard, greeting_for_hour};
    use crate::deadline::DateKey;
    use crate::task::{Status, Task};

    fn today() -> DateKey {
        DateKey::new(2025, 11, 28).expect("valid today")
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn upcoming_truncates_with_stable_ties() {
        // day offsets 1, 1, 2, 3, 4, 5, 6, 7 for t1..t8
        let deadlines = [
            "2025-11-29",
            "2025-11-29",
            "2025-11-30",
            "2025-12-01",
            "2025-12-02",
            "2025-12-03",
            "2025-12-04",
            "2025-12-05",
        ];
        let tasks = deadlines
            .iter()
            .enumerate()
            .map(|(idx, deadline)| Task::new(format!("t{}", idx + 1), "task").with_deadline(*deadline))
            .collect::<Vec<_>>();

        let buckets = bucket_for_dashboard(&tasks, today(), DashboardLimits::default());
        assert_eq!(ids(&buckets.upcoming), ["t1", "t2", "t3", "t4", "t5"]);
    }

    #[test]
    fn upcoming_sorts_shuffled_input() {
        let tasks = vec![
            Task::new("week", "week").with_deadline("2025-12-05"),
            Task::new("second", "second").with_deadline("2025-11-29"),
            Task::new("two", "two").with_deadline("2025-11-30"),
            Task::new("first", "first").with_deadline("2025-11-29"),
        ];

        let buckets = bucket_for_dashboard(&tasks, today(), DashboardLimits::default());
        assert_eq!(ids(&buckets.upcoming), ["second", "first", "two", "week"]);
    }

    #[test]
    fn today_is_not_upcoming() {
        let tasks = vec![
            Task::new("due", "due").with_deadline("2025-11-28"),
            Task::new("soon", "soon").with_deadline("2025-11-29"),
        ];

        let buckets = bucket_for_dashboard(&tasks, today(), DashboardLimits::default());
        assert_eq!(ids(&buckets.today), ["due"]);
        assert_eq!(ids(&buckets.upcoming), ["soon"]);
        assert!(buckets.overdue.is_empty());
    }

    #[test]
    fn overdue_lists_most_overdue_first() {
        let tasks = vec![
            Task::new("a", "a").with_deadline("2025-11-27"),
            Task::new("b", "b").with_deadline("2025-10-01"),
            Task::new("c", "c").with_deadline("2025-11-20"),
            Task::new("d", "d").with_deadline("2025-10-01"),
        ];

        let limits = DashboardLimits {
            upcoming: 5,
            overdue: 3,
        };
        let buckets = bucket_for_dashboard(&tasks, today(), limits);
        assert_eq!(ids(&buckets.overdue), ["b", "d", "c"]);
    }

    #[test]
    fn excluded_tasks_never_appear() {
        let tasks = vec![
            Task::new("done", "done")
                .with_deadline("2025-11-28")
                .with_status(Status::Completed),
            Task::new("untitled", " ").with_deadline("2025-11-27"),
            Task::new("broken", "broken").with_deadline("not-a-date"),
            Task::new("dateless", "dateless"),
            Task::new("far", "far").with_deadline("2026-03-01"),
        ];

        let buckets = bucket_for_dashboard(&tasks, today(), DashboardLimits::default());
        assert!(buckets.is_empty());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let tasks = vec![
            Task::new("a", "a").with_deadline("2025-11-29"),
            Task::new("b", "b").with_deadline("2025-11-26"),
            Task::new("c", "c").with_deadline("2025-11-28"),
        ];

        let first = bucket_for_dashboard(&tasks, today(), DashboardLimits::default());
        let second = bucket_for_dashboard(&tasks, today(), DashboardLimits::default());
        assert_eq!(first, second);
    }

    #[test]
    fn greeting_follows_hour_of_day() {
        assert_eq!(greeting_for_hour(3), Greeting::Night);
        assert_eq!(greeting_for_hour(4), Greeting::Morning);
        assert_eq!(greeting_for_hour(11), Greeting::Afternoon);
        assert_eq!(greeting_for_hour(15), Greeting::Evening);
        assert_eq!(greeting_for_hour(19), Greeting::Night);
        assert_eq!(Greeting::Evening.text(), "Good Evening");
    }
}
