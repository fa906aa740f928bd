use serde::Serialize;
use tracing::debug;

use crate::task::{Priority, Task};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityGroups {
    pub high: Vec<Task>,
    pub medium: Vec<Task>,
    pub low: Vec<Task>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityGroups {
    pub fn tier(&self, priority: Priority) -> &[Task] {
        match priority {
            Priority::High => &self.high,
            Priority::Medium => &self.medium,
            Priority::Low => &self.low,
        }
    }

    pub fn counts(&self) -> PriorityCounts {
        PriorityCounts {
            high: self.high.len(),
            medium: self.medium.len(),
            low: self.low.len(),
        }
    }
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Groups active tasks into priority columns, input order kept.
///
/// Only completed tasks are dropped here. Titleless tasks stay in their
/// column; hiding them is up to the view.
#[tracing::instrument(skip(tasks), fields(count = tasks.len()))]
pub fn group_by_priority(tasks: &[Task]) -> PriorityGroups {
    let mut groups = PriorityGroups::default();

    for task in tasks.iter().filter(|task| task.is_active()) {
        let column = match task.priority_tier() {
            Priority::High => &mut groups.high,
            Priority::Medium => &mut groups.medium,
            Priority::Low => &mut groups.low,
        };
        column.push(task.clone());
    }

    debug!(counts = ?groups.counts(), "grouped tasks by priority");
    groups
}
