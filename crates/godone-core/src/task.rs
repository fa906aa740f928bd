use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::deadline::{DateKey, parse_deadline};

pub type TaskId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("high") {
            Some(Self::High)
        } else if raw.eq_ignore_ascii_case("medium") {
            Some(Self::Medium)
        } else if raw.eq_ignore_ascii_case("low") {
            Some(Self::Low)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// 0 for high; used for stable priority-first ordering.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("pending") {
            Some(Self::Pending)
        } else if raw.eq_ignore_ascii_case("completed") {
            Some(Self::Completed)
        } else {
            None
        }
    }
}

/// A task as delivered by the backend's `/tasks` endpoint.
///
/// Deserialization never fails on a field's content: wrongly typed or
/// unrecognized values fall back to defaults so one dirty record cannot
/// take a whole view down.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "TaskRecord")]
pub struct Task {
    #[serde(rename = "task_id")]
    pub id: TaskId,

    pub category_id: Option<String>,

    pub category_name: Option<String>,

    pub title: String,

    pub description: String,

    pub deadline: Option<String>,

    pub priority: Option<Priority>,

    pub status: Status,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category_id: None,
            category_name: None,
            title: title.into(),
            description: String::new(),
            deadline: None,
            priority: None,
            status: Status::Pending,
        }
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status != Status::Completed
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Active and titled: the pre-filter shared by the calendar and the
    /// dashboard.
    pub fn is_visible(&self) -> bool {
        self.is_active() && self.has_title()
    }

    pub fn priority_tier(&self) -> Priority {
        self.priority.unwrap_or(Priority::Low)
    }

    pub fn deadline_key(&self) -> Option<DateKey> {
        parse_deadline(self.deadline.as_deref())
    }

    pub fn category_label(&self) -> &str {
        self.category_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("-")
    }
}

#[derive(Debug, Default, Deserialize)]
struct TaskRecord {
    #[serde(default, alias = "id")]
    task_id: Value,
    #[serde(default)]
    category_id: Value,
    #[serde(default)]
    category_name: Value,
    #[serde(default)]
    title: Value,
    #[serde(default)]
    description: Value,
    #[serde(default)]
    deadline: Value,
    #[serde(default)]
    priority: Value,
    #[serde(default)]
    status: Value,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: scalar_text(record.task_id).unwrap_or_default(),
            category_id: scalar_text(record.category_id),
            category_name: scalar_text(record.category_name),
            title: scalar_text(record.title).unwrap_or_default(),
            description: scalar_text(record.description).unwrap_or_default(),
            deadline: scalar_text(record.deadline),
            priority: scalar_text(record.priority)
                .as_deref()
                .and_then(Priority::parse),
            status: scalar_text(record.status)
                .as_deref()
                .and_then(Status::parse)
                .unwrap_or_default(),
        }
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}
