use crate::error::AppError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Stable identifier of a task within one list. Never reused after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed).trim();
        if digits.is_empty() {
            return Err(AppError::invalid_input("id is required"));
        }

        digits
            .parse::<u64>()
            .map(TaskId)
            .map_err(|_| AppError::invalid_input(format!("invalid task id '{trimmed}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub title: Option<String>,
    pub expires_at: Option<String>,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Task {
    pub fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskId, TaskStatus};
    use time::macros::datetime;

    fn sample(completed: bool) -> Task {
        Task {
            id: TaskId::new(7),
            text: "Buy milk".to_string(),
            title: None,
            expires_at: None,
            completed,
            created_at: datetime!(2025-12-20 0:00 UTC),
        }
    }

    #[test]
    fn task_id_parses_plain_and_hash_prefixed_values() {
        assert_eq!("3".parse::<TaskId>().unwrap(), TaskId::new(3));
        assert_eq!(" #12 ".parse::<TaskId>().unwrap(), TaskId::new(12));
    }

    #[test]
    fn task_id_rejects_blank_and_non_numeric_values() {
        let blank = "   ".parse::<TaskId>().unwrap_err();
        assert_eq!(blank.code(), "invalid_input");

        let word = "task-one".parse::<TaskId>().unwrap_err();
        assert_eq!(word.code(), "invalid_input");
        assert!(word.message().contains("task-one"));
    }

    #[test]
    fn task_id_displays_raw_value() {
        assert_eq!(TaskId::new(42).to_string(), "42");
    }

    #[test]
    fn status_follows_completed_flag() {
        assert_eq!(sample(false).status(), TaskStatus::Pending);
        assert_eq!(sample(true).status(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.label(), "completed");
    }

    #[test]
    fn task_serializes_id_as_number() {
        let value = serde_json::to_value(sample(false)).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["completed"], false);
        assert!(value["title"].is_null());
        assert_eq!(value["created_at"], "2025-12-20T00:00:00Z");
    }
}
