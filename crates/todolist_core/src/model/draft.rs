use crate::model::Task;
use serde::Serialize;

/// Raw form contents that have not been applied to a task yet.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    pub text: String,
    pub title: String,
    pub expires_at: String,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            text: task.text.clone(),
            title: task.title.clone().unwrap_or_default(),
            expires_at: task.expires_at.clone().unwrap_or_default(),
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn title_value(&self) -> Option<String> {
        optional_field(&self.title)
    }

    pub fn expires_at_value(&self) -> Option<String> {
        optional_field(&self.expires_at)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.title.clear();
        self.expires_at.clear();
    }
}

/// An empty form value means "not set". Whitespace is kept as typed.
pub fn optional_field(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskDraft, optional_field};
    use crate::model::{Task, TaskId};
    use time::macros::datetime;

    #[test]
    fn optional_field_drops_only_empty_values() {
        assert_eq!(optional_field(""), None);
        assert_eq!(optional_field("  \t"), Some("  \t".to_string()));
        assert_eq!(optional_field(" work "), Some(" work ".to_string()));
    }

    #[test]
    fn from_task_prefills_every_field() {
        let task = Task {
            id: TaskId::new(1),
            text: "Call bank".to_string(),
            title: Some("Errands".to_string()),
            expires_at: None,
            completed: true,
            created_at: datetime!(2025-12-20 0:00 UTC),
        };

        let draft = TaskDraft::from_task(&task);

        assert_eq!(draft.text, "Call bank");
        assert_eq!(draft.title, "Errands");
        assert_eq!(draft.expires_at, "");
        assert_eq!(draft.title_value(), Some("Errands".to_string()));
        assert_eq!(draft.expires_at_value(), None);
    }

    #[test]
    fn clear_resets_all_fields() {
        let mut draft = TaskDraft {
            text: "a".into(),
            title: "b".into(),
            expires_at: "c".into(),
        };
        assert!(draft.has_text());

        draft.clear();

        assert_eq!(draft, TaskDraft::default());
        assert!(!draft.has_text());
    }
}
