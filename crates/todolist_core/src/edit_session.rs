use crate::error::AppError;
use crate::model::{Task, TaskDraft, TaskId};
use crate::task_list::TaskList;

/// An in-progress edit of one task.
///
/// The draft starts as a copy of the task and is only written back by
/// [`EditSession::save`]. Dropping the session discards the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    target: TaskId,
    draft: TaskDraft,
}

impl EditSession {
    pub fn open(list: &TaskList, id: TaskId) -> Result<Self, AppError> {
        let task = list.get(id).ok_or_else(|| AppError::task_not_found(id))?;
        Ok(Self {
            target: id,
            draft: TaskDraft::from_task(task),
        })
    }

    pub fn target(&self) -> TaskId {
        self.target
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn set_text<S: Into<String>>(&mut self, value: S) {
        self.draft.text = value.into();
    }

    pub fn set_title<S: Into<String>>(&mut self, value: S) {
        self.draft.title = value.into();
    }

    pub fn set_expires_at<S: Into<String>>(&mut self, value: S) {
        self.draft.expires_at = value.into();
    }

    /// Writes the whole draft to the target task.
    ///
    /// `Ok(None)` means the draft text was blank and nothing was written.
    pub fn save(&self, list: &mut TaskList) -> Result<Option<Task>, AppError> {
        let title = self.draft.title_value();
        let expires_at = self.draft.expires_at_value();
        list.edit(
            self.target,
            &self.draft.text,
            title.as_deref(),
            expires_at.as_deref(),
        )
    }
}
