use crate::edit_session::EditSession;
use crate::error::AppError;
use crate::model::{Task, TaskDraft, TaskId};
use crate::task_list::TaskList;
use log::{debug, info};

/// Everything one run of the editor holds: the list, the add form and the
/// edit form. The two forms never share scratch state.
#[derive(Debug, Default, Clone)]
pub struct Session {
    list: TaskList,
    add_form: TaskDraft,
    edit: Option<EditSession>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.list.tasks()
    }

    pub fn task(&self, id: TaskId) -> Result<&Task, AppError> {
        self.list.get(id).ok_or_else(|| AppError::task_not_found(id))
    }

    pub fn add_form(&self) -> &TaskDraft {
        &self.add_form
    }

    pub fn add_form_mut(&mut self) -> &mut TaskDraft {
        &mut self.add_form
    }

    /// Adds the add-form draft as a task and clears the form.
    ///
    /// A blank draft text leaves both the list and the form untouched.
    pub fn submit_new_task(&mut self) -> Option<Task> {
        let title = self.add_form.title_value();
        let expires_at = self.add_form.expires_at_value();
        let task = self
            .list
            .add(&self.add_form.text, title.as_deref(), expires_at.as_deref())?;
        self.add_form.clear();
        info!("event=task_created module=session status=ok id={}", task.id);
        Some(task)
    }

    pub fn add_task(
        &mut self,
        text: &str,
        title: Option<&str>,
        expires_at: Option<&str>,
    ) -> Option<Task> {
        self.add_form = TaskDraft {
            text: text.to_string(),
            title: title.unwrap_or_default().to_string(),
            expires_at: expires_at.unwrap_or_default().to_string(),
        };
        self.submit_new_task()
    }

    pub fn delete(&mut self, id: TaskId) -> Result<Task, AppError> {
        let removed = self.list.delete(id)?;
        if self.edit.as_ref().map(EditSession::target) == Some(id) {
            self.edit = None;
            debug!("event=edit_discarded module=session reason=target_deleted id={id}");
        }
        info!("event=task_deleted module=session status=ok id={id}");
        Ok(removed)
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Task, AppError> {
        let task = self.list.toggle_complete(id)?;
        info!(
            "event=task_toggled module=session status=ok id={} completed={}",
            id, task.completed
        );
        Ok(task)
    }

    /// Opens an edit form for `id`, replacing any form that was open.
    pub fn open_edit(&mut self, id: TaskId) -> Result<&EditSession, AppError> {
        let session = EditSession::open(&self.list, id)?;
        debug!("event=edit_opened module=session id={id}");
        Ok(&*self.edit.insert(session))
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn edit_session_mut(&mut self) -> Option<&mut EditSession> {
        self.edit.as_mut()
    }

    pub fn close_edit(&mut self) -> Option<EditSession> {
        self.edit.take()
    }

    /// Saves the open edit form. The form closes only when the save applied.
    pub fn save_edit(&mut self) -> Result<Option<Task>, AppError> {
        let session = self
            .edit
            .as_ref()
            .ok_or_else(|| AppError::invalid_input("no edit in progress"))?;

        let saved = match session.save(&mut self.list) {
            Ok(saved) => saved,
            Err(err) => {
                self.edit = None;
                return Err(err);
            }
        };

        if let Some(task) = saved.as_ref() {
            self.edit = None;
            info!("event=task_edited module=session status=ok id={}", task.id);
        }

        Ok(saved)
    }
}
