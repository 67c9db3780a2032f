use crate::error::AppError;
use crate::model::{Task, TaskId, optional_field};
use indexmap::IndexMap;
use log::debug;
use time::{OffsetDateTime, UtcOffset};

/// Ordered, id-addressed owner of every task in a session.
///
/// Tasks keep insertion order. Removing a task shifts the positions of the
/// tasks after it down by one, but never changes any task's [`TaskId`], so an
/// id held by the caller can only ever address the task it was issued for.
#[derive(Debug, Clone)]
pub struct TaskList {
    tasks: IndexMap<TaskId, Task>,
    next_id: u64,
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self {
            tasks: IndexMap::new(),
            next_id: 1,
        }
    }

    /// Appends a new pending task.
    ///
    /// Returns `None` without touching the list when `text` is blank.
    pub fn add(
        &mut self,
        text: &str,
        title: Option<&str>,
        expires_at: Option<&str>,
    ) -> Option<Task> {
        if text.trim().is_empty() {
            debug!("event=task_add module=task_list status=skipped reason=blank_text");
            return None;
        }

        let id = TaskId::new(self.next_id);
        self.next_id += 1;

        let task = Task {
            id,
            text: text.to_string(),
            title: title.and_then(optional_field),
            expires_at: expires_at.and_then(optional_field),
            completed: false,
            created_at: now_local(),
        };
        self.tasks.insert(id, task.clone());
        debug!(
            "event=task_add module=task_list status=ok id={} len={}",
            id,
            self.tasks.len()
        );

        Some(task)
    }

    pub fn delete(&mut self, id: TaskId) -> Result<Task, AppError> {
        let removed = self
            .tasks
            .shift_remove(&id)
            .ok_or_else(|| AppError::task_not_found(id))?;
        debug!(
            "event=task_delete module=task_list status=ok id={} len={}",
            id,
            self.tasks.len()
        );
        Ok(removed)
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Task, AppError> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or_else(|| AppError::task_not_found(id))?;
        task.completed = !task.completed;
        debug!(
            "event=task_toggle module=task_list status=ok id={} completed={}",
            id, task.completed
        );
        Ok(task.clone())
    }

    /// Overwrites text, title and expiration of a task in one step.
    ///
    /// `None` clears an optional field. A blank `text` leaves the task as it
    /// was and yields `Ok(None)`.
    pub fn edit(
        &mut self,
        id: TaskId,
        text: &str,
        title: Option<&str>,
        expires_at: Option<&str>,
    ) -> Result<Option<Task>, AppError> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or_else(|| AppError::task_not_found(id))?;

        if text.trim().is_empty() {
            debug!(
                "event=task_edit module=task_list status=skipped reason=blank_text id={}",
                id
            );
            return Ok(None);
        }

        task.text = text.to_string();
        task.title = title.and_then(optional_field);
        task.expires_at = expires_at.and_then(optional_field);
        debug!("event=task_edit module=task_list status=ok id={}", id);

        Ok(Some(task.clone()))
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.get_index_of(&id)
    }

    pub fn id_at(&self, position: usize) -> Option<TaskId> {
        self.tasks.get_index(position).map(|(id, _)| *id)
    }

    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.values().filter(|task| task.completed).count()
    }

    pub fn pending_count(&self) -> usize {
        self.len() - self.completed_count()
    }
}

fn now_local() -> OffsetDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset)
}
