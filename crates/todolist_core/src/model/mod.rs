mod draft;
mod task;

pub use draft::{TaskDraft, optional_field};
pub use task::{Task, TaskId, TaskStatus};
