pub mod config;
pub mod edit_session;
pub mod error;
pub mod logging;
pub mod model;
pub mod session;
pub mod task_list;

pub use edit_session::EditSession;
pub use error::AppError;
pub use model::{Task, TaskDraft, TaskId, TaskStatus};
pub use session::Session;
pub use task_list::TaskList;
