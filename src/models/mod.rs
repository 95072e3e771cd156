pub mod filter;
pub mod task;

pub use filter::Filter;
pub use task::{Category, Priority, Task, TaskDraft, TaskId, ValidationError};
