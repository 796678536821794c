use thiserror::Error;

use crate::due::TimeFormat;
use crate::task::TaskId;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Invalid date/time format. Please use {}.", .0.pattern())]
    InvalidDueFormat(TimeFormat),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Reminder receiver has gone away")]
    NotifierClosed,
}

pub type Result<T> = std::result::Result<T, TaskError>;
