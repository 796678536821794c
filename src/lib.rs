//! Task Monitor - terminal task tracker with due-time reminders

pub mod cli;
pub mod config;
pub mod due;
pub mod error;
pub mod reminder;
pub mod task;
pub mod task_store;
pub mod ui;

pub use due::{DueInput, Meridiem, TimeFormat};
pub use error::{Result, TaskError};
pub use reminder::{ChannelNotifier, Notifier, Reminder, ReminderKind, ReminderMonitor};
pub use task::{Task, TaskId};
pub use task_store::{SharedStore, TaskStore};
