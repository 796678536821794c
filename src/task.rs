use chrono::NaiveDateTime;
use std::fmt;
use uuid::Uuid;

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub due_at: NaiveDateTime,
    pub completed: bool,
}

impl Task {
    pub fn new(description: String, due_at: NaiveDateTime) -> Self {
        Self {
            id: TaskId::new(),
            description,
            due_at,
            completed: false,
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Completed"
        } else {
            "Pending"
        }
    }

    /// Line shown on the Display Tasks screen.
    pub fn display_line(&self) -> String {
        format!(
            "{} - {} - {}",
            self.description,
            self.due_at.format(DISPLAY_FORMAT),
            self.status_label()
        )
    }
}
