//! Task model
//!
//! A to-do item attached to a closing. Tasks are addressed by their position
//! in the owning transaction's list.

use serde::{Deserialize, Serialize};

/// A closing task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// What needs doing
    pub description: String,

    /// Due date (free-form text, never parsed)
    pub due_date: String,

    /// Whether the task has been completed
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a new, incomplete task
    pub fn new(description: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            due_date: due_date.into(),
            completed: false,
        }
    }

    /// Mark the task as completed. Completing twice is a no-op.
    pub fn complete(&mut self) {
        self.completed = true;
    }
}
