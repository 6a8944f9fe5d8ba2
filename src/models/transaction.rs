//! Transaction model
//!
//! Represents a real-estate closing: the property, the closing date, and the
//! ordered list of tasks that must happen before it.

use serde::{Deserialize, Serialize};

use super::ids::TransactionId;
use super::task::Task;
use crate::error::{ClosingError, ClosingResult};

/// A real-estate closing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Address of the property being sold
    pub property_address: String,

    /// Closing date (free-form text, never parsed)
    pub closing_date: String,

    /// Tasks in insertion order; the index is the task's address
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Transaction {
    /// Create a new transaction with a fresh id and no tasks
    pub fn new(property_address: impl Into<String>, closing_date: impl Into<String>) -> Self {
        Self::with_id(TransactionId::new(), property_address, closing_date)
    }

    /// Create a transaction with a known id
    pub fn with_id(
        id: TransactionId,
        property_address: impl Into<String>,
        closing_date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            property_address: property_address.into(),
            closing_date: closing_date.into(),
            tasks: Vec::new(),
        }
    }

    /// Append a task and return a copy of it
    pub fn add_task(&mut self, description: impl Into<String>, due_date: impl Into<String>) -> Task {
        let task = Task::new(description, due_date);
        self.tasks.push(task.clone());
        task
    }

    /// Negative indices and indices past the end are rejected
    fn task_slot(&self, index: i64) -> ClosingResult<usize> {
        let len = self.tasks.len();
        usize::try_from(index)
            .ok()
            .filter(|&i| i < len)
            .ok_or_else(|| ClosingError::TaskIndexOutOfRange {
                transaction_id: self.id.to_string(),
                index,
                len,
            })
    }

    /// Mark the task at `index` as completed
    ///
    /// Returns the task's position and its state before the change.
    pub fn complete_task(&mut self, index: i64) -> ClosingResult<(usize, Task)> {
        let slot = self.task_slot(index)?;
        let before = self.tasks[slot].clone();
        self.tasks[slot].complete();
        Ok((slot, before))
    }

    /// Number of tasks not yet completed
    pub fn open_task_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }
}
