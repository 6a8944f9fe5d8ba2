//! Audit entry data structures
//!
//! One entry per store mutation. Transactions are identified by their id and
//! tasks by `<transaction id>#<index>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Task, Transaction, TransactionId};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Transaction,
    Task,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::Task => write!(f, "Task"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Transaction id, or `<transaction id>#<index>` for a task
    pub entity_id: String,

    /// Property address or task description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

impl AuditEntry {
    /// A transaction was created
    pub fn transaction_created(txn: &Transaction) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type: EntityType::Transaction,
            entity_id: txn.id.to_string(),
            entity_name: Some(txn.property_address.clone()),
            before: None,
            after: serde_json::to_value(txn).ok(),
        }
    }

    /// A task was appended at `index`
    pub fn task_added(transaction_id: &TransactionId, index: usize, task: &Task) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type: EntityType::Task,
            entity_id: task_entity_id(transaction_id, index),
            entity_name: Some(task.description.clone()),
            before: None,
            after: serde_json::to_value(task).ok(),
        }
    }

    /// The task at `index` was marked completed
    pub fn task_completed(
        transaction_id: &TransactionId,
        index: usize,
        before: &Task,
        after: &Task,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            entity_type: EntityType::Task,
            entity_id: task_entity_id(transaction_id, index),
            entity_name: Some(after.description.clone()),
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
        }
    }

    /// Format as a single human-readable line
    pub fn summary(&self) -> String {
        let name = self
            .entity_name
            .as_deref()
            .map(|n| format!(" \"{}\"", n))
            .unwrap_or_default();
        format!(
            "{} {} {} {}{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.entity_type,
            self.entity_id,
            name
        )
    }
}

fn task_entity_id(transaction_id: &TransactionId, index: usize) -> String {
    format!("{}#{}", transaction_id, index)
}
