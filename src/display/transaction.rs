//! Transaction display formatting
//!
//! Provides utilities for formatting transactions and their tasks for
//! terminal display.

use crate::audit::AuditEntry;
use crate::models::{Task, Transaction};

/// Status glyph for a task
pub fn task_glyph(task: &Task) -> &'static str {
    if task.completed {
        "✅"
    } else {
        "⬜"
    }
}

/// Format a single task line, indented under its transaction
pub fn format_task_row(index: usize, task: &Task) -> String {
    format!(
        "  [{}] {} {} (due {})",
        index,
        task_glyph(task),
        task.description,
        task.due_date
    )
}

/// Format the header line of a transaction
pub fn format_transaction_header(txn: &Transaction) -> String {
    format!(
        "{}: {} (closing {})",
        txn.id, txn.property_address, txn.closing_date
    )
}

/// Format every transaction with its tasks
pub fn format_transaction_list<'a, I>(transactions: I) -> String
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut output = String::new();

    for txn in transactions {
        output.push_str(&format_transaction_header(txn));
        output.push('\n');
        for (index, task) in txn.tasks.iter().enumerate() {
            output.push_str(&format_task_row(index, task));
            output.push('\n');
        }
    }

    if output.is_empty() {
        return "No transactions found.\n".to_string();
    }

    output
}

/// Format audit entries, one per line
pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No history recorded.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.summary());
        output.push('\n');
    }
    output
}
