//! Transaction CLI commands
//!
//! Implements the command-line surface over the transaction store.

use clap::Subcommand;

use crate::display::{format_audit_entries, format_transaction_list};
use crate::error::ClosingResult;
use crate::models::TransactionId;
use crate::storage::TransactionStore;

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Create a new transaction
    Create {
        /// Property address
        address: String,
        /// Closing date
        closing_date: String,
    },
    /// Add a task to a transaction
    AddTask {
        /// Transaction ID
        transaction_id: TransactionId,
        /// Task description
        description: String,
        /// Due date
        due_date: String,
    },
    /// Mark a task as complete
    CompleteTask {
        /// Transaction ID
        transaction_id: TransactionId,
        /// Position of the task in the transaction's list (0-based)
        #[arg(allow_negative_numbers = true)]
        task_index: i64,
    },
    /// List transactions and tasks
    List,
    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    store: &TransactionStore,
    cmd: TransactionCommands,
) -> ClosingResult<()> {
    match cmd {
        TransactionCommands::Create {
            address,
            closing_date,
        } => {
            let txn = store.create_transaction(&address, &closing_date)?;
            println!("Created transaction {} for {}", txn.id, txn.property_address);
        }

        TransactionCommands::AddTask {
            transaction_id,
            description,
            due_date,
        } => {
            store.add_task(&transaction_id, &description, &due_date)?;
            println!("Task added");
        }

        TransactionCommands::CompleteTask {
            transaction_id,
            task_index,
        } => {
            store.complete_task(&transaction_id, task_index)?;
            println!("Task completed");
        }

        TransactionCommands::List => {
            let data = store.list_transactions()?;
            print!("{}", format_transaction_list(data.values()));
        }

        TransactionCommands::History { limit } => {
            let entries = store.audit().recent(limit)?;
            print!("{}", format_audit_entries(&entries));
        }
    }

    Ok(())
}
