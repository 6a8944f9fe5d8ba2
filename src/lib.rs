//! Closing Desk - transaction coordination for real-estate closings
//!
//! This library keeps a set of closings (property address + closing date),
//! each with an ordered list of tasks, in a single JSON file. The same store
//! backs the command-line interface and the web UI.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Backing-store path resolution and defaults
//! - `error`: Custom error types
//! - `models`: Transactions, tasks, and ids
//! - `storage`: JSON file storage and the transaction store
//! - `audit`: Audit logging of every mutation
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//! - `web`: axum router and HTML rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use closing_desk::config::StorePaths;
//! use closing_desk::storage::TransactionStore;
//!
//! # fn main() -> Result<(), closing_desk::ClosingError> {
//! let store = TransactionStore::new(StorePaths::new("transactions.json"));
//! let txn = store.create_transaction("123 Main St", "2024-12-01")?;
//! store.add_task(&txn.id, "Schedule inspection", "2024-10-01")?;
//! store.complete_task(&txn.id, 0)?;
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod storage;
pub mod web;

pub use error::{ClosingError, ClosingResult};
