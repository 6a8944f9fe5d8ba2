//! Core data models for Closing Desk
//!
//! This module contains the data structures of the closing domain:
//! transactions, their tasks, and transaction identifiers.

pub mod ids;
pub mod task;
pub mod transaction;

pub use ids::TransactionId;
pub use task::Task;
pub use transaction::Transaction;
