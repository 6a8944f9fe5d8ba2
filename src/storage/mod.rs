//! Storage layer for Closing Desk
//!
//! Provides JSON file storage with atomic writes and an exclusive lock around
//! each read-modify-write cycle.

pub mod file_io;
pub mod transactions;

pub use file_io::{read_json, write_json_atomic};
pub use transactions::{TransactionMap, TransactionStore};
