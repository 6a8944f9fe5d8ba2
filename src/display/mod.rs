//! Display formatting for terminal output

pub mod transaction;

pub use transaction::{format_audit_entries, format_transaction_list};
