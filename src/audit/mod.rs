//! Audit logging system for Closing Desk
//!
//! Records every create and update performed by the transaction store in an
//! append-only audit log that sits next to the data file.
//!
//! - `AuditEntry`: one mutation, built from the store's own values.
//! - `AuditLogger`: appends entries as JSON lines and reads back the tail.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
