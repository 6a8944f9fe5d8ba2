//! Custom error types for Closing Desk
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::Path;

use thiserror::Error;

/// The main error type for Closing Desk operations
#[derive(Error, Debug)]
pub enum ClosingError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// The backing store exists but does not hold the expected shape
    #[error("Corrupt store {path}: {reason}")]
    CorruptStore { path: String, reason: String },

    /// No transaction with the given id
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Completion index outside the task list
    #[error("Task index {index} out of range for transaction {transaction_id} ({len} tasks)")]
    TaskIndexOutOfRange {
        transaction_id: String,
        index: i64,
        len: usize,
    },

    /// Storage errors (temp files, renames, locks)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClosingError {
    /// Create a "corrupt store" error for the given file
    pub fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        Self::CorruptStore {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Create a "not found" error for a transaction id
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::TransactionNotFound(identifier.into())
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TransactionNotFound(_))
    }

    /// Check if the backing store failed to parse
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptStore { .. })
    }
}

impl From<std::io::Error> for ClosingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ClosingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Closing Desk operations
pub type ClosingResult<T> = Result<T, ClosingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClosingError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = ClosingError::transaction_not_found("abc");
        assert_eq!(err.to_string(), "Transaction not found: abc");
        assert!(err.is_not_found());
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_index_out_of_range_error() {
        let err = ClosingError::TaskIndexOutOfRange {
            transaction_id: "abc".into(),
            index: 3,
            len: 1,
        };
        assert_eq!(
            err.to_string(),
            "Task index 3 out of range for transaction abc (1 tasks)"
        );
    }

    #[test]
    fn test_corrupt_error() {
        let err = ClosingError::corrupt(Path::new("data.json"), "missing field");
        assert_eq!(err.to_string(), "Corrupt store data.json: missing field");
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ClosingError = io_err.into();
        assert!(matches!(err, ClosingError::Io(_)));
    }
}
