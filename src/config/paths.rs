//! Path management for Closing Desk
//!
//! Resolves the backing-store file and the sidecar files kept next to it.
//!
//! ## Path Resolution Order
//!
//! 1. The `--data-file` argument, or `CLOSING_DESK_DATA_FILE` when the
//!    argument is absent (both read by the command-line parser)
//! 2. `transactions.json` in the working directory

use std::path::{Path, PathBuf};

use crate::error::ClosingError;

/// Environment variable overriding the data file location
pub const DATA_FILE_ENV: &str = "CLOSING_DESK_DATA_FILE";

/// Default data file name, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "transactions.json";

/// Identifies one backing store and its sidecar files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    data_file: PathBuf,
}

impl StorePaths {
    /// Create StorePaths for an explicit data file (useful for testing)
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    /// Use the configured data file, or the default when none was given
    ///
    /// # Errors
    ///
    /// Returns an error if the configured path is empty.
    pub fn resolve(configured: Option<PathBuf>) -> Result<Self, ClosingError> {
        let data_file = configured.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        if data_file.as_os_str().is_empty() {
            return Err(ClosingError::Config("Data file path is empty".into()));
        }

        Ok(Self { data_file })
    }

    /// Get the path to the JSON data file
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Get the path of the advisory lock file
    pub fn lock_file(&self) -> PathBuf {
        sibling(&self.data_file, "lock")
    }

    /// Get the path to the audit log (`<stem>.audit.log`)
    pub fn audit_log(&self) -> PathBuf {
        let stem = self
            .data_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "transactions".to_string());
        self.data_file.with_file_name(format!("{}.audit.log", stem))
    }

    /// Ensure the directory holding the data file exists
    pub fn ensure_parent_dir(&self) -> Result<(), ClosingError> {
        match self.data_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ClosingError::Io(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })
            }
            _ => Ok(()),
        }
    }
}

/// Append an extra extension to the full file name (`a.json` -> `a.json.lock`)
pub(crate) fn sibling(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(extension);
    path.with_file_name(name)
}
