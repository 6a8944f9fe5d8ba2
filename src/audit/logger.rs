//! JSONL audit log next to the data file

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{ClosingError, ClosingResult};

use super::entry::AuditEntry;

/// Appends entries to, and reads them back from, one audit log file
pub struct AuditLogger {
    path: PathBuf,
}

impl AuditLogger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one entry as a single JSON line
    pub fn append(&self, entry: &AuditEntry) -> ClosingResult<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(&line))
            .map_err(|e| {
                ClosingError::Io(format!(
                    "Failed to append to audit log {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }

    /// The last `limit` entries, oldest first
    ///
    /// Streams the log so only `limit` entries are held at once. A missing
    /// log has no entries; a line that is not an entry is an error.
    pub fn recent(&self, limit: usize) -> ClosingResult<Vec<AuditEntry>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ClosingError::Io(format!(
                    "Failed to open audit log {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut window = VecDeque::new();
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                ClosingError::Io(format!("Failed to read audit log line {}: {}", number + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                ClosingError::Json(format!("Bad audit entry at line {}: {}", number + 1, e))
            })?;

            window.push_back(entry);
            if window.len() > limit {
                window.pop_front();
            }
        }

        Ok(window.into())
    }
}
