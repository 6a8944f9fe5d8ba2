//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::config::paths::sibling;
use crate::error::ClosingError;

/// Read JSON from a file, returning a default value if the file doesn't exist
///
/// Content that does not parse into `T` is reported as a corrupt store.
pub fn read_json<T, P>(path: P) -> Result<T, ClosingError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| ClosingError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            ClosingError::Io(format!("Failed to read {}: {}", path.display(), e))
        } else {
            ClosingError::corrupt(path, e.to_string())
        }
    })
}

/// Replace `path` with the pretty-printed JSON of `data`
///
/// The bytes go to `<path>.tmp` first and are synced before the rename, so
/// readers see either the old file or the new one, never a partial write.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), ClosingError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = serde_json::to_vec_pretty(data)
        .map_err(|e| ClosingError::Json(format!("Failed to serialize {}: {}", path.display(), e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let temp_path = sibling(path, "tmp");
    if let Err(e) = write_synced(&temp_path, &bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(storage_error("write", &temp_path, e));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_error("replace", path, e)
    })
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn storage_error(action: &str, path: &Path, err: io::Error) -> ClosingError {
    ClosingError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}
