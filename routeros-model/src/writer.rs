use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::config::RawConfig;

/// Errors that can occur while writing snapshot documents.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize a snapshot to JSON.
    #[error("failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to write the temporary output file.
    #[error("failed to write output file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to move the finished temporary file into place.
    #[error("failed to finalize output file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Serialize a [`RawConfig`] into pretty-printed JSON bytes.
pub fn write_json(config: &RawConfig) -> Result<Vec<u8>, WriteError> {
    let mut bytes = serde_json::to_vec_pretty(config)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Serialize a [`RawConfig`] and write it to `path`.
pub fn write_json_file(config: &RawConfig, path: &Path) -> Result<(), WriteError> {
    let bytes = write_json(config)?;
    write_atomic(path, &bytes)
}

/// Write `contents` to `path` without ever leaving a partial file behind.
///
/// Data goes to a temporary file in the destination directory first and is
/// renamed over `path` only after every byte has been flushed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
