//! All-or-nothing file writes.

use std::io::Write;

use camino::Utf8Path;
use tempfile::NamedTempFile;

use super::error::TableError;

/// Writes `bytes` to `path` through a temporary sibling file.
///
/// The destination only appears once the content is complete, so a failed
/// save never leaves a truncated output file behind.
///
/// # Errors
///
/// Returns [`TableError`] when the temporary file cannot be created,
/// written, or renamed into place.
pub fn write_atomically(path: &Utf8Path, bytes: &[u8]) -> Result<(), TableError> {
    let directory = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    let mut staging =
        NamedTempFile::new_in(directory).map_err(|error| TableError::from_io(path, &error))?;
    staging
        .write_all(bytes)
        .and_then(|()| staging.as_file().sync_all())
        .map_err(|error| TableError::from_io(path, &error))?;
    staging
        .persist(path)
        .map_err(|error| TableError::from_io(path, &error.error))?;

    Ok(())
}
