//! Error types for loading, transforming, and saving tables.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Errors returned while reading or writing tabular files.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    /// The operating system refused access, usually because another program
    /// holds the file open.
    #[error("'{path}' is open in another program; close the file and try again")]
    Locked {
        /// File that could not be opened.
        path: Utf8PathBuf,
    },

    /// The file does not exist.
    #[error("'{path}' does not exist")]
    NotFound {
        /// Missing file.
        path: Utf8PathBuf,
    },

    /// Any other I/O failure.
    #[error("I/O error on '{path}': {message}")]
    Io {
        /// File being read or written.
        path: Utf8PathBuf,
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The CSV parser or writer failed.
    #[error("CSV error: {message}")]
    Csv {
        /// Error detail from the CSV library.
        message: String,
    },

    /// The spreadsheet reader or writer failed.
    #[error("spreadsheet error: {message}")]
    Spreadsheet {
        /// Error detail from the spreadsheet library.
        message: String,
    },

    /// The table has no header row, so there is no column to read from.
    #[error("table has no columns")]
    NoColumns,

    /// A data row has more cells than the header row names.
    #[error("row {row} has {found} cells but the header names only {expected} columns")]
    RaggedRow {
        /// Zero-based data row index.
        row: usize,
        /// Header width.
        expected: usize,
        /// Cells found in the row.
        found: usize,
    },

    /// The status column would overwrite a column the run must preserve.
    #[error("status column '{column}' already exists in the table; choose another name")]
    StatusColumnConflict {
        /// Requested status column.
        column: String,
    },

    /// A replacement column does not match the table's row count.
    #[error("column '{column}' has {found} values but the table has {expected} rows")]
    ColumnLength {
        /// Column being written.
        column: String,
        /// Row count of the table.
        expected: usize,
        /// Values supplied.
        found: usize,
    },
}

impl TableError {
    /// Classifies an I/O error raised while touching `path`.
    #[must_use]
    pub fn from_io(path: &Utf8Path, error: &io::Error) -> Self {
        if is_sharing_violation(error) {
            return Self::Locked {
                path: path.to_owned(),
            };
        }
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::Locked {
                path: path.to_owned(),
            },
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_owned(),
            },
            _ => Self::Io {
                path: path.to_owned(),
                message: error.to_string(),
            },
        }
    }
}

/// `ERROR_SHARING_VIOLATION` and `ERROR_LOCK_VIOLATION`: Windows reports a
/// workbook held open by Excel with these rather than access denied.
#[cfg(windows)]
fn is_sharing_violation(error: &io::Error) -> bool {
    matches!(error.raw_os_error(), Some(32 | 33))
}

#[cfg(not(windows))]
const fn is_sharing_violation(_error: &io::Error) -> bool {
    false
}
