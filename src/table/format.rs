//! File format selection by extension.

use camino::Utf8Path;

use super::error::TableError;
use super::model::Table;
use super::{csv, xlsx};

/// On-disk table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet workbook (read: xlsx/xls/xlsb/ods; written as xlsx).
    Spreadsheet,
}

impl TableFormat {
    /// Picks the format for `path`: `.xlsx` and `.xls` (any case) are
    /// spreadsheets, everything else is CSV.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("xlsx" | "xls") => Self::Spreadsheet,
            _ => Self::Csv,
        }
    }

    /// Loads a table from `path` in this format.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] when the file cannot be read or decoded.
    pub fn read(self, path: &Utf8Path) -> Result<Table, TableError> {
        match self {
            Self::Csv => csv::read_csv(path),
            Self::Spreadsheet => xlsx::read_spreadsheet(path),
        }
    }

    /// Saves `table` to `path` in this format.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] when the file cannot be encoded or written.
    pub fn write(self, table: &Table, path: &Utf8Path) -> Result<(), TableError> {
        match self {
            Self::Csv => csv::write_csv(table, path),
            Self::Spreadsheet => xlsx::write_spreadsheet(table, path),
        }
    }
}
