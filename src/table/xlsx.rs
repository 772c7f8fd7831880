//! Spreadsheet import (xlsx, xls, xlsb, ods) and XLSX export.
//!
//! Only the first worksheet is read. Its first row is the header and every
//! cell is rendered as text.

use std::fs::File;

use calamine::{Data, Reader, open_workbook_auto};
use camino::Utf8Path;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::error::TableError;
use super::model::Table;
use super::persist::write_atomically;

/// Reads the first worksheet of a spreadsheet file.
///
/// # Errors
///
/// Returns [`TableError::Locked`] when another program holds the file,
/// [`TableError::NotFound`] when it is missing, and
/// [`TableError::Spreadsheet`] when the workbook cannot be decoded.
pub fn read_spreadsheet(path: &Utf8Path) -> Result<Table, TableError> {
    // Probe first so lock and missing-file failures keep their I/O kind.
    File::open(path).map_err(|error| TableError::from_io(path, &error))?;

    let mut workbook = open_workbook_auto(path).map_err(|error| TableError::Spreadsheet {
        message: format!("failed to open workbook: {error}"),
    })?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(TableError::NoColumns)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|error| TableError::Spreadsheet {
            message: format!("failed to read sheet '{sheet_name}': {error}"),
        })?;

    let mut rows = range.rows();
    let header = rows.next().ok_or(TableError::NoColumns)?;
    let mut table = Table::new(header.iter().map(cell_text));
    for row in rows {
        let mut cells: Vec<String> = row.iter().map(cell_text).collect();
        trim_trailing_empty(&mut cells, table.columns().len());
        table.push_row(cells)?;
    }

    Ok(table)
}

/// Writes `table` to `path` as a single-sheet XLSX workbook.
///
/// # Errors
///
/// Returns [`TableError`] when the workbook cannot be built or saved.
/// Nothing is left at `path` on failure.
pub fn write_spreadsheet(table: &Table, path: &Utf8Path) -> Result<(), TableError> {
    let bytes = render_spreadsheet(table).map_err(|error| TableError::Spreadsheet {
        message: format!("failed to build workbook: {error}"),
    })?;
    write_atomically(path, &bytes)
}

fn render_spreadsheet(table: &Table) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet().set_name("Sheet1")?;
    let header_format = Format::new().set_bold();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, column_number(col)?, name, &header_format)?;
    }

    for (row_index, row) in table.rows().iter().enumerate() {
        let row_number = row_number(row_index)?;
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row_number, column_number(col)?, value)?;
            }
        }
    }

    workbook.save_to_buffer()
}

/// Data rows start below the header row.
fn row_number(index: usize) -> Result<u32, XlsxError> {
    index
        .checked_add(1)
        .and_then(|row| u32::try_from(row).ok())
        .ok_or(XlsxError::RowColumnLimitError)
}

fn column_number(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

/// Drops empty trailing cells beyond the header width; the sheet range can
/// be wider than the header when stray formatting sits to the right.
fn trim_trailing_empty(cells: &mut Vec<String>, width: usize) {
    while cells.len() > width && cells.last().is_some_and(String::is_empty) {
        cells.pop();
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        // `f64` display drops the fraction for whole numbers (`3.0` prints `3`).
        Data::Float(number) => number.to_string(),
        Data::Int(number) => number.to_string(),
        Data::Bool(flag) => if *flag { "TRUE" } else { "FALSE" }.to_owned(),
        Data::DateTime(date_time) => date_time.as_f64().to_string(),
        Data::Error(error) => format!("#{error:?}"),
    }
}
