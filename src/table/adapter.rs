//! Applies a [`TextRewriter`] to one column of a table.
//!
//! A file run moves through [`RunPhase::Loading`], [`RunPhase::Processing`]
//! and [`RunPhase::Saved`]. Any load or save failure ends the run in
//! [`RunPhase::Aborted`] without writing an output file; row-level
//! generation failures never abort a run.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::ai::{RewriteStatus, TextRewriter};

use super::error::TableError;
use super::format::TableFormat;
use super::model::Table;
use super::progress::ProgressObserver;

/// Default column holding the original product text.
pub const DEFAULT_INPUT_COLUMN: &str = "Description";
/// Default column receiving the rewritten text.
pub const DEFAULT_OUTPUT_COLUMN: &str = "Opdateret produkttekst";

/// Which columns a run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    /// Preferred source column; the first column is used when absent.
    pub input_column: String,
    /// Column receiving rewritten text; created when absent.
    pub output_column: String,
    /// Optional column receiving `generated` / `fallback` per row.
    pub status_column: Option<String>,
}

impl Default for ColumnSelection {
    fn default() -> Self {
        Self {
            input_column: DEFAULT_INPUT_COLUMN.to_owned(),
            output_column: DEFAULT_OUTPUT_COLUMN.to_owned(),
            status_column: None,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Column the texts were read from.
    pub input_column: String,
    /// Whether the requested input column was missing and the first column
    /// was used instead.
    pub input_column_substituted: bool,
    /// Rows processed.
    pub rows: usize,
    /// Rows whose text came from the generation service.
    pub generated: usize,
    /// Rows that kept their original text.
    pub fallback: usize,
}

/// Stages of a file run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Reading the input file.
    Loading,
    /// Rewriting rows and saving the output.
    Processing,
    /// Output written.
    Saved,
    /// Terminal failure; no output written.
    Aborted,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Loading => "loading",
            Self::Processing => "processing",
            Self::Saved => "saved",
            Self::Aborted => "aborted",
        })
    }
}

/// Why a file run was aborted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchError {
    /// The input file could not be loaded.
    #[error("failed to load '{path}': {source}")]
    Load {
        /// Input file.
        path: Utf8PathBuf,
        /// Underlying failure.
        source: TableError,
    },

    /// The loaded table could not be transformed.
    #[error("failed to process '{path}': {source}")]
    Process {
        /// Input file.
        path: Utf8PathBuf,
        /// Underlying failure.
        source: TableError,
    },

    /// The output file could not be saved.
    #[error("failed to save '{path}': {source}")]
    Save {
        /// Output file.
        path: Utf8PathBuf,
        /// Underlying failure.
        source: TableError,
    },
}

impl BatchError {
    /// Phase that was active when the run aborted.
    #[must_use]
    pub const fn failed_during(&self) -> RunPhase {
        match self {
            Self::Load { .. } => RunPhase::Loading,
            Self::Process { .. } | Self::Save { .. } => RunPhase::Processing,
        }
    }

    /// Underlying table error.
    #[must_use]
    pub const fn table_error(&self) -> &TableError {
        match self {
            Self::Load { source, .. } | Self::Process { source, .. } | Self::Save { source, .. } => {
                source
            }
        }
    }
}

/// Input and output locations for a file run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    /// File to read.
    pub input_path: Utf8PathBuf,
    /// Format of the input file.
    pub input_format: TableFormat,
    /// File to write.
    pub output_path: Utf8PathBuf,
    /// Format of the output file.
    pub output_format: TableFormat,
}

impl FileJob {
    /// Builds a job whose formats follow each path's extension.
    #[must_use]
    pub fn from_paths(input_path: &Utf8Path, output_path: &Utf8Path) -> Self {
        Self {
            input_path: input_path.to_owned(),
            input_format: TableFormat::from_path(input_path),
            output_path: output_path.to_owned(),
            output_format: TableFormat::from_path(output_path),
        }
    }
}

/// Resolves the input column, falling back to the first column.
///
/// Returns the column index and whether a substitution happened.
///
/// # Errors
///
/// Returns [`TableError::NoColumns`] when the table has no columns at all.
pub fn resolve_input_column(table: &Table, requested: &str) -> Result<(usize, bool), TableError> {
    if let Some(index) = table.column_index(requested) {
        return Ok((index, false));
    }
    if table.columns().is_empty() {
        return Err(TableError::NoColumns);
    }
    Ok((0, true))
}

/// Rejects a status column that would overwrite an existing column or the
/// output column.
///
/// # Errors
///
/// Returns [`TableError::StatusColumnConflict`] when the name is already
/// taken.
pub fn check_status_column(table: &Table, columns: &ColumnSelection) -> Result<(), TableError> {
    let Some(status_column) = columns.status_column.as_deref() else {
        return Ok(());
    };
    if status_column == columns.output_column || table.column_index(status_column).is_some() {
        return Err(TableError::StatusColumnConflict {
            column: status_column.to_owned(),
        });
    }
    Ok(())
}

/// Rewrites one column of an in-memory table.
///
/// Rows are processed one at a time in order; results are staged and only
/// written into the table once every row is done.
///
/// # Errors
///
/// Returns [`TableError::NoColumns`] for a table without columns and
/// [`TableError::StatusColumnConflict`] when the status column is already
/// taken; no generation calls are made in either case. Failed generation
/// calls are not errors: those rows keep their original text.
pub fn rewrite_table(
    table: &mut Table,
    rewriter: &mut TextRewriter<'_>,
    columns: &ColumnSelection,
    progress: &mut dyn ProgressObserver,
) -> Result<BatchReport, TableError> {
    check_status_column(table, columns)?;
    let (input_index, substituted) = resolve_input_column(table, &columns.input_column)?;
    let input_column = table
        .columns()
        .get(input_index)
        .cloned()
        .unwrap_or_default();
    if substituted {
        tracing::debug!(
            requested = %columns.input_column,
            using = %input_column,
            "input column not found; using the first column"
        );
    }

    let total = table.row_count();
    let mut texts = Vec::with_capacity(total);
    let mut statuses = Vec::with_capacity(total);
    let mut generated = 0;

    for (offset, original_text) in table.column_values(input_index).enumerate() {
        let outcome = rewriter.rewrite_outcome(original_text);
        if outcome.status() == RewriteStatus::Generated {
            generated += 1;
        }
        statuses.push(outcome.status().label().to_owned());
        texts.push(outcome.text().to_owned());
        progress.row_completed(offset + 1, total);
    }

    table.set_column(&columns.output_column, texts)?;
    if let Some(status_column) = columns.status_column.as_deref() {
        table.set_column(status_column, statuses)?;
    }

    Ok(BatchReport {
        input_column,
        input_column_substituted: substituted,
        rows: total,
        generated,
        fallback: total - generated,
    })
}

/// Loads `job.input_path`, rewrites it, and saves `job.output_path`.
///
/// # Errors
///
/// Returns [`BatchError`] when loading, processing, or saving fails. No
/// output file exists after an error.
pub fn rewrite_file(
    job: &FileJob,
    rewriter: &mut TextRewriter<'_>,
    columns: &ColumnSelection,
    progress: &mut dyn ProgressObserver,
) -> Result<BatchReport, BatchError> {
    tracing::debug!(path = %job.input_path, phase = %RunPhase::Loading, "loading table");
    let mut table = job
        .input_format
        .read(&job.input_path)
        .map_err(|source| abort(BatchError::Load {
            path: job.input_path.clone(),
            source,
        }))?;
    tracing::info!(
        path = %job.input_path,
        rows = table.row_count(),
        columns = ?table.columns(),
        "loaded table"
    );

    tracing::debug!(phase = %RunPhase::Processing, "rewriting rows");
    let report = rewrite_table(&mut table, rewriter, columns, progress).map_err(|source| {
        abort(BatchError::Process {
            path: job.input_path.clone(),
            source,
        })
    })?;

    job.output_format
        .write(&table, &job.output_path)
        .map_err(|source| abort(BatchError::Save {
            path: job.output_path.clone(),
            source,
        }))?;
    tracing::info!(
        path = %job.output_path,
        phase = %RunPhase::Saved,
        rows = report.rows,
        generated = report.generated,
        fallback = report.fallback,
        "saved table"
    );

    Ok(report)
}

fn abort(error: BatchError) -> BatchError {
    tracing::error!(
        failed_during = %error.failed_during(),
        phase = %RunPhase::Aborted,
        %error,
        "run aborted; no output written"
    );
    error
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
