//! Tabular input and output for batch rewriting.
//!
//! Tables are loaded from CSV or spreadsheet files (or built in memory),
//! one column is rewritten row by row, and the result is saved in either
//! format.

mod adapter;
pub mod csv;
mod error;
mod format;
mod model;
mod persist;
mod progress;
pub mod xlsx;

pub use adapter::{
    BatchError, BatchReport, ColumnSelection, DEFAULT_INPUT_COLUMN, DEFAULT_OUTPUT_COLUMN,
    FileJob, RunPhase, check_status_column, resolve_input_column, rewrite_file, rewrite_table,
};
pub use error::TableError;
pub use format::TableFormat;
pub use model::Table;
pub use persist::write_atomically;
pub use progress::{NoopProgress, ProgressObserver, StderrProgress, WriterProgress};
