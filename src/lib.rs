//! Product description rewriter library.
//!
//! Reads a product table from CSV or a spreadsheet, asks an OpenAI-compatible
//! chat model to rewrite one text column row by row, and writes the result
//! into an output column. Identical texts are sent once per run, and a row
//! whose request fails keeps its original text.
//!
//! [`table::rewrite_table`] is the in-memory entry point; [`table::rewrite_file`]
//! wraps it with loading and atomic saving.

pub mod ai;
pub mod config;
pub mod table;
pub mod telemetry;

pub use ai::{
    OpenAiTextRewriteConfig, OpenAiTextRewriteService, RewriteError, RewriteOutcome,
    TextRewriteService, TextRewriter,
};
pub use config::RewriterConfig;
pub use table::{
    BatchError, BatchReport, ColumnSelection, FileJob, Table, TableError, TableFormat,
    rewrite_file, rewrite_table,
};
