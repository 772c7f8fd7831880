//! Command-line surface for the product rewriter.
//!
//! - [`rewrite_file`]: Runs one file through the rewriter
//! - [`output`]: Summary formatting
//!
//! Positional paths are parsed by `clap`; every option is forwarded as the
//! CLI layer of [`RewriterConfig`](product_rewriter::RewriterConfig).

use camino::Utf8PathBuf;
use clap::Parser;
use product_rewriter::{BatchError, RewriteError};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod output;
pub mod rewrite_file;

/// Rewrites the product descriptions in a CSV or Excel file.
#[derive(Debug, Clone, Parser)]
#[command(name = "product-rewriter", version, about)]
pub struct Cli {
    /// Input file (`.csv`, `.xlsx`, or `.xls`).
    pub input_file: Utf8PathBuf,

    /// Output file; `.xlsx` or `.xls` writes a workbook, anything else CSV.
    pub output_file: Utf8PathBuf,

    /// Column holding the original descriptions [default: Description].
    #[arg(long)]
    pub input_column: Option<String>,

    /// Column receiving the rewritten descriptions
    /// [default: Opdateret produkttekst].
    #[arg(long)]
    pub output_column: Option<String>,

    /// Optional column recording `generated` or `fallback` per row.
    #[arg(long)]
    pub status_column: Option<String>,

    /// System instructions for the model [default: built-in SEO directive].
    #[arg(long)]
    pub instructions: Option<String>,

    /// Chat model identifier.
    #[arg(long)]
    pub ai_model: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[arg(long)]
    pub ai_base_url: Option<String>,

    /// API key; falls back to `OPENAI_API_KEY`.
    #[arg(long)]
    pub ai_api_key: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub ai_timeout_seconds: Option<u64>,

    /// Emit a JSON telemetry line on stderr when the run ends.
    #[arg(long)]
    pub telemetry: bool,
}

impl Cli {
    /// Options the user passed, as a configuration layer.
    #[must_use]
    pub fn config_layer(&self) -> Value {
        let mut layer = Map::new();
        let strings = [
            ("input_column", &self.input_column),
            ("output_column", &self.output_column),
            ("status_column", &self.status_column),
            ("instructions", &self.instructions),
            ("ai_model", &self.ai_model),
            ("ai_base_url", &self.ai_base_url),
            ("ai_api_key", &self.ai_api_key),
        ];
        for (field, value) in strings {
            if let Some(text) = value {
                layer.insert(field.to_owned(), Value::String(text.clone()));
            }
        }
        if let Some(seconds) = self.ai_timeout_seconds {
            layer.insert("ai_timeout_seconds".to_owned(), Value::from(seconds));
        }
        if self.telemetry {
            layer.insert("telemetry".to_owned(), Value::Bool(true));
        }
        Value::Object(layer)
    }
}

/// Failures that end a CLI run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration or credential problem detected before any work.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// The file run was aborted.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// Writing the summary failed.
    #[error("failed to write output: {message}")]
    Io {
        /// Underlying I/O error text.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use serde_json::json;

    use super::Cli;

    #[test]
    fn positionals_only_yield_an_empty_layer() {
        let cli = Cli::try_parse_from(["product-rewriter", "in.csv", "out.xlsx"])
            .expect("arguments should parse");

        assert_eq!(cli.input_file, "in.csv");
        assert_eq!(cli.output_file, "out.xlsx");
        assert_eq!(cli.config_layer(), json!({}));
    }

    #[test]
    fn passed_options_become_layer_fields() {
        let cli = Cli::try_parse_from([
            "product-rewriter",
            "in.csv",
            "out.csv",
            "--input-column",
            "Tekst",
            "--instructions",
            "Skriv kort.",
            "--ai-timeout-seconds",
            "20",
            "--telemetry",
        ])
        .expect("arguments should parse");

        assert_eq!(
            cli.config_layer(),
            json!({
                "input_column": "Tekst",
                "instructions": "Skriv kort.",
                "ai_timeout_seconds": 20,
                "telemetry": true
            })
        );
    }

    #[test]
    fn output_file_is_required() {
        assert!(Cli::try_parse_from(["product-rewriter", "in.csv"]).is_err());
    }
}
