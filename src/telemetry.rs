//! Logging set-up and structured run telemetry.
//!
//! Diagnostics go through `tracing`; the binary installs a stderr
//! subscriber filtered by `RUST_LOG`. Batch results can additionally be
//! emitted as JSON lines for scripts that post-process a run.

use std::io;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::table::{BatchError, BatchReport};

/// Installs the global `tracing` subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this
/// more than once keeps the first subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ignored = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// A structured telemetry event describing a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A run saved its output.
    BatchCompleted {
        /// Rows processed.
        rows: usize,
        /// Rows rewritten by the generation service.
        generated: usize,
        /// Rows that kept their original text.
        fallback: usize,
    },
    /// A run aborted before writing output.
    BatchAborted {
        /// Phase active when the run stopped.
        failed_during: String,
        /// Operator-readable reason.
        message: String,
    },
}

impl From<&BatchReport> for TelemetryEvent {
    fn from(report: &BatchReport) -> Self {
        Self::BatchCompleted {
            rows: report.rows,
            generated: report.generated,
            fallback: report.fallback,
        }
    }
}

impl From<&BatchError> for TelemetryEvent {
    fn from(error: &BatchError) -> Self {
        Self::BatchAborted {
            failed_during: error.failed_during().to_string(),
            message: error.to_string(),
        }
    }
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}
