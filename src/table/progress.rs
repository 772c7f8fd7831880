//! Row-by-row progress reporting.

use std::io::{self, Write};

/// Receives a notification after each row is rewritten.
pub trait ProgressObserver {
    /// Called once per row in row order; `completed` runs from 1 to `total`.
    fn row_completed(&mut self, completed: usize, total: usize);
}

/// Observer that ignores progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn row_completed(&mut self, _completed: usize, _total: usize) {}
}

/// Observer that redraws a one-line percentage counter on a writer.
#[derive(Debug)]
pub struct WriterProgress<W: Write> {
    writer: W,
    label: String,
}

impl<W: Write> WriterProgress<W> {
    /// Creates a counter that prefixes each update with `label`.
    #[must_use]
    pub fn new(writer: W, label: impl Into<String>) -> Self {
        Self {
            writer,
            label: label.into(),
        }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn draw(&mut self, completed: usize, total: usize) -> io::Result<()> {
        let percent = completed.saturating_mul(100).checked_div(total).unwrap_or(100);
        write!(
            self.writer,
            "\r{}: {completed}/{total} ({percent}%)",
            self.label
        )?;
        if completed >= total {
            writeln!(self.writer)?;
        }
        self.writer.flush()
    }
}

impl<W: Write> ProgressObserver for WriterProgress<W> {
    fn row_completed(&mut self, completed: usize, total: usize) {
        // A broken terminal must not abort the batch.
        let _ignored = self.draw(completed, total);
    }
}

/// Progress counter on standard error.
pub type StderrProgress = WriterProgress<io::Stderr>;

impl StderrProgress {
    /// Creates a counter writing to standard error.
    #[must_use]
    pub fn stderr(label: impl Into<String>) -> Self {
        Self::new(io::stderr(), label)
    }
}
