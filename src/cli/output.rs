//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use camino::Utf8Path;
use product_rewriter::BatchReport;

use super::AppError;

/// Writes the end-of-run summary to the given writer.
///
/// # Errors
///
/// Returns [`AppError::Io`] when the writer fails.
pub fn write_summary<W: Write>(
    writer: &mut W,
    output_path: &Utf8Path,
    requested_column: &str,
    report: &BatchReport,
) -> Result<(), AppError> {
    if report.input_column_substituted {
        writeln!(
            writer,
            "Column '{requested_column}' not found; read descriptions from '{}'",
            report.input_column
        )
        .map_err(|error| io_error(&error))?;
    }

    writeln!(
        writer,
        "Wrote {} rows to {output_path} ({} rewritten, {} kept original text)",
        report.rows, report.generated, report.fallback
    )
    .map_err(|error| io_error(&error))
}

/// Converts an I/O error into an [`AppError`].
pub fn io_error(error: &io::Error) -> AppError {
    AppError::Io {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8Path;
    use product_rewriter::BatchReport;
    use rstest::rstest;

    use super::write_summary;

    fn report(substituted: bool) -> BatchReport {
        BatchReport {
            input_column: if substituted { "Text" } else { "Description" }.to_owned(),
            input_column_substituted: substituted,
            rows: 3,
            generated: 2,
            fallback: 1,
        }
    }

    #[rstest]
    #[case::direct(false, "Wrote 3 rows to out.csv (2 rewritten, 1 kept original text)\n")]
    #[case::substituted(
        true,
        "Column 'Description' not found; read descriptions from 'Text'\nWrote 3 rows to out.csv (2 rewritten, 1 kept original text)\n"
    )]
    fn summary_describes_the_run(#[case] substituted: bool, #[case] expected: &str) {
        let mut buffer = Vec::new();

        write_summary(
            &mut buffer,
            Utf8Path::new("out.csv"),
            "Description",
            &report(substituted),
        )
        .expect("summary should be written");

        assert_eq!(String::from_utf8(buffer).expect("UTF-8"), expected);
    }
}
