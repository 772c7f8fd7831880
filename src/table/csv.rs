//! CSV import and export.
//!
//! Input may be UTF-8 (with or without a byte-order mark) or, failing that,
//! Windows-1252 as produced by older spreadsheet exports. Output is always
//! UTF-8 with a byte-order mark so spreadsheet programs pick the right
//! encoding when the file is opened directly.

use camino::Utf8Path;

use super::error::TableError;
use super::model::Table;
use super::persist::write_atomically;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads a CSV file with a header row.
///
/// # Errors
///
/// Returns [`TableError`] when the file cannot be read or parsed.
pub fn read_csv(path: &Utf8Path) -> Result<Table, TableError> {
    let bytes = std::fs::read(path).map_err(|error| TableError::from_io(path, &error))?;
    parse_csv(&bytes)
}

/// Parses CSV bytes with a header row.
///
/// # Errors
///
/// Returns [`TableError::NoColumns`] for empty input, [`TableError::Csv`]
/// for malformed records, and [`TableError::RaggedRow`] for rows wider than
/// the header.
pub fn parse_csv(bytes: &[u8]) -> Result<Table, TableError> {
    let content = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|error| csv_error(&error))?.clone();
    if headers.is_empty() {
        return Err(TableError::NoColumns);
    }

    let mut table = Table::new(headers.iter());
    for result in reader.records() {
        let record = result.map_err(|error| csv_error(&error))?;
        table.push_row(record.iter().map(ToOwned::to_owned).collect())?;
    }

    Ok(table)
}

/// Writes `table` to `path` as UTF-8 CSV with a byte-order mark.
///
/// # Errors
///
/// Returns [`TableError`] when encoding or writing fails. Nothing is left at
/// `path` on failure.
pub fn write_csv(table: &Table, path: &Utf8Path) -> Result<(), TableError> {
    let bytes = render_csv(table)?;
    write_atomically(path, &bytes)
}

/// Renders `table` as UTF-8 CSV bytes with a byte-order mark.
///
/// # Errors
///
/// Returns [`TableError::Csv`] when a record cannot be encoded.
pub fn render_csv(table: &Table) -> Result<Vec<u8>, TableError> {
    let mut writer = csv::WriterBuilder::new().from_writer(UTF8_BOM.to_vec());

    writer
        .write_record(table.columns())
        .map_err(|error| csv_error(&error))?;
    for row in table.rows() {
        writer.write_record(row).map_err(|error| csv_error(&error))?;
    }

    writer.into_inner().map_err(|error| TableError::Csv {
        message: error.to_string(),
    })
}

/// Decodes file bytes as UTF-8, falling back to Windows-1252.
fn decode_text(bytes: &[u8]) -> String {
    let without_bom = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(without_bom) {
        Ok(text) => text.to_owned(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(without_bom);
            decoded.into_owned()
        }
    }
}

fn csv_error(error: &csv::Error) -> TableError {
    TableError::Csv {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::{parse_csv, read_csv, render_csv, write_csv};
    use crate::table::{Table, TableError};

    fn utf8_dir() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("temp dir should be UTF-8");
        (dir, path)
    }

    #[rstest]
    #[case::plain(b"Description,Price\nBlue shirt,10\n".to_vec())]
    #[case::bom(b"\xEF\xBB\xBFDescription,Price\nBlue shirt,10\n".to_vec())]
    fn parse_reads_header_and_rows(#[case] bytes: Vec<u8>) {
        let table = parse_csv(&bytes).expect("CSV should parse");

        assert_eq!(table.columns(), &["Description".to_owned(), "Price".to_owned()]);
        assert_eq!(table.column_values(0).collect::<Vec<_>>(), vec!["Blue shirt"]);
    }

    #[test]
    fn parse_falls_back_to_windows_1252() {
        let bytes = b"Text\nR\xF8d tr\xF8je\n";

        let table = parse_csv(bytes).expect("latin text should decode");

        assert_eq!(table.column_values(0).collect::<Vec<_>>(), vec!["Rød trøje"]);
    }

    #[test]
    fn parse_keeps_quoted_newlines_and_commas() {
        let bytes = b"Description\n\"Soft, warm\nand cosy\"\n";

        let table = parse_csv(bytes).expect("quoted field should parse");

        assert_eq!(
            table.column_values(0).collect::<Vec<_>>(),
            vec!["Soft, warm\nand cosy"]
        );
    }

    #[test]
    fn parse_rejects_empty_input() {
        let error = parse_csv(b"").expect_err("empty input has no header");

        assert_eq!(error, TableError::NoColumns);
    }

    #[test]
    fn render_starts_with_bom_and_omits_index() {
        let table = Table::from_rows(["A", "B"], vec![vec!["1".to_owned(), "2".to_owned()]])
            .expect("row fits");

        let bytes = render_csv(&table).expect("render should succeed");

        assert_eq!(bytes, b"\xEF\xBB\xBFA,B\n1,2\n".to_vec());
    }

    #[test]
    fn write_then_read_preserves_every_cell() {
        let (_dir, root) = utf8_dir();
        let path = root.join("products.csv");
        let table = Table::from_rows(
            ["Description", "Note"],
            vec![
                vec!["Blue cotton shirt, size M".to_owned(), "\"quoted\"".to_owned()],
                vec![String::new(), "æøå".to_owned()],
            ],
        )
        .expect("rows fit");

        write_csv(&table, &path).expect("write should succeed");
        let reloaded = read_csv(&path).expect("read should succeed");

        assert_eq!(reloaded, table);
    }

    #[test]
    fn read_reports_missing_file() {
        let (_dir, root) = utf8_dir();
        let path = root.join("missing.csv");

        let error = read_csv(&path).expect_err("missing file should fail");

        assert_eq!(error, TableError::NotFound { path });
    }
}
