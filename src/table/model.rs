//! In-memory table of text cells.

use super::error::TableError;

/// Ordered rows of text cells sharing one header row.
///
/// Every row is exactly as wide as the header. Cells are kept as text
/// because the rewrite pipeline only ever reads and writes strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given header.
    ///
    /// Blank header cells are named `Unnamed: <index>`.
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(index, name)| name_column(index, name.into()))
            .collect();
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a table from a header and data rows.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RaggedRow`] when a row is wider than the header.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<String>>) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Appends a row, padding it with empty cells up to the header width.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RaggedRow`] when the row is wider than the header.
    pub fn push_row(&mut self, mut row: Vec<String>) -> Result<(), TableError> {
        let expected = self.columns.len();
        if row.len() > expected {
            return Err(TableError::RaggedRow {
                row: self.rows.len(),
                expected,
                found: row.len(),
            });
        }
        row.resize(expected, String::new());
        self.rows.push(row);
        Ok(())
    }

    /// Header names in column order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first column called `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).map_or("", String::as_str))
    }

    /// Writes `values` into the column called `name`.
    ///
    /// An existing column is overwritten in place; otherwise the column is
    /// appended after the last one.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnLength`] when `values` does not hold
    /// exactly one value per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                column: name.to_owned(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        let index = self.column_index(name).unwrap_or_else(|| {
            self.columns.push(name.to_owned());
            for row in &mut self.rows {
                row.push(String::new());
            }
            self.columns.len() - 1
        });

        for (row, value) in self.rows.iter_mut().zip(values) {
            if let Some(cell) = row.get_mut(index) {
                *cell = value;
            }
        }
        Ok(())
    }
}

fn name_column(index: usize, name: String) -> String {
    if name.trim().is_empty() {
        format!("Unnamed: {index}")
    } else {
        name
    }
}
