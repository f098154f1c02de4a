//! In-memory summary table
//!
//! A row-major table of [`Value`] cells with a schema that only ever grows.
//! New metric columns are appended with null backfill; rows keep append
//! order. Column order is first-seen: the fixed record columns lead
//! (established by the first append or the loaded file) and metric columns
//! follow in first-appearance order across all appends.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::value::Value;

/// The evolving tabular dataset behind a summary store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl SummaryTable {
    /// Create a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Column names in table order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// True if the table has no rows and no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    /// True if a column with this name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Append a column, backfilling existing rows with `Value::Null`.
    ///
    /// No-op if the column already exists.
    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.has_column(&name) {
            return;
        }
        self.columns.push(name);
        for row in &mut self.rows {
            row.push(Value::Null);
        }
    }

    /// Append a row, taking each column's value from the map.
    ///
    /// Columns absent from the map become `Value::Null`, and so does empty
    /// text: a CSV cell cannot distinguish the two, so the table never
    /// holds the distinction either.
    ///
    /// # Errors
    ///
    /// Returns an error if the map references a column the table does not
    /// have; callers add columns first.
    pub fn push_row(&mut self, row: &IndexMap<String, Value>) -> Result<()> {
        for key in row.keys() {
            if !self.has_column(key) {
                return Err(Error::StorageError(format!(
                    "row references unknown column \"{key}\""
                )));
            }
        }
        let cells = self
            .columns
            .iter()
            .map(|c| match row.get(c) {
                Some(Value::Text(s)) if s.is_empty() => Value::Null,
                Some(value) => value.clone(),
                None => Value::Null,
            })
            .collect();
        self.rows.push(cells);
        Ok(())
    }

    /// The row at the given zero-based index.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterate over rows in append order.
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// The cell at (`row`, `column`), if both exist.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)
    }
}
