//! Tabular step arguments.
//!
//! A [`DataTable`] is handed to a step function when the pickle step carries
//! a table. The helpers reshape the raw cells the way step authors usually
//! consume them: header-keyed maps, two-column dictionaries or one-column
//! lists.

mod error;

use derive_more::{Deref, From, IntoIterator};
use hashbrown::HashMap;

pub use error::DataTableError;

/// Cells of a Gherkin data table, row by row.
///
/// # Examples
/// ```
/// use cukeplan::datatable::DataTable;
/// let table = DataTable::from(vec![
///     vec!["name".to_string(), "age".to_string()],
///     vec!["Ada".to_string(), "36".to_string()],
/// ]);
/// assert_eq!(table.rows().len(), 1);
/// let hashes = table.hashes();
/// assert_eq!(hashes.first().and_then(|row| row.get("age")).map(String::as_str), Some("36"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, From, IntoIterator)]
pub struct DataTable(Vec<Vec<String>>);

impl DataTable {
    /// Wrap raw cells.
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self(rows)
    }

    /// Every row, header included.
    #[must_use]
    pub fn raw(&self) -> &[Vec<String>] {
        &self.0
    }

    /// Every row after the header.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        self.0.get(1..).unwrap_or_default()
    }

    /// One map per data row, keyed by the header cells.
    ///
    /// Cells beyond the header width are ignored.
    #[must_use]
    pub fn hashes(&self) -> Vec<HashMap<String, String>> {
        let Some(header) = self.0.first() else {
            return Vec::new();
        };
        self.rows()
            .iter()
            .map(|row| header.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }

    /// Treat a two-column table as key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::ColumnCount`] for the first row that does
    /// not have exactly two cells.
    pub fn rows_hash(&self) -> Result<HashMap<String, String>, DataTableError> {
        self.require_columns(2)?;
        Ok(self
            .0
            .iter()
            .filter_map(|row| match row.as_slice() {
                [key, value] => Some((key.clone(), value.clone())),
                _ => None,
            })
            .collect())
    }

    /// Treat a one-column table as a list.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::ColumnCount`] for the first row that does
    /// not have exactly one cell.
    pub fn list(&self) -> Result<Vec<String>, DataTableError> {
        self.require_columns(1)?;
        Ok(self.0.iter().filter_map(|row| row.first().cloned()).collect())
    }

    /// Swap rows and columns.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::UnevenRow`] when rows differ in width.
    pub fn transpose(&self) -> Result<Self, DataTableError> {
        let width = self.0.first().map_or(0, Vec::len);
        for (index, row) in self.0.iter().enumerate() {
            if row.len() != width {
                return Err(DataTableError::UnevenRow {
                    expected: width,
                    row_number: index + 1,
                    actual: row.len(),
                });
            }
        }
        let columns = (0..width)
            .map(|column| {
                self.0
                    .iter()
                    .filter_map(|row| row.get(column).cloned())
                    .collect()
            })
            .collect();
        Ok(Self(columns))
    }

    fn require_columns(&self, expected: usize) -> Result<(), DataTableError> {
        match self
            .0
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
        {
            Some((index, row)) => Err(DataTableError::ColumnCount {
                expected,
                row_number: index + 1,
                actual: row.len(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests;
