//! Errors raised by data table helpers.

use thiserror::Error;

/// Failure to reshape a data table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DataTableError {
    /// A row does not have the column count the helper requires.
    #[error("data table row {row_number} has {actual} cells but expected {expected}")]
    ColumnCount {
        /// Cells each row must have.
        expected: usize,
        /// 1-based index of the offending row.
        row_number: usize,
        /// Cells present in the offending row.
        actual: usize,
    },
    /// A row is wider or narrower than the first row.
    #[error("data table row {row_number} has {actual} cells but the first row has {expected}")]
    UnevenRow {
        /// Cells in the first row.
        expected: usize,
        /// 1-based index of the offending row.
        row_number: usize,
        /// Cells present in the offending row.
        actual: usize,
    },
}
