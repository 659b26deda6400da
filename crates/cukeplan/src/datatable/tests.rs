//! Unit tests for data table reshaping.

use super::{DataTable, DataTableError};
use rstest::{fixture, rstest};

fn table(rows: &[&[&str]]) -> DataTable {
    DataTable::new(
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect(),
    )
}

#[fixture]
fn people() -> DataTable {
    table(&[&["name", "age"], &["Ada", "36"], &["Alan", "41"]])
}

#[rstest]
fn rows_skip_the_header(people: DataTable) {
    assert_eq!(people.raw().len(), 3);
    assert_eq!(people.rows().len(), 2);
    assert_eq!(people.rows().first().and_then(|r| r.first()).map(String::as_str), Some("Ada"));
}

#[rstest]
fn hashes_key_rows_by_header(people: DataTable) {
    let hashes = people.hashes();
    let ages: Vec<&str> = hashes
        .iter()
        .filter_map(|row| row.get("age").map(String::as_str))
        .collect();
    assert_eq!(ages, vec!["36", "41"]);
}

#[rstest]
fn rows_hash_pairs_two_columns(people: DataTable) {
    let pairs = people
        .rows_hash()
        .unwrap_or_else(|e| panic!("two columns: {e}"));
    assert_eq!(pairs.get("Ada").map(String::as_str), Some("36"));
    assert_eq!(pairs.get("name").map(String::as_str), Some("age"));
}

#[test]
fn rows_hash_rejects_other_widths() {
    let wide = table(&[&["a", "b"], &["c", "d", "e"]]);
    assert_eq!(
        wide.rows_hash(),
        Err(DataTableError::ColumnCount {
            expected: 2,
            row_number: 2,
            actual: 3
        })
    );
}

#[rstest]
#[case(&[&["apple"][..], &["pear"][..]], Ok(vec!["apple".to_string(), "pear".to_string()]))]
#[case(&[&["apple", "red"][..]], Err(DataTableError::ColumnCount { expected: 1, row_number: 1, actual: 2 }))]
fn list_requires_one_column(
    #[case] rows: &[&[&str]],
    #[case] expected: Result<Vec<String>, DataTableError>,
) {
    assert_eq!(table(rows).list(), expected);
}

#[rstest]
fn transpose_swaps_axes(people: DataTable) {
    let transposed = people
        .transpose()
        .unwrap_or_else(|e| panic!("rectangular: {e}"));
    assert_eq!(transposed, table(&[&["name", "Ada", "Alan"], &["age", "36", "41"]]));
}

#[test]
fn transpose_rejects_ragged_tables() {
    let ragged = table(&[&["a", "b"], &["c"]]);
    assert!(matches!(
        ragged.transpose(),
        Err(DataTableError::UnevenRow { row_number: 2, .. })
    ));
}

#[test]
fn empty_tables_have_no_rows() {
    let empty = DataTable::default();
    assert!(empty.rows().is_empty());
    assert!(empty.hashes().is_empty());
    assert_eq!(empty.list(), Ok(Vec::new()));
}

#[test]
fn error_messages_name_the_row() {
    let err = DataTableError::ColumnCount {
        expected: 2,
        row_number: 3,
        actual: 1,
    };
    assert_eq!(err.to_string(), "data table row 3 has 1 cells but expected 2");
}
