use std::collections::BTreeMap;

use super::model::{Table, Value};
use super::DataError;

/// Row indices per distinct value of `column`, keys ascending.
pub fn group_rows(table: &Table, column: &str) -> Result<BTreeMap<Value, Vec<usize>>, DataError> {
    let mut groups: BTreeMap<Value, Vec<usize>> = BTreeMap::new();
    for (row, value) in table.column(column)?.values.iter().enumerate() {
        groups.entry(value.clone()).or_default().push(row);
    }
    Ok(groups)
}

/// Indices of rows whose `column` cell matches `expected`.
pub fn matching_rows(table: &Table, column: &str, expected: &Value) -> Result<Vec<usize>, DataError> {
    Ok(table
        .column(column)?
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.matches(expected))
        .map(|(i, _)| i)
        .collect())
}

/// Pick `values` at the given row indices.
pub fn select(values: &[f64], rows: &[usize]) -> Vec<f64> {
    rows.iter().filter_map(|&r| values.get(r).copied()).collect()
}
