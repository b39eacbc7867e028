//! Row filtering for [`crate::types::Table`].

use crate::types::{Table, Value};

/// Returns a new [`Table`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`Table::filter_rows`].
pub fn filter<F>(table: &Table, predicate: F) -> Table
where
    F: FnMut(&[Value]) -> bool,
{
    table.filter_rows(predicate)
}

/// Rows whose `column` equals `value`; `None` if the column does not exist.
pub fn filter_eq(table: &Table, column: &str, value: &Value) -> Option<Table> {
    let idx = table.schema.index_of(column)?;
    Some(table.filter_rows(|row| row.get(idx).unwrap_or(&Value::Null) == value))
}
