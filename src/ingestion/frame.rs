//! Turns a raw grid of cells into a typed [`Table`].
//!
//! Both parsers funnel through [`build_table`], so header handling, null tokens and column
//! type inference behave the same for CSV text and workbook cells.

use std::collections::HashSet;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataType, Field, Schema, Table, Value};

use super::options::TableLayout;

/// A cell as read from the source, before column typing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
            Cell::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            Cell::Text(s) => match s.trim() {
                "true" | "True" | "TRUE" => Some(true),
                "false" | "False" | "FALSE" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn into_text(self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s,
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// Header label text; integral floats print without a fraction (`2024`, not `2024.0`).
    fn into_label(self) -> String {
        match self {
            Cell::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
            other => other.into_text(),
        }
    }
}

/// Build a table from rows of cells.
///
/// `table` names the source in error messages. `skiprows` counts raw rows; rows with no
/// non-empty cell are dropped after that, so `header` and `nrows` only see populated rows.
pub(crate) fn build_table(
    table: &str,
    grid: Vec<Vec<Cell>>,
    layout: &TableLayout,
) -> IngestionResult<Table> {
    let mut rows = grid
        .into_iter()
        .skip(layout.skiprows)
        .filter(|row| row.iter().any(|c| !matches!(c, Cell::Empty)));

    let header: Option<Vec<Cell>> = match layout.header {
        Some(idx) => {
            let header = rows.nth(idx).ok_or_else(|| IngestionError::MalformedTable {
                table: table.to_string(),
                message: format!("no header row at index {idx} (no columns to parse)"),
            })?;
            Some(header)
        }
        None => None,
    };

    let mut data: Vec<Vec<Cell>> = rows.collect();
    if let Some(limit) = layout.nrows {
        data.truncate(limit);
    }

    let width = match &header {
        Some(h) => h.len(),
        None => data.iter().map(Vec::len).max().unwrap_or(0),
    };

    for (idx0, row) in data.iter().enumerate() {
        if row.len() > width {
            return Err(IngestionError::MalformedTable {
                table: table.to_string(),
                message: format!(
                    "expected {width} fields in data row {}, saw {}",
                    idx0 + 1,
                    row.len()
                ),
            });
        }
    }

    let labels = match header {
        Some(cells) => mangle_labels(cells),
        None => (0..width).map(|i| i.to_string()).collect(),
    };

    // Transpose into columns, padding short rows and mapping null tokens.
    let row_count = data.len();
    let mut columns: Vec<Vec<Cell>> = (0..width).map(|_| Vec::with_capacity(row_count)).collect();
    for row in data {
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            let cell = match cells.next() {
                Some(Cell::Text(s)) if layout.is_na(&s) => Cell::Empty,
                Some(cell) => cell,
                None => Cell::Empty,
            };
            column.push(cell);
        }
    }

    let mut fields = Vec::with_capacity(width);
    let mut typed: Vec<std::vec::IntoIter<Value>> = Vec::with_capacity(width);
    for (label, cells) in labels.into_iter().zip(columns) {
        let (data_type, values) = infer_column(cells);
        fields.push(Field::new(label, data_type));
        typed.push(values.into_iter());
    }

    let rows = (0..row_count)
        .map(|_| {
            typed
                .iter_mut()
                .map(|col| col.next().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Ok(Table::new(Schema::new(fields), rows))
}

/// Empty labels become `Unnamed: {i}`; repeats get `.1`, `.2`, ... suffixes.
fn mangle_labels(cells: Vec<Cell>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(cells.len());
    for (idx, cell) in cells.into_iter().enumerate() {
        let mut label = cell.into_label();
        if label.trim().is_empty() {
            label = format!("Unnamed: {idx}");
        }
        if seen.contains(&label) {
            let mut n = 1;
            while seen.contains(&format!("{label}.{n}")) {
                n += 1;
            }
            label = format!("{label}.{n}");
        }
        seen.insert(label.clone());
        out.push(label);
    }
    out
}

/// Pick the narrowest type every non-empty cell fits, then convert.
///
/// Order of preference: integer, float, boolean, text. Columns with no values are `Float64`.
fn infer_column(cells: Vec<Cell>) -> (DataType, Vec<Value>) {
    let mut present = cells.iter().filter(|c| !matches!(c, Cell::Empty)).peekable();
    if present.peek().is_none() {
        return (DataType::Float64, vec![Value::Null; cells.len()]);
    }

    let data_type = if cells.iter().all(|c| matches!(c, Cell::Empty) || c.as_i64().is_some()) {
        DataType::Int64
    } else if cells.iter().all(|c| matches!(c, Cell::Empty) || c.as_f64().is_some()) {
        DataType::Float64
    } else if cells.iter().all(|c| matches!(c, Cell::Empty) || c.as_bool().is_some()) {
        DataType::Bool
    } else {
        DataType::Utf8
    };

    let values = cells
        .into_iter()
        .map(|cell| {
            if matches!(cell, Cell::Empty) {
                return Value::Null;
            }
            match data_type {
                DataType::Int64 => cell.as_i64().map(Value::Int64).unwrap_or(Value::Null),
                DataType::Float64 => cell.as_f64().map(Value::Float64).unwrap_or(Value::Null),
                DataType::Bool => cell.as_bool().map(Value::Bool).unwrap_or(Value::Null),
                DataType::Utf8 => Value::Utf8(cell.into_text()),
            }
        })
        .collect();

    (data_type, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_grid(rows: &[&[&str]]) -> Vec<Vec<Cell>> {
        rows.iter()
            .map(|r| r.iter().map(|s| Cell::Text(s.to_string())).collect())
            .collect()
    }

    #[test]
    fn infers_int_float_bool_and_text_columns() {
        let grid = text_grid(&[
            &["id", "score", "active", "name"],
            &["1", "1.5", "True", "Ada"],
            &["2", "2", "false", "7"],
        ]);
        let t = build_table("t", grid, &TableLayout::default()).unwrap();
        let types: Vec<DataType> = t.schema.fields.iter().map(|f| f.data_type).collect();
        assert_eq!(
            types,
            vec![DataType::Int64, DataType::Float64, DataType::Bool, DataType::Utf8]
        );
        assert_eq!(t.rows[1][1], Value::Float64(2.0));
        assert_eq!(t.rows[1][3], Value::Utf8("7".to_string()));
    }

    #[test]
    fn null_tokens_and_short_rows_become_null() {
        let grid = text_grid(&[&["a", "b"], &["1", "NA"], &["2"]]);
        let t = build_table("t", grid, &TableLayout::default()).unwrap();
        assert_eq!(t.rows[0][1], Value::Null);
        assert_eq!(t.rows[1][1], Value::Null);
        assert_eq!(t.schema.fields[1].data_type, DataType::Float64);
        assert_eq!(t.schema.fields[0].data_type, DataType::Int64);
    }

    #[test]
    fn long_rows_are_malformed() {
        let grid = text_grid(&[&["a"], &["1", "2"]]);
        let err = build_table("t", grid, &TableLayout::default()).unwrap_err();
        assert!(err.to_string().contains("expected 1 fields in data row 1, saw 2"));
    }

    #[test]
    fn labels_are_mangled() {
        let grid = vec![vec![
            Cell::Text("x".into()),
            Cell::Empty,
            Cell::Text("x".into()),
            Cell::Float(2024.0),
            Cell::Text("x".into()),
        ]];
        let t = build_table("t", grid, &TableLayout::default()).unwrap();
        assert_eq!(t.column_names(), vec!["x", "Unnamed: 1", "x.1", "2024", "x.2"]);
        assert_eq!(t.row_count(), 0);
    }

    #[test]
    fn skiprows_header_and_nrows_select_the_window() {
        let grid = text_grid(&[
            &["# exported"],
            &["junk"],
            &["k"],
            &["1"],
            &["2"],
            &["3"],
        ]);
        let layout = TableLayout::new(1, Some(1), Some(2), &[], true);
        let t = build_table("t", grid, &layout).unwrap();
        assert_eq!(t.column_names(), vec!["k"]);
        assert_eq!(t.rows, vec![vec![Value::Int64(1)], vec![Value::Int64(2)]]);
    }

    #[test]
    fn headerless_tables_number_their_columns() {
        let grid = text_grid(&[&["1", "a"], &["2", "b"]]);
        let layout = TableLayout::new(0, None, None, &[], true);
        let t = build_table("t", grid, &layout).unwrap();
        assert_eq!(t.column_names(), vec!["0", "1"]);
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn missing_header_row_is_malformed() {
        let err = build_table("empty.csv", Vec::new(), &TableLayout::default()).unwrap_err();
        assert!(err.to_string().contains("no columns to parse"));
    }

    #[test]
    fn blank_rows_are_dropped_after_skiprows() {
        let grid = vec![
            vec![],
            vec![Cell::Text("title".into())],
            vec![Cell::Empty, Cell::Empty],
            vec![Cell::Text("a".into())],
            vec![Cell::Int(1)],
            vec![Cell::Empty],
            vec![Cell::Int(2)],
        ];
        let layout = TableLayout::new(2, Some(0), None, &[], true);
        let t = build_table("s", grid, &layout).unwrap();
        assert_eq!(t.column_names(), vec!["a"]);
        assert_eq!(t.rows, vec![vec![Value::Int64(1)], vec![Value::Int64(2)]]);
    }

    #[test]
    fn integral_workbook_floats_are_integers() {
        let grid = vec![
            vec![Cell::Text("n".into())],
            vec![Cell::Float(1.0)],
            vec![Cell::Int(2)],
        ];
        let t = build_table("s", grid, &TableLayout::default()).unwrap();
        assert_eq!(t.schema.fields[0].data_type, DataType::Int64);
        assert_eq!(t.rows[0][0], Value::Int64(1));
    }
}
