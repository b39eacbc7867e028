//! Column reductions for [`crate::types::Table`].

use crate::types::{DataType, Table, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`, returns `Some(Value::Null)` if there are no non-null values or the
///   column is not numeric.
/// - For `Count`, always returns `Some(Value::Int64(row_count))`.
pub fn reduce(table: &Table, column: &str, op: ReduceOp) -> Option<Value> {
    let field = table.schema.field(column)?;
    let values = table.column(column)?;

    let out = match (op, field.data_type) {
        (ReduceOp::Count, _) => Value::Int64(table.row_count() as i64),
        (_, DataType::Int64) => {
            let ints = values.filter_map(|v| match v {
                Value::Int64(i) => Some(*i),
                _ => None,
            });
            fold_numeric(ints, op, |a, b| a.saturating_add(b))
                .map(Value::Int64)
                .unwrap_or(Value::Null)
        }
        (_, DataType::Float64) => {
            let floats = values.filter_map(|v| match v {
                Value::Float64(f) if !f.is_nan() => Some(*f),
                _ => None,
            });
            fold_numeric(floats, op, |a, b| a + b)
                .map(Value::Float64)
                .unwrap_or(Value::Null)
        }
        _ => Value::Null,
    };
    Some(out)
}

fn fold_numeric<T, I, S>(values: I, op: ReduceOp, add: S) -> Option<T>
where
    T: PartialOrd + Copy,
    I: Iterator<Item = T>,
    S: Fn(T, T) -> T,
{
    values.reduce(|acc, v| match op {
        ReduceOp::Sum => add(acc, v),
        ReduceOp::Min => {
            if v < acc {
                v
            } else {
                acc
            }
        }
        ReduceOp::Max => {
            if v > acc {
                v
            } else {
                acc
            }
        }
        ReduceOp::Count => acc,
    })
}
