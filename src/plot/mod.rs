//! Scatter plots of one column against another.
//!
//! [`scatter_figure`] builds a [`Figure`] (data + layout, shaped like a Plotly figure); a
//! [`ChartRenderer`] turns it into something a front end can draw.
//!
//! ```rust
//! use tabular_explorer::plot::{scatter_figure, ChartRenderer, PlotlyJsonRenderer, ScatterOptions};
//! use tabular_explorer::types::{DataType, Field, Schema, Table, Value};
//!
//! let table = Table::new(
//!     Schema::new(vec![
//!         Field::new("x", DataType::Int64),
//!         Field::new("y", DataType::Float64),
//!     ]),
//!     vec![
//!         vec![Value::Int64(1), Value::Float64(0.5)],
//!         vec![Value::Int64(2), Value::Float64(1.5)],
//!     ],
//! );
//! let fig = scatter_figure(&table, "x", "y", &ScatterOptions::default()).unwrap();
//! assert_eq!(fig.data.len(), 1);
//! let json = PlotlyJsonRenderer::default().render(&fig).unwrap();
//! assert!(json.contains("\"mode\":\"markers\""));
//! ```

mod figure;
mod render;

use serde::{Deserialize, Serialize};

use crate::error::PlotError;
use crate::processing::{filter_eq, reduce, ReduceOp};
use crate::types::{Table, Value};

pub use figure::{Axis, AxisTitle, Figure, Layout, Marker, ScatterTrace};
pub use render::{ChartRenderer, PlotlyJsonRenderer};

/// Continuous colour scales offered for markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Colormap {
    #[default]
    Viridis,
    Cividis,
    Plasma,
    Inferno,
    Magma,
}

/// Marker shapes offered for points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerSymbol {
    Circle,
    #[default]
    X,
    Cross,
    TriangleUp,
    TriangleDown,
}

/// Styling and grouping options for [`scatter_figure`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterOptions {
    pub legend: bool,
    pub colormap: Colormap,
    pub marker: MarkerSymbol,
    /// `1..=10`.
    pub marker_size: u8,
    pub x_lim: Option<(f64, f64)>,
    pub y_lim: Option<(f64, f64)>,
    /// Column whose distinct values split the points into one trace each.
    ///
    /// Ignored when the column does not exist.
    pub target_class: Option<String>,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            legend: true,
            colormap: Colormap::default(),
            marker: MarkerSymbol::default(),
            marker_size: 2,
            x_lim: None,
            y_lim: None,
            target_class: None,
        }
    }
}

/// Upper bound on the number of x ticks before they are thinned out.
const MAX_TICKS: usize = 10;

/// Build a scatter figure of column `y` against column `x`.
pub fn scatter_figure(
    table: &Table,
    x: &str,
    y: &str,
    opts: &ScatterOptions,
) -> Result<Figure, PlotError> {
    if !(1..=10).contains(&opts.marker_size) {
        return Err(PlotError::InvalidMarkerSize {
            size: opts.marker_size,
        });
    }
    let (x_vals, y_vals) = column_pair(table, x, y)?;

    let marker = |color: Option<Vec<Value>>| Marker {
        symbol: opts.marker,
        size: opts.marker_size,
        color,
        colorscale: opts.colormap,
    };

    let class = opts
        .target_class
        .as_deref()
        .filter(|c| table.schema.index_of(c).is_some());

    let data = match class {
        Some(class) => {
            let mut traces = Vec::new();
            for class_value in table.unique(class).unwrap_or_default() {
                let Some(subset) = filter_eq(table, class, &class_value) else {
                    continue;
                };
                let (sx, sy) = column_pair(&subset, x, y)?;
                let name = format!("{y} ({})", class_label(&class_value));
                traces.push(ScatterTrace::markers(name, sx, sy, marker(None)));
            }
            traces
        }
        None => vec![ScatterTrace::markers(
            y.to_string(),
            x_vals.clone(),
            y_vals.clone(),
            marker(Some(y_vals)),
        )],
    };

    let mut xaxis = Axis::titled(x, opts.x_lim);
    xaxis.tickmode = Some("array");
    xaxis.tickvals = Some(tick_values(&x_vals));

    Ok(Figure {
        data,
        layout: Layout {
            xaxis,
            yaxis: Axis::titled(y, opts.y_lim),
            showlegend: opts.legend,
        },
    })
}

/// `(min, max)` of a numeric column, ignoring nulls.
///
/// `None` for unknown, non-numeric or all-null columns.
pub fn axis_bounds(table: &Table, column: &str) -> Option<(f64, f64)> {
    if !table.schema.field(column)?.data_type.is_numeric() {
        return None;
    }
    let lo = reduce(table, column, ReduceOp::Min)?.as_f64()?;
    let hi = reduce(table, column, ReduceOp::Max)?.as_f64()?;
    Some((lo, hi))
}

/// Distinct, sorted, non-null x values thinned to roughly [`MAX_TICKS`] entries.
///
/// Only values that occur in the data are used as ticks.
pub fn tick_values(x: &[Value]) -> Vec<Value> {
    let mut distinct: Vec<Value> = Vec::new();
    for v in x.iter().filter(|v| !v.is_null()) {
        if !distinct.contains(v) {
            distinct.push(v.clone());
        }
    }
    distinct.sort_by(Value::total_cmp);

    let interval = (distinct.len() / MAX_TICKS).max(1);
    distinct.into_iter().step_by(interval).collect()
}

fn column_pair(table: &Table, x: &str, y: &str) -> Result<(Vec<Value>, Vec<Value>), PlotError> {
    let unknown = |column: &str| PlotError::UnknownColumn {
        column: column.to_string(),
    };
    let xs = table.column(x).ok_or_else(|| unknown(x))?.cloned().collect();
    let ys = table.column(y).ok_or_else(|| unknown(y))?.cloned().collect();
    Ok((xs, ys))
}

fn class_label(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
