//! Serializable figure model in Plotly's JSON shape.

use serde::Serialize;

use crate::types::Value;

use super::{Colormap, MarkerSymbol};

/// A complete chart: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<ScatterTrace>,
    pub layout: Layout,
}

/// One marker series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<Value>,
    pub y: Vec<Value>,
    pub marker: Marker,
}

impl ScatterTrace {
    pub(crate) fn markers(name: String, x: Vec<Value>, y: Vec<Value>, marker: Marker) -> Self {
        Self {
            kind: "scatter",
            mode: "markers",
            name,
            x,
            y,
            marker,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub symbol: MarkerSymbol,
    pub size: u8,
    /// Per-point colour values; only set for ungrouped plots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<Value>>,
    pub colorscale: Colormap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<Value>>,
}

impl Axis {
    pub(crate) fn titled(title: &str, range: Option<(f64, f64)>) -> Self {
        Self {
            title: AxisTitle {
                text: title.to_string(),
            },
            range: range.map(|(lo, hi)| [lo, hi]),
            tickmode: None,
            tickvals: None,
        }
    }
}
