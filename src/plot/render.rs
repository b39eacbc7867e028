use crate::error::PlotError;

use super::Figure;

/// Turns a [`Figure`] into a drawable artifact.
///
/// The concrete charting front end lives outside this crate; implement this trait to plug
/// one in.
pub trait ChartRenderer {
    type Output;

    fn render(&self, figure: &Figure) -> Result<Self::Output, PlotError>;
}

/// Serializes figures as Plotly figure JSON (`{"data": [...], "layout": {...}}`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotlyJsonRenderer {
    pub pretty: bool,
}

impl ChartRenderer for PlotlyJsonRenderer {
    type Output = String;

    fn render(&self, figure: &Figure) -> Result<String, PlotError> {
        let out = if self.pretty {
            serde_json::to_string_pretty(figure)
        } else {
            serde_json::to_string(figure)
        };
        out.map_err(|e| PlotError::Render {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{scatter_figure, ScatterOptions};
    use crate::types::{DataType, Field, Schema, Table, Value};

    #[test]
    fn renders_plotly_shape() {
        let table = Table::new(
            Schema::new(vec![
                Field::new("x", DataType::Int64),
                Field::new("y", DataType::Float64),
            ]),
            vec![
                vec![Value::Int64(1), Value::Float64(2.0)],
                vec![Value::Int64(2), Value::Null],
            ],
        );
        let fig = scatter_figure(&table, "x", "y", &ScatterOptions::default()).unwrap();
        let json = PlotlyJsonRenderer::default().render(&fig).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["data"][0]["type"], "scatter");
        assert_eq!(parsed["data"][0]["marker"]["symbol"], "x");
        assert_eq!(parsed["data"][0]["marker"]["colorscale"], "Viridis");
        assert_eq!(parsed["data"][0]["y"][1], serde_json::Value::Null);
        assert_eq!(parsed["layout"]["xaxis"]["title"]["text"], "x");
        assert_eq!(parsed["layout"]["xaxis"]["tickvals"], serde_json::json!([1, 2]));
        assert!(parsed["layout"]["yaxis"].get("range").is_none());
    }
}
