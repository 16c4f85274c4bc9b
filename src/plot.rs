//! Chart specifications for model metrics and exploratory plots.
//!
//! Charts are described as Plotly `(traces, layout)` JSON. The browser
//! crate hands them to `Plotly.newPlot` unchanged, so everything about a
//! chart's content is decided (and tested) here.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};

use crate::api::PlotData;
use crate::error::PlotError;
use crate::stats::format_number;

const METRIC_BAR_COLOR: &str = "rgb(255, 105, 180)";
const PLOT_FILL: &str = "rgba(75, 192, 192, 0.2)";
const PLOT_BORDER: &str = "rgba(75, 192, 192, 1)";

/// A chart ready for Plotly.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub traces: Value,
    pub layout: Value,
}

impl ChartSpec {
    pub fn title(&self) -> Option<&str> {
        self.layout.get("title").and_then(Value::as_str)
    }
}

/// Exploratory plot kinds offered on the plots page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Histogram,
    Scatter,
    Bar,
}

impl PlotKind {
    pub const ALL: [PlotKind; 3] = [PlotKind::Histogram, PlotKind::Scatter, PlotKind::Bar];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlotKind::Histogram => "histogram",
            PlotKind::Scatter => "scatter",
            PlotKind::Bar => "bar",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlotKind::Histogram => "Histogram",
            PlotKind::Scatter => "Scatter Plot",
            PlotKind::Bar => "Bar Chart",
        }
    }

    pub fn needs_y(&self) -> bool {
        !matches!(self, PlotKind::Histogram)
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(PlotError::MissingPlotType),
            "histogram" => Ok(PlotKind::Histogram),
            "scatter" => Ok(PlotKind::Scatter),
            "bar" => Ok(PlotKind::Bar),
            other => Err(PlotError::UnsupportedPlotType(other.to_string())),
        }
    }
}

/// A validated plot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotRequest {
    pub kind: PlotKind,
    pub x: String,
    pub y: Option<String>,
}

impl PlotRequest {
    /// Validate the selector values in the order the user fills them in.
    pub fn from_selection(plot_type: &str, x: &str, y: &str) -> Result<Self, PlotError> {
        let kind: PlotKind = plot_type.parse()?;
        if x.is_empty() {
            return Err(PlotError::MissingX);
        }
        if kind.needs_y() && y.is_empty() {
            return Err(PlotError::MissingY);
        }
        Ok(PlotRequest {
            kind,
            x: x.to_string(),
            y: (!y.is_empty()).then(|| y.to_string()),
        })
    }

    /// Query parameters for the plot-data endpoint.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("x_variable", self.x.clone()),
            ("y_variable", self.y.clone().unwrap_or_default()),
            ("plot_type", self.kind.as_str().to_string()),
        ]
    }

    /// Plotly spec for the data the backend returned.
    pub fn chart(&self, data: &PlotData) -> ChartSpec {
        let y_name = self.y.clone().unwrap_or_default();
        let trace = match self.kind {
            PlotKind::Histogram => json!({
                "type": "bar",
                "name": self.x,
                "x": data.labels,
                "y": data.values,
                "marker": {"color": PLOT_FILL, "line": {"color": PLOT_BORDER, "width": 1}},
            }),
            PlotKind::Scatter => json!({
                "type": "scatter",
                "mode": "markers",
                "name": format!("Scatter Plot of {} vs {}", self.x, y_name),
                "x": data.points.iter().map(|p| p.x).collect::<Vec<_>>(),
                "y": data.points.iter().map(|p| p.y).collect::<Vec<_>>(),
                "marker": {"color": PLOT_FILL, "line": {"color": PLOT_BORDER, "width": 1}},
            }),
            PlotKind::Bar => json!({
                "type": "bar",
                "name": y_name,
                "x": data.labels,
                "y": data.values,
                "marker": {"color": PLOT_FILL, "line": {"color": PLOT_BORDER, "width": 1}},
            }),
        };
        let layout = json!({
            "title": match self.kind {
                PlotKind::Histogram => format!("Distribution of {}", self.x),
                _ => format!("{} vs {}", self.x, y_name),
            },
            "showlegend": true,
            "xaxis": {"title": self.x},
            "yaxis": {
                "title": if self.kind.needs_y() { y_name.clone() } else { "count".to_string() },
                "rangemode": "tozero",
            },
            "paper_bgcolor": "rgba(0,0,0,0)",
            "plot_bgcolor": "rgba(0,0,0,0)",
        });
        ChartSpec {
            traces: Value::Array(vec![trace]),
            layout,
        }
    }
}

/// How a model's result mapping gets charted.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsView {
    /// `accuracy` present: the classification metrics that were reported.
    Classification(Vec<(&'static str, f64)>),
    /// A train/test score pair.
    Scores { train: f64, test: f64 },
    /// Other numeric top-level entries.
    Generic(Vec<(String, f64)>),
    /// Nothing numeric to draw.
    Unchartable,
}

fn number(results: &Map<String, Value>, key: &str) -> Option<f64> {
    results.get(key).and_then(Value::as_f64)
}

impl MetricsView {
    /// Classify a result mapping by the keys it carries.
    pub fn new(results: &Map<String, Value>) -> Self {
        if results.contains_key("accuracy") {
            let metrics = [
                ("Accuracy", "accuracy"),
                ("Precision", "precision"),
                ("Recall", "recall"),
                ("F1", "f1"),
            ]
            .into_iter()
            .filter_map(|(label, key)| number(results, key).map(|v| (label, v)))
            .collect();
            return MetricsView::Classification(metrics);
        }
        for (train_key, test_key) in [("train_score", "test_score"), ("train_metric", "test_metric")]
        {
            if results.contains_key(train_key)
                && let (Some(train), Some(test)) =
                    (number(results, train_key), number(results, test_key))
            {
                return MetricsView::Scores { train, test };
            }
        }
        let generic: Vec<(String, f64)> = results
            .iter()
            .filter_map(|(k, v)| v.as_f64().map(|f| (k.clone(), f)))
            .collect();
        if generic.is_empty() {
            MetricsView::Unchartable
        } else {
            MetricsView::Generic(generic)
        }
    }

    /// Bar chart of the metrics, if there is anything to draw.
    pub fn chart(&self) -> Option<ChartSpec> {
        let (title, labels, values): (&str, Vec<String>, Vec<f64>) = match self {
            MetricsView::Classification(metrics) if !metrics.is_empty() => (
                "Classification Metrics",
                metrics.iter().map(|(l, _)| l.to_string()).collect(),
                metrics.iter().map(|(_, v)| *v).collect(),
            ),
            MetricsView::Scores { train, test } => (
                "Model Performance",
                vec!["Training Score".into(), "Test Score".into()],
                vec![*train, *test],
            ),
            MetricsView::Generic(metrics) => (
                "Model Metrics",
                metrics.iter().map(|(l, _)| l.clone()).collect(),
                metrics.iter().map(|(_, v)| *v).collect(),
            ),
            _ => return None,
        };
        Some(ChartSpec {
            traces: json!([{
                "x": labels,
                "y": values,
                "type": "bar",
                "marker": {"color": METRIC_BAR_COLOR},
            }]),
            layout: json!({
                "title": title,
                "paper_bgcolor": "rgba(0,0,0,0)",
                "plot_bgcolor": "rgba(0,0,0,0)",
                "font": {"color": "#fff"},
                "margin": {"t": 50, "b": 50, "l": 50, "r": 50},
            }),
        })
    }
}

/// Key/value listing of a result mapping for the results table.
pub fn result_rows(results: &Map<String, Value>) -> Vec<(String, String)> {
    results
        .iter()
        .map(|(k, v)| {
            let text = match v {
                Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Point;

    fn results(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_validation_order() {
        assert_eq!(
            PlotRequest::from_selection("", "", ""),
            Err(PlotError::MissingPlotType)
        );
        assert_eq!(
            PlotRequest::from_selection("scatter", "", "y"),
            Err(PlotError::MissingX)
        );
        assert_eq!(
            PlotRequest::from_selection("bar", "x", ""),
            Err(PlotError::MissingY)
        );
        assert!(matches!(
            PlotRequest::from_selection("pie", "x", "y"),
            Err(PlotError::UnsupportedPlotType(_))
        ));
        let hist = PlotRequest::from_selection("histogram", "age", "").unwrap();
        assert_eq!(hist.y, None);
    }

    #[test]
    fn test_query_pairs() {
        let req = PlotRequest::from_selection("scatter", "age", "income").unwrap();
        assert_eq!(
            req.query(),
            [
                ("x_variable", "age".to_string()),
                ("y_variable", "income".to_string()),
                ("plot_type", "scatter".to_string()),
            ]
        );
    }

    #[test]
    fn test_scatter_chart_uses_points() {
        let req = PlotRequest::from_selection("scatter", "age", "income").unwrap();
        let data = PlotData {
            points: vec![Point { x: 1.0, y: 2.0 }, Point { x: 3.0, y: 4.0 }],
            ..PlotData::default()
        };
        let chart = req.chart(&data);
        assert_eq!(chart.traces[0]["name"], "Scatter Plot of age vs income");
        assert_eq!(chart.traces[0]["x"], json!([1.0, 3.0]));
        assert_eq!(chart.traces[0]["y"], json!([2.0, 4.0]));
    }

    #[test]
    fn test_histogram_named_after_x() {
        let req = PlotRequest::from_selection("histogram", "age", "").unwrap();
        let data = PlotData {
            labels: vec![json!("0-10"), json!("10-20")],
            values: vec![4.0, 9.0],
            ..PlotData::default()
        };
        let chart = req.chart(&data);
        assert_eq!(chart.traces[0]["type"], "bar");
        assert_eq!(chart.traces[0]["name"], "age");
        assert_eq!(chart.title(), Some("Distribution of age"));
    }

    #[test]
    fn test_classification_metrics_branch() {
        let view = MetricsView::new(&results(json!({
            "accuracy": 0.9, "precision": 0.8, "recall": 0.7, "f1": 0.75
        })));
        let chart = view.chart().unwrap();
        assert_eq!(chart.title(), Some("Classification Metrics"));
        assert_eq!(
            chart.traces[0]["x"],
            json!(["Accuracy", "Precision", "Recall", "F1"])
        );
    }

    #[test]
    fn test_naive_bayes_accuracy_only() {
        let view = MetricsView::new(&results(json!({
            "accuracy": 0.9, "classification_report": "...text..."
        })));
        assert_eq!(view, MetricsView::Classification(vec![("Accuracy", 0.9)]));
    }

    #[test]
    fn test_score_pairs() {
        let view = MetricsView::new(&results(json!({"train_score": 0.99, "test_score": 0.8})));
        assert_eq!(view, MetricsView::Scores { train: 0.99, test: 0.8 });
        assert_eq!(view.chart().unwrap().title(), Some("Model Performance"));

        let view = MetricsView::new(&results(json!({"train_metric": 0.9, "test_metric": 0.7})));
        assert_eq!(view, MetricsView::Scores { train: 0.9, test: 0.7 });
    }

    #[test]
    fn test_generic_and_unchartable() {
        let view = MetricsView::new(&results(json!({"mse": 2.5, "r2": 0.6})));
        assert!(matches!(view, MetricsView::Generic(ref m) if m.len() == 2));

        let view = MetricsView::new(&results(json!({"model_metrics": [1, 2]})));
        assert_eq!(view, MetricsView::Unchartable);
        assert!(view.chart().is_none());
    }

    #[test]
    fn test_result_rows_format_values() {
        let rows = result_rows(&results(json!({"accuracy": 1.0, "note": "ok", "list": [1]})));
        assert!(rows.contains(&("accuracy".to_string(), "1".to_string())));
        assert!(rows.contains(&("note".to_string(), "ok".to_string())));
        assert!(rows.contains(&("list".to_string(), "[1]".to_string())));
    }
}
