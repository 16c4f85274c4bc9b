//! Display model for the dataset statistics returned on upload.

use crate::api::{DatasetStatistics, OrderedMap};

/// Column names longer than this are shortened in the null-value grid.
pub const NAME_DISPLAY_LIMIT: usize = 20;

/// Cells per row in the null-value grid.
pub const GRID_COLUMNS: usize = 3;

/// Render a number without a spurious `.0` on whole values.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else if value.is_finite() {
        let rounded = format!("{value:.4}");
        rounded.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        value.to_string()
    }
}

fn format_cell(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| "-".to_string())
}

/// Shorten a column name for the grid; the full name goes in a tooltip.
pub fn display_name(name: &str) -> String {
    if name.chars().count() > NAME_DISPLAY_LIMIT {
        let head: String = name.chars().take(NAME_DISPLAY_LIMIT).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// One cell of the null-value grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullCell {
    pub column: String,
    pub label: String,
    pub count: String,
}

/// Per-column value counts for a categorical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCounts {
    pub column: String,
    pub counts: Vec<(String, String)>,
}

/// Mean / variance / std for one numeric column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub column: String,
    pub mean: String,
    pub variance: String,
    pub std_dev: String,
}

/// Square correlation table in the backend's column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorrelationTable {
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<String>)>,
}

/// Everything the statistics panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsView {
    pub dimensions: String,
    pub duplicates: String,
    pub target_column: Option<String>,
    pub task_type: Option<String>,
    pub analysis_error: Option<String>,
    pub null_grid: Vec<Vec<NullCell>>,
    pub categories: Vec<CategoryCounts>,
    pub summary: Vec<SummaryRow>,
    pub correlation: CorrelationTable,
}

impl StatisticsView {
    pub fn new(stats: &DatasetStatistics) -> Self {
        Self {
            dimensions: format!(
                "{} rows × {} columns",
                format_number(stats.shape[0]),
                format_number(stats.shape[1])
            ),
            duplicates: format_number(stats.duplicates_count),
            target_column: stats.target_column.clone(),
            task_type: stats.task_type.clone(),
            analysis_error: stats.analysis_error.clone(),
            null_grid: null_grid(&stats.null_values),
            categories: categories(&stats.category_analysis),
            summary: summary_rows(stats),
            correlation: correlation_table(&stats.correlation_with_all_variables),
        }
    }
}

/// Null counts laid out [`GRID_COLUMNS`] to a row.
pub fn null_grid(null_values: &OrderedMap<f64>) -> Vec<Vec<NullCell>> {
    let cells: Vec<NullCell> = null_values
        .iter()
        .map(|(column, count)| NullCell {
            column: column.to_string(),
            label: display_name(column),
            count: format_number(*count),
        })
        .collect();
    cells.chunks(GRID_COLUMNS).map(<[NullCell]>::to_vec).collect()
}

fn categories(analysis: &OrderedMap<OrderedMap<f64>>) -> Vec<CategoryCounts> {
    analysis
        .iter()
        .map(|(column, counts)| CategoryCounts {
            column: column.to_string(),
            counts: counts
                .iter()
                .map(|(value, n)| (value.to_string(), format_number(*n)))
                .collect(),
        })
        .collect()
}

/// One row per column that has a mean; variance and std are looked up by name.
fn summary_rows(stats: &DatasetStatistics) -> Vec<SummaryRow> {
    stats
        .mean_values
        .iter()
        .map(|(column, mean)| SummaryRow {
            column: column.to_string(),
            mean: format_cell(*mean),
            variance: format_cell(stats.variance_values.get(column).copied().flatten()),
            std_dev: format_cell(stats.std_values.get(column).copied().flatten()),
        })
        .collect()
}

/// Full matrix; a missing pair shows as `-`.
pub fn correlation_table(matrix: &OrderedMap<OrderedMap<Option<f64>>>) -> CorrelationTable {
    let columns: Vec<String> = matrix.keys().map(str::to_string).collect();
    let rows = matrix
        .iter()
        .map(|(row, values)| {
            let cells = columns
                .iter()
                .map(|col| format_cell(values.get(col).copied().flatten()))
                .collect();
            (row.to_string(), cells)
        })
        .collect();
    CorrelationTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::decode;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.123456), "0.1235");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_long_names_are_truncated() {
        assert_eq!(display_name("short"), "short");
        assert_eq!(
            display_name("a_very_long_column_name_indeed"),
            "a_very_long_column_n..."
        );
    }

    #[test]
    fn test_null_grid_rows_of_three() {
        let nulls: OrderedMap<f64> =
            decode(r#"{"a": 0, "b": 1, "c": 2, "d": 3, "e": 4}"#).unwrap();
        let grid = null_grid(&nulls);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].len(), 3);
        assert_eq!(grid[1].len(), 2);
        assert_eq!(grid[1][1].column, "e");
        assert_eq!(grid[1][1].count, "4");
    }

    #[test]
    fn test_view_from_upload_statistics() {
        let stats: DatasetStatistics = decode(
            r#"{
                "shape": [150, 5],
                "duplicates_count": 1.0,
                "null_values": {"sepal": 0.0, "species": 0.0},
                "mean_values": {"sepal": 5.8433},
                "variance_values": {"sepal": 0.6857},
                "std_values": {},
                "correlation_with_all_variables": {
                    "sepal": {"sepal": 1.0, "petal": 0.8718},
                    "petal": {"sepal": 0.8718}
                },
                "category_analysis": {"species": {"setosa": 50.0}},
                "task_type": "classification"
            }"#,
        )
        .unwrap();
        let view = StatisticsView::new(&stats);
        assert_eq!(view.dimensions, "150 rows × 5 columns");
        assert_eq!(view.duplicates, "1");
        assert_eq!(
            view.summary,
            [SummaryRow {
                column: "sepal".into(),
                mean: "5.8433".into(),
                variance: "0.6857".into(),
                std_dev: "-".into(),
            }]
        );
        assert_eq!(view.correlation.columns, ["sepal", "petal"]);
        assert_eq!(view.correlation.rows[1].1, ["0.8718", "-"]);
        assert_eq!(view.categories[0].counts, [("setosa".to_string(), "50".to_string())]);
    }

    #[test]
    fn test_empty_statistics_render_empty_sections() {
        let view = StatisticsView::new(&DatasetStatistics::default());
        assert_eq!(view.dimensions, "0 rows × 0 columns");
        assert!(view.null_grid.is_empty());
        assert!(view.summary.is_empty());
        assert!(view.correlation.columns.is_empty());
    }
}
