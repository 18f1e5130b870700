//! Preview rows and default chart series for display.

use serde::Serialize;

use crate::models::{Cell, ColumnType, Table};

/// Rows shown in a preview.
pub const PREVIEW_ROWS: usize = 5;

/// Numeric columns plotted in the default bar chart.
pub const CHART_COLUMNS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnType,
    pub missing: usize,
}

/// One bar-chart series; `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub row_count: usize,
    pub columns: Vec<ColumnInfo>,
    /// First rows, cells in column order
    pub preview: Vec<Vec<Cell>>,
    pub chart: Vec<ChartSeries>,
}

/// Build the preview and chart data for a table.
pub fn summarize(table: &Table) -> Summary {
    let columns = table
        .columns()
        .iter()
        .map(|c| ColumnInfo {
            name: c.name.clone(),
            kind: c.kind,
            missing: c.missing_count(),
        })
        .collect();

    let preview = table
        .rows()
        .take(PREVIEW_ROWS)
        .map(|row| row.into_iter().cloned().collect())
        .collect();

    let chart = table
        .numeric_columns()
        .take(CHART_COLUMNS)
        .map(|c| ChartSeries {
            name: c.name.clone(),
            values: c.values.iter().map(Cell::as_f64).collect(),
        })
        .collect();

    Summary {
        row_count: table.row_count(),
        columns,
        preview,
        chart,
    }
}
