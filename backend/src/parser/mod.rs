//! Tabular file parsing with per-column type inference.
//!
//! Dispatches on the file extension (`.csv`, `.xlsx`), normalizes headers and
//! decides once, per column, whether it is numeric or text. Anything else is
//! rejected with [`TableError::UnsupportedFormat`].
//!
//! # Example
//! ```ignore
//! use sweeper::{parse, UploadedFile};
//!
//! let file = UploadedFile::new("scores.csv", b"name,score\nA,10\nB,\n".to_vec());
//! let table = parse(&file)?;
//! assert_eq!(table.column_names(), vec!["name", "score"]);
//! ```

pub mod csv;
pub mod excel;

use serde::Serialize;
use std::collections::HashSet;

use crate::error::{TableError, TableResult};
use crate::models::{Cell, Column, ColumnType, Table, UploadedFile};

/// Input extensions the parser accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = [".csv", ".xlsx"];

/// Strings read as missing values, whatever the column type.
const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Where the table came from and how it was read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    /// `"csv"` or `"xlsx"`
    pub format: &'static str,
    /// Detected charset (CSV only)
    pub encoding: Option<String>,
    /// Detected delimiter (CSV only)
    pub delimiter: Option<char>,
    /// Rows that had more fields than the header
    pub truncated_rows: usize,
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: Table,
    pub info: SourceInfo,
}

/// Parse an uploaded file into a [`Table`].
pub fn parse(file: &UploadedFile) -> TableResult<Table> {
    parse_with_info(file).map(|result| result.table)
}

/// Parse an uploaded file, also returning how it was read.
pub fn parse_with_info(file: &UploadedFile) -> TableResult<ParseResult> {
    match file.extension().as_str() {
        ".csv" => csv::parse_bytes_auto(file.bytes()),
        ".xlsx" => excel::parse_xlsx_bytes(file.bytes()),
        other => Err(TableError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

/// Cell for a raw string: `Missing` for NA tokens, `Text` otherwise.
pub fn text_cell(raw: &str) -> Cell {
    if MISSING_TOKENS.contains(&raw) {
        Cell::Missing
    } else {
        Cell::Text(raw.to_string())
    }
}

/// Parse a trimmed string as an integer, then as a finite float.
pub fn parse_number(raw: &str) -> Option<Cell> {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Cell::Int(i));
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(Cell::Float(f)),
        _ => None,
    }
}

/// Give empty headers an `Unnamed: i` name and suffix repeats with `.1`, `.2`, ...
pub fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut normalized = Vec::with_capacity(headers.len());

    for (i, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", i)
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        normalized.push(name);
    }

    normalized
}

/// Assemble a table from a header row and row-major cells.
///
/// Short rows are padded with `Missing`; cells past the header width are dropped.
pub(crate) fn build_table(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> TableResult<Table> {
    let headers = normalize_headers(headers);
    let width = headers.len();

    let mut columns: Vec<Vec<Cell>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
    for row in rows {
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            column.push(cells.next().unwrap_or(Cell::Missing));
        }
    }

    let columns = headers
        .into_iter()
        .zip(columns)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();

    Table::new(columns)
}

/// Decide the column type and convert cells accordingly.
fn infer_column(name: String, cells: Vec<Cell>) -> Column {
    let numeric: Option<Vec<Cell>> = cells
        .iter()
        .map(|cell| match cell {
            Cell::Int(_) | Cell::Float(_) | Cell::Missing => Some(cell.clone()),
            Cell::Text(s) => parse_number(s),
        })
        .collect();

    match numeric {
        Some(values) => Column::new(name, ColumnType::Numeric, values),
        None => {
            let values = cells
                .into_iter()
                .map(|cell| match cell {
                    Cell::Int(_) | Cell::Float(_) => Cell::Text(cell.to_string()),
                    other => other,
                })
                .collect();
            Column::new(name, ColumnType::Text, values)
        }
    }
}
