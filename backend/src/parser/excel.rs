//! XLSX reading: first worksheet, first row as header.

use calamine::{Data, DataType, Reader, Xlsx};
use std::io::Cursor;

use crate::error::{TableError, TableResult};
use crate::models::Cell;

use super::{build_table, text_cell, ParseResult, SourceInfo};

/// Largest float that converts to `i64` without losing precision.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Parse XLSX bytes from the first worksheet.
pub fn parse_xlsx_bytes(bytes: &[u8]) -> TableResult<ParseResult> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| TableError::malformed("xlsx", e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::malformed("xlsx", "no worksheet found"))?
        .map_err(|e| TableError::malformed("xlsx", e))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(header_text).collect(),
        None => return Err(TableError::EmptyFile),
    };

    let body: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(excel_cell).collect())
        .collect();

    Ok(ParseResult {
        table: build_table(headers, body)?,
        info: SourceInfo {
            format: "xlsx",
            encoding: None,
            delimiter: None,
            truncated_rows: 0,
        },
    })
}

/// Header cell as text; numbers print without a trailing `.0`.
fn header_text(cell: &Data) -> String {
    match excel_cell(cell) {
        Cell::Missing => String::new(),
        other => other.to_string(),
    }
}

fn excel_cell(cell: &Data) -> Cell {
    match cell {
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => float_cell(*f),
        Data::String(s) => text_cell(s),
        Data::Bool(b) => Cell::Text(if *b { "True" } else { "False" }.to_string()),
        Data::Empty | Data::Error(_) => Cell::Missing,
        other => match other.as_datetime() {
            Some(dt) => Cell::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Text(other.to_string()),
        },
    }
}

/// Excel stores every number as a float; integral ones become `Int`.
fn float_cell(f: f64) -> Cell {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INT {
        Cell::Int(f as i64)
    } else {
        Cell::Float(f)
    }
}
