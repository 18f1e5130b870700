//! XLSX encoding: one worksheet, header row, no index column.

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::error::{TableError, TableResult};
use crate::models::{Cell, OutputFormat, Table};

/// Encode a table as an XLSX workbook.
pub fn to_xlsx_bytes(table: &Table) -> TableResult<Vec<u8>> {
    write_workbook(table).map_err(|e| TableError::encoding(OutputFormat::Excel, e))
}

fn write_workbook(table: &Table) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;

    for (col, name) in table.column_names().into_iter().enumerate() {
        worksheet.write_string(0, col_index(col)?, name)?;
    }

    for (row_idx, row) in table.rows().enumerate() {
        let row_num = row_index(row_idx + 1)?;
        for (col, cell) in row.into_iter().enumerate() {
            let col = col_index(col)?;
            match cell {
                Cell::Int(i) => {
                    worksheet.write_number(row_num, col, *i as f64)?;
                }
                Cell::Float(f) => {
                    worksheet.write_number(row_num, col, *f)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                Cell::Missing => {}
            }
        }
    }

    workbook.save_to_buffer()
}

fn row_index(row: usize) -> Result<u32, XlsxError> {
    u32::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_index(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
