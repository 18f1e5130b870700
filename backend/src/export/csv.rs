//! CSV encoding: comma-delimited, header row, no index column.

use crate::error::{TableError, TableResult};
use crate::models::{OutputFormat, Table};

/// Encode a table as CSV bytes.
pub fn to_csv_bytes(table: &Table) -> TableResult<Vec<u8>> {
    let encoding_err = |e: ::csv::Error| TableError::encoding(OutputFormat::Csv, e);

    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if table.column_count() > 0 {
        writer
            .write_record(table.column_names())
            .map_err(encoding_err)?;
    }

    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(encoding_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| TableError::encoding(OutputFormat::Csv, e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Column, ColumnType};

    #[test]
    fn test_quotes_when_needed() {
        let table = Table::new(vec![
            Column::new(
                "name",
                ColumnType::Text,
                vec![Cell::Text("Smith, Alice".into()), Cell::Missing],
            ),
            Column::new("v", ColumnType::Numeric, vec![Cell::Float(2.5), Cell::Int(3)]),
        ])
        .unwrap();

        let bytes = to_csv_bytes(&table).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "name,v\n\"Smith, Alice\",2.5\n,3\n"
        );
    }

    #[test]
    fn test_empty_table() {
        let bytes = to_csv_bytes(&Table::default()).unwrap();
        assert!(bytes.is_empty());
    }
}
