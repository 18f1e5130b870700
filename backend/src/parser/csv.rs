//! CSV reading with encoding and delimiter auto-detection.

use crate::error::{TableError, TableResult};
use crate::models::{Cell, Table};

use super::{build_table, text_cell, ParseResult, SourceInfo};

/// Delimiters tried by [`detect_delimiter`], in tie-break order.
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 wins outright; otherwise `chardet` decides.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding, stripping any BOM.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        // WINDOWS_1252 is a superset of the printable ISO-8859-1 range
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Falls back to `,` when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> TableResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);

    let (table, truncated_rows) = parse_str(&content, delimiter)?;

    Ok(ParseResult {
        table,
        info: SourceInfo {
            format: "csv",
            encoding: Some(encoding),
            delimiter: Some(delimiter),
            truncated_rows,
        },
    })
}

/// Parse CSV text with an explicit delimiter.
///
/// Returns the table and the number of rows that had more fields than the header.
pub fn parse_str(content: &str, delimiter: char) -> TableResult<(Table, usize)> {
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| TableError::malformed("csv", format!("delimiter '{}' is not ASCII", delimiter)))?;

    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader
        .records()
        .filter(|record| !matches!(record, Ok(r) if is_blank(r)));

    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|e| TableError::malformed("csv", e))?
            .iter()
            .map(str::to_string)
            .collect(),
        None => return Err(TableError::EmptyFile),
    };

    let width = headers.len();
    let mut truncated_rows = 0;
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for record in records {
        let record = record.map_err(|e| TableError::malformed("csv", e))?;
        if record.len() > width {
            truncated_rows += 1;
        }
        rows.push(record.iter().map(text_cell).collect());
    }

    Ok((build_table(headers, rows)?, truncated_rows))
}

/// A line holding only whitespace. Rows like `,,` have several fields and are kept.
fn is_blank(record: &::csv::StringRecord) -> bool {
    record.len() == 1 && record[0].trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnType;

    fn parse(content: &str) -> Table {
        parse_bytes_auto(content.as_bytes()).unwrap().table
    }

    #[test]
    fn test_simple_csv() {
        let table = parse("name,age\nAlice,30\nBob,25");

        assert_eq!(table.column_names(), vec!["name", "age"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("age").unwrap().values, vec![Cell::Int(30), Cell::Int(25)]);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let result = parse_bytes_auto(b"a;b;c\n1;2;3").unwrap();
        assert_eq!(result.info.delimiter, Some(';'));
        assert_eq!(result.table.column_count(), 3);
    }

    #[test]
    fn test_quoted_values() {
        let table = parse("name,value\n\"Smith, Alice\",\"Hello \"\"World\"\"\"\n");
        assert_eq!(
            table.column("name").unwrap().values[0],
            Cell::Text("Smith, Alice".into())
        );
        assert_eq!(
            table.column("value").unwrap().values[0],
            Cell::Text("Hello \"World\"".into())
        );
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse("a,b\n1,2\n\n3,4\n");
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_whitespace_only_lines_skipped() {
        let table = parse("a,b\n1,2\n   \n3,4\n");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("a").unwrap().kind, ColumnType::Numeric);
        assert_eq!(
            table.column("a").unwrap().values,
            vec![Cell::Int(1), Cell::Int(3)]
        );
    }

    #[test]
    fn test_leading_whitespace_line_before_header() {
        let table = parse("  \nid,name\n1,x\n");
        assert_eq!(table.column_names(), vec!["id", "name"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_all_empty_row_is_kept() {
        let table = parse("a,b\n1,2\n,\n");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("a").unwrap().values[1], Cell::Missing);
        assert_eq!(table.column("b").unwrap().kind, ColumnType::Numeric);
    }

    #[test]
    fn test_missing_values() {
        let table = parse("a,b,c\n1,,3");
        assert_eq!(table.column("b").unwrap().values, vec![Cell::Missing]);
        assert_eq!(table.column("b").unwrap().kind, ColumnType::Numeric);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let result = parse_bytes_auto(b"a,b\n1,2,3,4").unwrap();
        assert_eq!(result.table.column_count(), 2);
        assert_eq!(result.info.truncated_rows, 1);
        assert_eq!(result.table.column("b").unwrap().values, vec![Cell::Int(2)]);
    }

    #[test]
    fn test_header_only() {
        let table = parse("a,b\n");
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(
            parse_bytes_auto(b""),
            Err(TableError::EmptyFile)
        ));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single\n1"), ',');
        assert_eq!(detect_delimiter("a,b;c\n"), ',');
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"id,name\n1,x\n");
        let table = parse_bytes_auto(&bytes).unwrap().table;
        assert_eq!(table.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_non_utf8_input_is_decoded() {
        // "nom\nSociété\n" in ISO-8859-1
        let bytes: &[u8] = b"nom\nSoci\xE9t\xE9\n";
        let result = parse_bytes_auto(bytes).unwrap();
        let value = result.table.column("nom").unwrap().values[0].to_string();
        assert!(value.starts_with("Soci"));
    }
}
