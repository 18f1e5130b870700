//! Table export to CSV, Excel and PDF.
//!
//! [`convert`] is a flat dispatch over [`OutputFormat`]; each encoder writes one
//! in-memory buffer and any library failure becomes [`TableError::Encoding`].

pub mod csv;
pub mod excel;
pub mod pdf;

use crate::error::TableResult;
use crate::models::{ConversionRequest, OutputArtifact, OutputFormat, Table};

/// Encode `table` in the requested format.
///
/// The suggested file name is `original_file_name` with `original_extension`
/// swapped for the target extension.
pub fn convert(
    table: &Table,
    request: &ConversionRequest,
    original_file_name: &str,
    original_extension: &str,
) -> TableResult<OutputArtifact> {
    let format = request.target_format;

    let bytes = match format {
        OutputFormat::Csv => csv::to_csv_bytes(table)?,
        OutputFormat::Excel => excel::to_xlsx_bytes(table)?,
        OutputFormat::Pdf => pdf::to_pdf_bytes(table)?,
    };

    Ok(OutputArtifact {
        bytes,
        suggested_file_name: output_file_name(original_file_name, original_extension, format),
        mime_type: format.mime_type(),
    })
}

/// Replace a trailing `extension` (case-insensitive) with the format's extension,
/// or append it when the name does not end with `extension`.
pub fn output_file_name(file_name: &str, extension: &str, format: OutputFormat) -> String {
    let stem = match file_name.len().checked_sub(extension.len()) {
        Some(cut)
            if !extension.is_empty()
                && file_name.is_char_boundary(cut)
                && file_name[cut..].eq_ignore_ascii_case(extension) =>
        {
            &file_name[..cut]
        }
        _ => file_name,
    };
    format!("{}{}", stem, format.extension())
}
