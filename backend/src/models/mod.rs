//! Domain models shared by the parser, transform and export stages.
//!
//! - [`UploadedFile`] - Raw bytes plus name and declared size
//! - [`Table`] - Ordered, equally long, uniquely named [`Column`]s
//! - [`Cell`] / [`ColumnType`] - Tagged values and per-column type fixed at parse time
//! - [`CleaningOptions`] - Which cleaning passes to run
//! - [`OutputFormat`] / [`ConversionRequest`] / [`OutputArtifact`] - Export request and result

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{TableError, TableResult};

// =============================================================================
// Uploaded File
// =============================================================================

/// A file as received from the upload form or read from disk.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
    size: u64,
}

impl UploadedFile {
    /// Create a file whose declared size is the buffer length.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self {
            name: name.into(),
            bytes,
            size,
        }
    }

    /// Override the declared size (as reported by the client).
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> TableResult<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Declared size in KiB, for display.
    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }

    /// Lowercased final extension including the dot, or `""` if there is none.
    pub fn extension(&self) -> String {
        extension_of(&self.name)
    }
}

/// Lowercased final extension of a file name, including the dot.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

// =============================================================================
// Cells and Columns
// =============================================================================

/// A single table value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Integral number as written in the source.
    Int(i64),
    /// Non-integral number, or a computed value such as a column mean.
    Float(f64),
    Text(String),
    /// No data. Distinct from zero and from the empty string.
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric value, if this cell holds one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => f.write_str(&format_float(*v)),
            Cell::Text(s) => f.write_str(s),
            Cell::Missing => Ok(()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Float(v) => serializer.serialize_f64(*v),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Missing => serializer.serialize_none(),
        }
    }
}

/// Shortest round-trip float text, always with a decimal point (`10.0`, `2.5`).
pub fn format_float(v: f64) -> String {
    let s = format!("{:?}", v);
    if s.contains(['.', 'e', 'E']) || !v.is_finite() {
        s
    } else {
        format!("{}.0", s)
    }
}

/// Column type, decided once when the file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
    pub values: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType, values: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnType::Numeric
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|c| c.is_missing()).count()
    }
}

// =============================================================================
// Table
// =============================================================================

/// An in-memory table.
///
/// Invariants: all columns have the same length and column names are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking both invariants.
    pub fn new(columns: Vec<Column>) -> TableResult<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::InvalidTable(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(TableError::InvalidTable(format!(
                    "column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.len(),
                    first.len()
                )));
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Cells of row `index` in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Cell>> + '_ {
        (0..self.row_count()).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }

    /// Numeric columns in column order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Keep only the rows whose flag is `true`.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.values.retain(|_| *flags.next().unwrap_or(&true));
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Cleaning passes to apply. Both default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleaningOptions {
    pub remove_duplicates: bool,
    pub fill_missing_numeric: bool,
}

impl CleaningOptions {
    pub fn is_noop(&self) -> bool {
        !self.remove_duplicates && !self.fill_missing_numeric
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Export formats. PDF is output-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    #[serde(alias = "xlsx")]
    Excel,
    Pdf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => ".csv",
            OutputFormat::Excel => ".xlsx",
            OutputFormat::Pdf => ".pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            OutputFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Csv => "CSV",
            OutputFormat::Excel => "Excel",
            OutputFormat::Pdf => "PDF",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(format!(
                "unknown output format '{}' (expected csv, excel or pdf)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub target_format: OutputFormat,
}

impl From<OutputFormat> for ConversionRequest {
    fn from(target_format: OutputFormat) -> Self {
        Self { target_format }
    }
}

/// An encoded file ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub bytes: Vec<u8>,
    pub suggested_file_name: String,
    pub mime_type: &'static str,
}
