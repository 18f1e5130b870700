//! High-level pipeline API: parse, clean, select, summarize and export one file.
//!
//! Every call works on its own [`FileRequest`]; nothing is shared between files,
//! so a failure in one never affects another.
//!
//! # Example
//!
//! ```rust,ignore
//! use sweeper::{process_batch, FileRequest, UploadedFile};
//!
//! let requests = vec![
//!     FileRequest::new(UploadedFile::new("a.csv", a_bytes)),
//!     FileRequest::new(UploadedFile::new("b.txt", b_bytes)),
//! ];
//! for outcome in process_batch(requests) {
//!     match outcome.result {
//!         Ok(processed) => println!("{}: {} rows", outcome.file_name, processed.table.row_count()),
//!         Err(e) => eprintln!("{}: {}", outcome.file_name, e),
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::clean::clean;
use super::select::select_columns;
use super::summary::{summarize, Summary};
use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::error::TableResult;
use crate::export::convert;
use crate::models::{CleaningOptions, OutputArtifact, OutputFormat, Table, UploadedFile};
use crate::parser::{parse_with_info, SourceInfo};

/// Options applied to one file after parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileOptions {
    #[serde(flatten)]
    pub cleaning: CleaningOptions,

    /// Columns to keep, in order. `None` keeps every column.
    pub columns: Option<Vec<String>>,

    /// Include chart series in the summary.
    pub visualize: bool,
}

/// One file plus the options chosen for it.
#[derive(Debug, Clone)]
pub struct FileRequest {
    pub file: UploadedFile,
    pub options: FileOptions,
}

impl FileRequest {
    pub fn new(file: UploadedFile) -> Self {
        Self {
            file,
            options: FileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FileOptions) -> Self {
        self.options = options;
        self
    }
}

/// A file that made it through the pipeline.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub file_name: String,
    pub extension: String,
    pub size_kb: f64,
    pub source: SourceInfo,
    pub table: Table,
    pub summary: Summary,
}

/// Per-file result of [`process_batch`].
#[derive(Debug)]
pub struct FileOutcome {
    pub file_name: String,
    pub result: TableResult<ProcessedFile>,
}

/// Parse, clean, select and summarize one file.
pub fn process_file(request: &FileRequest) -> TableResult<ProcessedFile> {
    let file = &request.file;
    let options = &request.options;

    log_info(format!("📄 {} ({:.2} KB)", file.name(), file.size_kb()));

    let parsed = parse_with_info(file)?;
    log_parse_info(&parsed.info, &parsed.table);

    let table = clean(parsed.table, &options.cleaning);

    let table = match &options.columns {
        Some(names) => {
            let selected = select_columns(&table, names)?;
            log_info(format!("🎯 Selected {} of {} columns", selected.column_count(), table.column_count()));
            selected
        }
        None => table,
    };

    let mut summary = summarize(&table);
    if !options.visualize {
        summary.chart.clear();
    }

    Ok(ProcessedFile {
        file_name: file.name().to_string(),
        extension: file.extension(),
        size_kb: file.size_kb(),
        source: parsed.info,
        table,
        summary,
    })
}

/// Process files one after another; each failure stays with its file.
pub fn process_batch(requests: Vec<FileRequest>) -> Vec<FileOutcome> {
    let total = requests.len();
    let outcomes: Vec<FileOutcome> = requests
        .into_iter()
        .map(|request| {
            let result = process_file(&request);
            if let Err(ref e) = result {
                log_error(format!("{}: {}", request.file.name(), e));
            }
            FileOutcome {
                file_name: request.file.name().to_string(),
                result,
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed == 0 {
        log_success(format!("🎉 {} file(s) processed", total));
    } else {
        log_warning(format!("{} of {} file(s) failed", failed, total));
    }

    outcomes
}

/// Run the pipeline on one file and encode the result.
pub fn export_file(request: &FileRequest, format: OutputFormat) -> TableResult<OutputArtifact> {
    let processed = process_file(request)?;

    log_info(format!("🔄 Converting {} to {}...", processed.file_name, format));
    let artifact = convert(
        &processed.table,
        &format.into(),
        &processed.file_name,
        &processed.extension,
    )?;
    log_success(format!(
        "{} ready ({} bytes)",
        artifact.suggested_file_name,
        artifact.bytes.len()
    ));

    Ok(artifact)
}

fn log_parse_info(info: &SourceInfo, table: &Table) {
    if let Some(ref encoding) = info.encoding {
        log_success(format!("Detected encoding: {}", encoding));
    }
    if let Some(delimiter) = info.delimiter {
        log_success(format!("Detected separator: '{}'", format_delimiter(delimiter)));
    }
    log_success(format!("Read {} rows", table.row_count()));
    if info.truncated_rows > 0 {
        log_warning(format!(
            "{} row(s) had more fields than the header; extra fields dropped",
            info.truncated_rows
        ));
    }

    log_info(format!("📋 {} columns:", table.column_count()));
    for (i, column) in table.columns().iter().enumerate() {
        log_info_indent(format!("[{:2}] {} ({:?})", i + 1, column.name, column.kind), 1);
    }
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::models::Cell;

    const SCORES: &str = "name,score\nA,10\nB,\nA,10\n";

    fn scores() -> UploadedFile {
        UploadedFile::new("scores.csv", SCORES.as_bytes().to_vec())
    }

    fn run(options: FileOptions) -> TableResult<ProcessedFile> {
        process_file(&FileRequest::new(scores()).with_options(options))
    }

    fn both() -> FileOptions {
        FileOptions {
            cleaning: CleaningOptions {
                remove_duplicates: true,
                fill_missing_numeric: true,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_dedupe_fill_csv() {
        let request = FileRequest::new(scores()).with_options(both());

        let processed = process_file(&request).unwrap();
        assert_eq!(
            processed.table.column("score").unwrap().values,
            vec![Cell::Int(10), Cell::Float(10.0)]
        );

        let artifact = export_file(&request, OutputFormat::Csv).unwrap();
        assert_eq!(
            String::from_utf8(artifact.bytes).unwrap(),
            "name,score\nA,10\nB,10.0\n"
        );
        assert_eq!(artifact.suggested_file_name, "scores.csv");
        assert_eq!(artifact.mime_type, "text/csv");
    }

    #[test]
    fn test_csv_round_trip() {
        let input = "city,pop,area\nParis,2148000,105.4\n\"Lyon, FR\",513000,\nNice,,71.9\n";
        let first = crate::parser::parse(&UploadedFile::new("a.csv", input.as_bytes().to_vec()))
            .unwrap();

        let encoded = crate::export::csv::to_csv_bytes(&first).unwrap();
        let second = crate::parser::parse(&UploadedFile::new("b.csv", encoded)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_applies_after_cleaning() {
        let options = FileOptions {
            columns: Some(vec!["score".into()]),
            ..both()
        };
        let processed = run(options).unwrap();

        assert_eq!(processed.table.column_names(), vec!["score"]);
        assert_eq!(processed.summary.row_count, 2);
    }

    #[test]
    fn test_unknown_column_fails_file() {
        let options = FileOptions {
            columns: Some(vec!["nope".into()]),
            ..Default::default()
        };
        let result = run(options);
        assert!(matches!(result, Err(TableError::UnknownColumn(ref n)) if n == "nope"));
    }

    #[test]
    fn test_chart_only_when_visualized() {
        let hidden = run(FileOptions::default()).unwrap();
        assert!(hidden.summary.chart.is_empty());

        let options = FileOptions {
            visualize: true,
            ..Default::default()
        };
        let shown = run(options).unwrap();
        assert_eq!(shown.summary.chart.len(), 1);
        assert_eq!(shown.summary.chart[0].name, "score");
    }

    #[test]
    fn test_batch_isolates_failures() {
        let requests = vec![
            FileRequest::new(scores()),
            FileRequest::new(UploadedFile::new("notes.txt", b"hello".to_vec())),
            FileRequest::new(UploadedFile::new("other.csv", b"x\n1\n".to_vec())),
        ];

        let outcomes = process_batch(requests);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(TableError::UnsupportedFormat { .. })
        ));
        assert_eq!(outcomes[2].file_name, "other.csv");
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn test_file_options_from_json() {
        let options: FileOptions = serde_json::from_str(
            r#"{"removeDuplicates": true, "columns": ["a"], "visualize": true}"#,
        )
        .unwrap();
        assert!(options.cleaning.remove_duplicates);
        assert!(!options.cleaning.fill_missing_numeric);
        assert_eq!(options.columns, Some(vec!["a".to_string()]));
        assert!(options.visualize);
    }
}
