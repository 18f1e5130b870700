//! REST API request/response types.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ServerError;
use crate::models::{CleaningOptions, OutputFormat};
use crate::parser::SourceInfo;
use crate::transform::{FileOptions, FileOutcome, Summary};

/// Response sent to the client after an upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// "ready" (all files ok), "partial" (some failed), "error" (all failed)
    pub status: String,

    /// One report per uploaded file, in upload order
    pub files: Vec<FileReport>,
}

/// Outcome for a single uploaded file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file_name: String,

    /// "ready" or "error"
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_kb: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<FileOutcome> for FileReport {
    fn from(outcome: FileOutcome) -> Self {
        match outcome.result {
            Ok(processed) => FileReport {
                file_name: outcome.file_name,
                status: "ready".to_string(),
                size_kb: Some(processed.size_kb),
                source: Some(processed.source),
                summary: Some(processed.summary),
                error: None,
            },
            Err(e) => FileReport {
                file_name: outcome.file_name,
                status: "error".to_string(),
                size_kb: None,
                source: None,
                summary: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl UploadResponse {
    pub fn from_outcomes(outcomes: Vec<FileOutcome>) -> Self {
        let files: Vec<FileReport> = outcomes.into_iter().map(FileReport::from).collect();
        let failed = files.iter().filter(|f| f.status == "error").count();

        let status = if failed == 0 {
            "ready"
        } else if failed < files.len() {
            "partial"
        } else {
            "error"
        };

        UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            files,
        }
    }
}

/// Text fields sent next to the uploaded file(s).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormOptions {
    pub remove_duplicates: Option<String>,
    pub fill_missing_numeric: Option<String>,
    pub visualize: Option<String>,
    pub columns: Option<String>,
    pub format: Option<String>,
}

impl FormOptions {
    /// Record a multipart text field; unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "removeDuplicates" => &mut self.remove_duplicates,
            "fillMissingNumeric" => &mut self.fill_missing_numeric,
            "visualize" => &mut self.visualize,
            "columns" => &mut self.columns,
            "format" => &mut self.format,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn file_options(&self) -> Result<FileOptions, ServerError> {
        Ok(FileOptions {
            cleaning: CleaningOptions {
                remove_duplicates: parse_flag("removeDuplicates", &self.remove_duplicates)?,
                fill_missing_numeric: parse_flag("fillMissingNumeric", &self.fill_missing_numeric)?,
            },
            columns: parse_columns(&self.columns)?,
            visualize: parse_flag("visualize", &self.visualize)?,
        })
    }

    pub fn output_format(&self) -> Result<OutputFormat, ServerError> {
        self.format
            .as_deref()
            .ok_or_else(|| ServerError::BadRequest("missing 'format' field".to_string()))?
            .parse()
            .map_err(ServerError::BadRequest)
    }
}

/// Checkbox-style flag: `true`/`on`/`1`/`yes` or `false`/`off`/`0`/`no`/empty.
fn parse_flag(name: &str, value: &Option<String>) -> Result<bool, ServerError> {
    let Some(raw) = value else {
        return Ok(false);
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" | "" => Ok(false),
        other => Err(ServerError::BadRequest(format!(
            "invalid value '{}' for '{}'",
            other, name
        ))),
    }
}

/// Column list as a JSON array or comma-separated names. Blank means all columns.
fn parse_columns(value: &Option<String>) -> Result<Option<Vec<String>>, ServerError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.starts_with('[') {
        return serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| ServerError::BadRequest(format!("invalid 'columns' JSON: {}", e)));
    }
    Ok(Some(
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    ))
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "files": [],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::models::UploadedFile;
    use crate::transform::process_file;
    use crate::transform::FileRequest;

    fn ok_outcome() -> FileOutcome {
        let request = FileRequest::new(UploadedFile::new("a.csv", b"x\n1\n".to_vec()));
        FileOutcome {
            file_name: "a.csv".into(),
            result: process_file(&request),
        }
    }

    fn failed_outcome() -> FileOutcome {
        FileOutcome {
            file_name: "b.pdf".into(),
            result: Err(TableError::UnsupportedFormat {
                extension: ".pdf".into(),
            }),
        }
    }

    #[test]
    fn test_partial_status() {
        let response = UploadResponse::from_outcomes(vec![ok_outcome(), failed_outcome()]);
        assert_eq!(response.status, "partial");
        assert_eq!(response.files[0].status, "ready");
        assert_eq!(response.files[1].status, "error");
        assert_eq!(
            response.files[1].error.as_deref(),
            Some("Unsupported file type: .pdf")
        );
    }

    #[test]
    fn test_all_ready_and_all_failed() {
        assert_eq!(UploadResponse::from_outcomes(vec![ok_outcome()]).status, "ready");
        assert_eq!(UploadResponse::from_outcomes(vec![failed_outcome()]).status, "error");
    }

    #[test]
    fn test_form_options() {
        let mut form = FormOptions::default();
        form.set("removeDuplicates", "on".into());
        form.set("columns", r#"["b", "a"]"#.into());
        form.set("format", "Excel".into());
        form.set("unrelated", "x".into());

        let options = form.file_options().unwrap();
        assert!(options.cleaning.remove_duplicates);
        assert!(!options.cleaning.fill_missing_numeric);
        assert_eq!(options.columns, Some(vec!["b".to_string(), "a".to_string()]));
        assert_eq!(form.output_format().unwrap(), OutputFormat::Excel);
    }

    #[test]
    fn test_comma_separated_columns() {
        let columns = parse_columns(&Some(" name , score,".into())).unwrap();
        assert_eq!(columns, Some(vec!["name".to_string(), "score".to_string()]));
        assert_eq!(parse_columns(&Some("  ".into())).unwrap(), None);
    }

    #[test]
    fn test_bad_flag_and_missing_format() {
        let mut form = FormOptions::default();
        form.set("visualize", "maybe".into());
        assert!(matches!(form.file_options(), Err(ServerError::BadRequest(_))));
        assert!(matches!(form.output_format(), Err(ServerError::BadRequest(_))));
    }

    #[test]
    fn test_report_json_omits_empty_fields() {
        let report = FileReport::from(failed_outcome());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["fileName"], "b.pdf");
        assert!(json.get("summary").is_none());
        assert!(json.get("error").is_some());
    }
}
