//! Error types for the Data Sweeper pipeline.
//!
//! - [`TableError`] - Parsing, cleaning, selection and encoding errors for one file
//! - [`ConfigError`] - Invalid environment settings
//! - [`ServerError`] - HTTP layer errors
//!
//! Every `TableError` is scoped to the file that produced it; callers report it
//! next to that file and carry on with the rest of the batch.

use thiserror::Error;

use crate::models::OutputFormat;

// =============================================================================
// Table Errors
// =============================================================================

/// Errors raised while turning one uploaded file into a table or an artifact.
#[derive(Debug, Error)]
pub enum TableError {
    /// Input extension is not `.csv` or `.xlsx`.
    #[error("Unsupported file type: {}", display_extension(.extension))]
    UnsupportedFormat { extension: String },

    /// Column selection references a column the table does not have.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Writing the output buffer failed.
    #[error("Failed to encode {format}: {message}")]
    Encoding { format: OutputFormat, message: String },

    /// Input could not be read as the format its extension claims.
    #[error("Invalid {format} file: {message}")]
    Malformed { format: &'static str, message: String },

    /// No header row.
    #[error("File is empty")]
    EmptyFile,

    /// Columns of unequal length or duplicate names.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Failed to read file from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

fn display_extension(extension: &str) -> &str {
    if extension.is_empty() {
        "(none)"
    } else {
        extension
    }
}

impl TableError {
    pub(crate) fn encoding(format: OutputFormat, err: impl std::fmt::Display) -> Self {
        TableError::Encoding {
            format,
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(format: &'static str, err: impl std::fmt::Display) -> Self {
        TableError::Malformed {
            format,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading [`crate::config::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Error from the table pipeline.
    #[error("{0}")]
    Table(#[from] TableError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Socket bind / serve failure.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
