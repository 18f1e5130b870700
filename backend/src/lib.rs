//! # Sweeper - tabular file cleaning and conversion
//!
//! Sweeper takes uploaded CSV or Excel files, previews them, applies simple
//! cleaning (duplicate removal, mean-fill of missing numbers), projects a subset
//! of columns and exports the result as CSV, Excel or a text PDF.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ CSV / XLSX  │────▶│   Parser    │────▶│  Transform  │────▶│   Export    │
//! │   upload    │     │ (typed cols)│     │ clean/select│     │ CSV/XLSX/PDF│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sweeper::{export_file, FileRequest, FileOptions, OutputFormat, UploadedFile};
//!
//! let file = UploadedFile::new("scores.csv", std::fs::read("scores.csv")?);
//! let mut options = FileOptions::default();
//! options.cleaning.remove_duplicates = true;
//! let artifact = export_file(&FileRequest::new(file).with_options(options), OutputFormat::Excel)?;
//! std::fs::write(&artifact.suggested_file_name, &artifact.bytes)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Table, cells, options and artifacts
//! - [`parser`] - CSV/XLSX parsing with type inference
//! - [`transform`] - Cleaning, column selection, summaries, per-file pipeline
//! - [`export`] - CSV, Excel and PDF encoders
//! - [`config`] - Environment settings
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Export
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors and config
// =============================================================================

pub use config::Settings;
pub use error::{ConfigError, ServerError, ServerResult, TableError, TableResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Cell,
    CleaningOptions,
    Column,
    ColumnType,
    ConversionRequest,
    OutputArtifact,
    OutputFormat,
    Table,
    UploadedFile,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    parse,
    parse_with_info,
    ParseResult,
    SourceInfo,
    SUPPORTED_EXTENSIONS,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    clean,
    export_file,
    process_batch,
    process_file,
    select_columns,
    summarize,
    ChartSeries,
    FileOptions,
    FileOutcome,
    FileRequest,
    ProcessedFile,
    Summary,
};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{convert, output_file_name};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, FileReport, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
