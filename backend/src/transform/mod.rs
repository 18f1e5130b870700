//! Table transformation.
//!
//! - Clean: duplicate removal and numeric mean-fill
//! - Select: ordered column projection
//! - Summary: preview rows and chart series
//! - Pipeline: per-file parse → clean → select → summarize → export

pub mod clean;
pub mod pipeline;
pub mod select;
pub mod summary;

pub use clean::{clean, fill_missing_numeric, remove_duplicates, ColumnFill};
pub use pipeline::*;
pub use select::select_columns;
pub use summary::{summarize, ChartSeries, ColumnInfo, Summary, PREVIEW_ROWS};
