//! CSV output writing and error logging

use std::path::PathBuf;

pub mod csv;
pub mod error_log;
pub mod path;

pub use csv::{CsvKeywordWriter, KeywordRecord, RowProjection};
pub use error_log::ErrorLog;
pub use path::{output_filename, output_path, sanitize_property};

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Output file already exists; never overwritten
    #[error("output file already exists: {0}")]
    AlreadyExists(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error log append failure
    #[error("error log write failed: {0}")]
    ErrorLogFailed(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
