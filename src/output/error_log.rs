//! Append-only error log for properties that return no data
//!
//! A property whose query response carries no row set is usually stale or
//! misconfigured upstream; each occurrence is appended as one line to
//! `error_log.txt` in the output directory so operators can review them
//! after the run.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{OutputError, OutputResult};
use crate::QueryParams;

/// Filename of the error log inside the output directory
pub const ERROR_LOG_FILENAME: &str = "error_log.txt";

/// Append-only local error log
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    /// Create a handle to the error log inside `output_dir`
    ///
    /// The file itself is created lazily on first append.
    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(ERROR_LOG_FILENAME),
        }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a property whose query returned no rows
    pub fn record_no_rows(&self, property: &str, params: &QueryParams) -> OutputResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| OutputError::ErrorLogFailed(format!("{}: {e}", self.path.display())))?;

        writeln!(
            file,
            "No rows for property: {property} ({} to {}) | consider removing it from Search Console",
            params.start_date, params.end_date
        )
        .map_err(|e| OutputError::ErrorLogFailed(format!("{}: {e}", self.path.display())))
    }
}
