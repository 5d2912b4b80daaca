//! Output file naming
//!
//! Every property gets one deterministic file name per invocation:
//! `<startDate> to <endDate> - <sanitized property> - <searchType>.csv`.
//! Property identifiers are URI-like, so they are sanitized before landing
//! in a file name.

use std::path::{Path, PathBuf};

use crate::QueryParams;

/// Sanitize a property identifier into a file-name-safe form
///
/// Strips the URL scheme and any trailing slash, then replaces characters
/// that would act as path separators (`/`, `\`, `:`) with `_` so nested
/// path properties and `sc-domain:` properties cannot escape the output
/// directory.
pub fn sanitize_property(property: &str) -> String {
    let stripped = match property.split_once("://") {
        Some((_, rest)) => rest,
        None => property,
    };
    let stripped = stripped.trim_end_matches('/');
    stripped.replace("..", "__").replace(['/', '\\', ':'], "_")
}

/// File name for one property's output CSV
pub fn output_filename(params: &QueryParams, property: &str) -> String {
    format!(
        "{} to {} - {} - {}.csv",
        params.start_date,
        params.end_date,
        sanitize_property(property),
        params.search_type
    )
}

/// Full output path for one property's CSV under the output directory
pub fn output_path(output_dir: &Path, params: &QueryParams, property: &str) -> PathBuf {
    output_dir.join(output_filename(params, property))
}
