//! Search Console REST client
//!
//! Two capabilities are consumed: `sites.list` for property enumeration and
//! `searchanalytics.query` for per-property metrics. Request and response
//! schemas are owned by the remote service; the types in [`types`] mirror
//! only the fields this tool reads.

pub mod client;
pub mod types;

pub use client::SearchConsoleClient;
pub use types::{ApiRow, QueryResponse, SearchAnalyticsRequest, SitesListResponse};

/// API client errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP status from the API
    #[error("API error (status {status}): {body}")]
    HttpError {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Network-level failure (DNS, connect, TLS, timeout)
    #[error("network error: {0}")]
    NetworkError(String),

    /// Response body could not be deserialized
    #[error("parse error: {0}")]
    ParseError(String),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
