//! CLI error types and conversions

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::output::OutputError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Authentication error
    #[error("auth error: {0}")]
    AuthError(#[from] AuthError),

    /// API error
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
