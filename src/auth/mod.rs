//! OAuth2 credential store and authorization flow
//!
//! Loads the OAuth client configuration from `client_secret.json`, persists
//! the exchanged token at `~/.credentials/gsc-credentials.json`, and drives
//! the interactive authorization flow on first run: print an authorization
//! URL, read the pasted code from stdin, exchange it for a token.

pub mod client_secret;
pub mod flow;
pub mod token;

pub use client_secret::ClientSecret;
pub use flow::Authenticator;
pub use token::StoredToken;

/// OAuth scope granting read-only access to Search Console data.
///
/// If this scope changes, previously saved credentials at
/// `~/.credentials/gsc-credentials.json` must be deleted.
pub const SCOPE: &str = "https://www.googleapis.com/auth/webmasters.readonly";

/// Google OAuth2 authorization endpoint
pub const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth2 token exchange endpoint
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Filename of the persisted token under `~/.credentials/`
pub const TOKEN_FILENAME: &str = "gsc-credentials.json";

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Client secret file missing or unreadable
    #[error("failed to read client secret file: {0}")]
    ClientSecretUnreadable(String),

    /// Client secret file contents malformed
    #[error("malformed client secret file: {0}")]
    ClientSecretInvalid(String),

    /// Token file could not be parsed
    #[error("malformed token file: {0}")]
    TokenInvalid(String),

    /// Token could not be persisted to disk
    #[error("failed to store token: {0}")]
    TokenStoreFailed(String),

    /// Authorization code exchange failed
    #[error("failed to exchange authorization code (status {status}): {body}")]
    ExchangeFailed {
        /// HTTP status of the token endpoint response
        status: u16,
        /// Response body returned by the token endpoint
        body: String,
    },

    /// Token refresh failed
    #[error("failed to refresh access token (status {status}): {body}")]
    RefreshFailed {
        /// HTTP status of the token endpoint response
        status: u16,
        /// Response body returned by the token endpoint
        body: String,
    },

    /// Network error talking to the token endpoint
    #[error("network error: {0}")]
    NetworkError(String),

    /// Token endpoint response missing a required field
    #[error("token response missing field: {0}")]
    MissingField(&'static str),

    /// Failed reading the authorization code from stdin
    #[error("failed to read authorization code: {0}")]
    CodeReadFailed(String),

    /// Home directory could not be determined for the token store
    #[error("could not determine home directory for token storage")]
    NoHomeDir,
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
