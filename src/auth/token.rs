//! Persisted OAuth token storage

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{AuthError, AuthResult, TOKEN_FILENAME};

/// Margin in seconds before actual expiry at which a token is treated as
/// expired, so a request issued just before the deadline still succeeds.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth token persisted between program executions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredToken {
    /// Bearer access token for API requests
    pub access_token: String,
    /// Refresh token for obtaining new access tokens; absent if the
    /// authorization server did not grant offline access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type, normally "Bearer"
    pub token_type: String,
    /// Expiry as Unix timestamp in seconds
    pub expires_at: i64,
}

impl StoredToken {
    /// Whether the access token is expired or expires within the margin
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() + EXPIRY_MARGIN_SECS >= self.expires_at
    }

    /// Expiry timestamp for a token valid for `expires_in` seconds from now
    pub fn expires_at_from_now(expires_in: i64) -> i64 {
        Utc::now().timestamp() + expires_in
    }

    /// Default token path: `~/.credentials/gsc-credentials.json`
    pub fn default_path() -> AuthResult<PathBuf> {
        let home = dirs::home_dir().ok_or(AuthError::NoHomeDir)?;
        Ok(home.join(".credentials").join(TOKEN_FILENAME))
    }

    /// Load a persisted token
    ///
    /// Returns `Ok(None)` if no token has been stored yet; a present but
    /// unparseable file is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> AuthResult<Option<Self>> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AuthError::TokenInvalid(format!("{}: {e}", path.display())))
            }
        };

        let token: StoredToken = serde_json::from_str(&content)
            .map_err(|e| AuthError::TokenInvalid(format!("{}: {e}", path.display())))?;
        Ok(Some(token))
    }

    /// Persist the token, creating the credentials directory if needed
    ///
    /// On Unix the file is restricted to owner read/write.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> AuthResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AuthError::TokenStoreFailed(format!("{}: {e}", parent.display()))
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AuthError::TokenStoreFailed(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| AuthError::TokenStoreFailed(format!("{}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, permissions).map_err(|e| {
                AuthError::TokenStoreFailed(format!("{}: {e}", path.display()))
            })?;
        }

        info!("Token stored to {}", path.display());
        Ok(())
    }
}
