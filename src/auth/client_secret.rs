//! OAuth client configuration loaded from `client_secret.json`
//!
//! The file is the standard download from the Google API console for an
//! "installed" application.

use serde::Deserialize;
use std::path::Path;

use super::{AuthError, AuthResult};

/// Top-level shape of `client_secret.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    /// Credentials for an installed (desktop) application
    pub installed: InstalledSecret,
}

/// The `installed` section of the client secret file
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledSecret {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Registered redirect URIs; the first entry is used for the
    /// paste-code flow
    pub redirect_uris: Vec<String>,
}

impl ClientSecret {
    /// Load and parse the client secret file
    ///
    /// A missing or malformed file is fatal to the whole run: nothing can be
    /// authorized without it.
    pub fn load<P: AsRef<Path>>(path: P) -> AuthResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AuthError::ClientSecretUnreadable(format!("{}: {e}", path.display()))
        })?;

        let secret: ClientSecret = serde_json::from_str(&content)
            .map_err(|e| AuthError::ClientSecretInvalid(format!("{}: {e}", path.display())))?;

        if secret.installed.redirect_uris.is_empty() {
            return Err(AuthError::ClientSecretInvalid(
                "no redirect URIs configured".to_string(),
            ));
        }

        Ok(secret)
    }

    /// Redirect URI used for the paste-code authorization flow
    pub fn redirect_uri(&self) -> &str {
        &self.installed.redirect_uris[0]
    }
}
