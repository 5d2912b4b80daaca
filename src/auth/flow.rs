//! Interactive OAuth2 authorization flow
//!
//! On first run (or when the persisted token is missing and cannot be
//! refreshed) the operator is shown an authorization URL, visits it in a
//! browser, and pastes the resulting code back on stdin. The exchanged token
//! is persisted before the flow returns.

use reqwest::Client;
use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{AuthError, AuthResult, ClientSecret, StoredToken, AUTH_ENDPOINT, SCOPE, TOKEN_ENDPOINT};

/// Token endpoint response for both code exchange and refresh
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    expires_in: i64,
}

/// Prompt the operator and read the pasted authorization code from stdin
fn prompt_for_code() -> AuthResult<String> {
    print!("Enter the code from that page here: ");
    std::io::stdout()
        .flush()
        .map_err(|e| AuthError::CodeReadFailed(e.to_string()))?;

    let mut code = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut code)
        .map_err(|e| AuthError::CodeReadFailed(e.to_string()))?;
    normalize_code(&code)
}

/// Trim a pasted authorization code, rejecting an empty entry
fn normalize_code(input: &str) -> AuthResult<String> {
    let code = input.trim();
    if code.is_empty() {
        return Err(AuthError::CodeReadFailed(
            "no authorization code entered".to_string(),
        ));
    }
    Ok(code.to_string())
}

/// Drives token acquisition: persisted token, refresh, or interactive flow
pub struct Authenticator {
    secret: ClientSecret,
    token_path: PathBuf,
    http: Client,
}

impl Authenticator {
    /// Create an authenticator from a loaded client secret, storing tokens
    /// at the default `~/.credentials/` location
    pub fn new(secret: ClientSecret) -> AuthResult<Self> {
        Ok(Self {
            secret,
            token_path: StoredToken::default_path()?,
            http: Client::new(),
        })
    }

    /// Override the token storage path (used by tests)
    pub fn with_token_path(mut self, path: PathBuf) -> Self {
        self.token_path = path;
        self
    }

    /// Obtain a valid access token
    ///
    /// Order of preference: persisted unexpired token, refresh of a
    /// persisted expired token, interactive authorization.
    pub async fn access_token(&self) -> AuthResult<String> {
        match StoredToken::load(&self.token_path)? {
            Some(token) if !token.is_expired() => {
                debug!("Using persisted access token");
                Ok(token.access_token)
            }
            Some(token) => match &token.refresh_token {
                Some(refresh_token) => {
                    info!("Access token expired, refreshing");
                    let refreshed = self.refresh(refresh_token).await?;
                    refreshed.save(&self.token_path)?;
                    Ok(refreshed.access_token)
                }
                None => {
                    warn!("Persisted token expired with no refresh token, re-authorizing");
                    self.interactive_flow().await
                }
            },
            None => self.interactive_flow().await,
        }
    }

    /// Build the URL the operator must visit to authorize this application
    pub fn authorization_url(&self) -> String {
        format!(
            "{AUTH_ENDPOINT}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline",
            urlencoding::encode(&self.secret.installed.client_id),
            urlencoding::encode(self.secret.redirect_uri()),
            urlencoding::encode(SCOPE),
        )
    }

    /// Run the interactive paste-code flow and persist the resulting token
    ///
    /// The stdin prompt runs on a blocking thread so it cannot stall a
    /// runtime worker.
    async fn interactive_flow(&self) -> AuthResult<String> {
        let auth_url = self.authorization_url();
        println!("Authorize this app by visiting this url:\n\n{auth_url}\n");

        let code = tokio::task::spawn_blocking(prompt_for_code)
            .await
            .map_err(|e| AuthError::CodeReadFailed(e.to_string()))??;

        let token = self.exchange_code(&code).await?;
        token.save(&self.token_path)?;
        Ok(token.access_token)
    }

    /// Exchange an authorization code for a token
    pub async fn exchange_code(&self, code: &str) -> AuthResult<StoredToken> {
        let params = [
            ("client_id", self.secret.installed.client_id.as_str()),
            ("client_secret", self.secret.installed.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.secret.redirect_uri()),
        ];

        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::ExchangeFailed { status, body });
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|_| AuthError::MissingField("access_token"))?;

        Ok(StoredToken {
            access_token: parsed.access_token,
            refresh_token: parsed.refresh_token,
            token_type: parsed.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_at: StoredToken::expires_at_from_now(parsed.expires_in),
        })
    }

    /// Obtain a fresh access token using the stored refresh token
    ///
    /// The refresh response does not echo the refresh token back, so the
    /// existing one is carried over.
    async fn refresh(&self, refresh_token: &str) -> AuthResult<StoredToken> {
        let params = [
            ("client_id", self.secret.installed.client_id.as_str()),
            ("client_secret", self.secret.installed.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::RefreshFailed { status, body });
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|_| AuthError::MissingField("access_token"))?;

        Ok(StoredToken {
            access_token: parsed.access_token,
            refresh_token: parsed
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
            token_type: parsed.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_at: StoredToken::expires_at_from_now(parsed.expires_in),
        })
    }
}
