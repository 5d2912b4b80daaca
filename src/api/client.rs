//! HTTP client for the Search Console API
//!
//! Thin wrapper over [`reqwest::Client`] that attaches the bearer token,
//! percent-encodes property identifiers into request paths, and maps
//! transport and status failures into [`ApiError`]. No retries: a failed
//! `sites.list` is fatal and a failed per-property query is skipped by the
//! caller.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{QueryResponse, SearchAnalyticsRequest, SitesListResponse};
use super::{ApiError, ApiResult};
use crate::QueryParams;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Fixed page size requested from `sites.list`
pub const SITES_PAGE_SIZE: u32 = 1000;

/// Search Console API client
pub struct SearchConsoleClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl SearchConsoleClient {
    /// Create a client against the production API
    pub fn new(access_token: String) -> Self {
        Self::with_base_url(access_token, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (used by tests)
    pub fn with_base_url(access_token: String, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            access_token,
        }
    }

    /// Base URL this client targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the `sites.list` endpoint
    pub fn sites_url(&self) -> String {
        format!("{}/webmasters/v3/sites", self.base_url)
    }

    /// URL of the `searchanalytics.query` endpoint for one property
    ///
    /// The property identifier is percent-encoded since it contains scheme
    /// and slash characters.
    pub fn query_url(&self, site_url: &str) -> String {
        format!(
            "{}/webmasters/v3/sites/{}/searchAnalytics/query",
            self.base_url,
            urlencoding::encode(site_url)
        )
    }

    /// List the properties registered to the authenticated user
    ///
    /// Returns property identifiers in the order the API listed them.
    pub async fn list_sites(&self) -> ApiResult<Vec<String>> {
        let url = self.sites_url();
        debug!("Listing properties: {url}");

        let response = self
            .http
            .get(&url)
            .query(&[("rowLimit", SITES_PAGE_SIZE.to_string())])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        let parsed: SitesListResponse = Self::read_response(response).await?;
        Ok(parsed
            .site_entry
            .into_iter()
            .map(|entry| entry.site_url)
            .collect())
    }

    /// Query search analytics for one property
    pub async fn query(&self, site_url: &str, params: &QueryParams) -> ApiResult<QueryResponse> {
        let url = self.query_url(site_url);
        let body = SearchAnalyticsRequest::from_params(params);
        debug!("Querying property {site_url}: {url}");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        Self::read_response(response).await
    }

    /// Check the status and deserialize the body
    async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::ParseError(e.to_string()))
    }
}
