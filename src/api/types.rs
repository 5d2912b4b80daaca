//! Request and response types for the Search Console API

use crate::{Dimension, QueryParams, SearchType};
use serde::{Deserialize, Serialize};

/// Server-side aggregation mode sent with every query. Metrics are summed
/// by page, matching the per-page output rows.
pub const AGGREGATION_TYPE: &str = "byPage";

/// Response from `sites.list`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitesListResponse {
    /// Registered properties; the field is absent entirely when the account
    /// has none
    #[serde(default)]
    pub site_entry: Vec<SiteEntry>,
}

/// One registered property
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    /// URI-like property identifier (e.g. `https://example.com/` or
    /// `sc-domain:example.com`)
    pub site_url: String,
    /// Permission the authenticated user holds on this property
    #[serde(default)]
    pub permission_level: Option<String>,
}

/// Request body for `searchanalytics.query`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsRequest {
    /// Start of the date range, `YYYY-MM-DD`
    pub start_date: String,
    /// End of the date range, `YYYY-MM-DD`
    pub end_date: String,
    /// Grouping dimensions, in the order keys will appear in each row
    pub dimensions: Vec<Dimension>,
    /// Search type filter
    pub search_type: SearchType,
    /// Maximum rows returned
    pub row_limit: u32,
    /// Aggregation mode, always [`AGGREGATION_TYPE`]
    pub aggregation_type: String,
}

impl SearchAnalyticsRequest {
    /// Build the request body from the shared query parameters
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            start_date: params.start_date.to_string(),
            end_date: params.end_date.to_string(),
            dimensions: params.dimensions.clone(),
            search_type: params.search_type,
            row_limit: params.row_limit,
            aggregation_type: AGGREGATION_TYPE.to_string(),
        }
    }
}

/// Response from `searchanalytics.query`
///
/// `rows` is absent (not empty) when the property has no data for the
/// requested range, so it is modeled as an `Option`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Aggregated metric rows, in server order
    pub rows: Option<Vec<ApiRow>>,
    /// Aggregation mode the server actually applied
    #[serde(default)]
    pub response_aggregation_type: Option<String>,
}

/// One aggregated metric row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiRow {
    /// Dimension key values, positionally matching the requested
    /// dimension order
    #[serde(default)]
    pub keys: Vec<String>,
    /// Click count
    pub clicks: u64,
    /// Impression count
    pub impressions: u64,
    /// Click-through rate (0.0 - 1.0)
    pub ctr: f64,
    /// Average search result position
    pub position: f64,
}
