//! # Search Console Keyword Exporter Library
//!
//! A command-line tool for exporting search-performance data from the
//! Google Search Console API to per-property CSV files.
//!
//! ## Features
//!
//! - **OAuth2 Authentication**: Interactive first-run authorization with
//!   persisted tokens and automatic refresh
//! - **Property Enumeration**: Lists every property registered to the
//!   authenticated account via `sites.list`
//! - **Rate Limiting**: Token-bucket throttling of the per-property query
//!   fan-out to respect API quotas
//! - **CSV Output**: One write-once CSV file per property per run, plus an
//!   append-only error log for properties that return no data
//!
//! ## Quick Start
//!
//! ```no_run
//! use gsc_keyword_exporter::{QueryParams, SearchType, Dimension};
//! use gsc_keyword_exporter::api::SearchConsoleClient;
//! use gsc_keyword_exporter::dispatcher::Dispatcher;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let params = QueryParams {
//!     start_date: "2024-01-01".parse()?,
//!     end_date: "2024-03-31".parse()?,
//!     row_limit: 5000,
//!     search_type: SearchType::Web,
//!     dimensions: vec![Dimension::Page, Dimension::Query],
//! };
//! params.validate()?;
//!
//! let client = Arc::new(SearchConsoleClient::new("ya29.token".to_string()));
//! let properties = client.list_sites().await?;
//!
//! let dispatcher = Dispatcher::new(client, Arc::new(params), "saves".into());
//! let summary = dispatcher.run(properties).await;
//! println!("{} files written", summary.files_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`auth`] - OAuth2 credential store and interactive authorization flow
//! - [`api`] - Search Console REST client and request/response types
//! - [`dispatcher`] - Rate-limited per-property query fan-out
//! - [`output`] - CSV writer, output path naming, and the error log
//! - [`cli`] - Command-line argument parsing and run orchestration

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Search Console REST client
pub mod api;

/// OAuth2 credential store and authorization flow
pub mod auth;

/// CLI argument parsing and run orchestration
pub mod cli;

/// Rate-limited per-property query dispatch
pub mod dispatcher;

/// CSV output writing and error logging
pub mod output;

/// Reporting lag of the Search Console API in days. Data for the most
/// recent two days is incomplete, so the default date range ends there.
pub const REPORTING_LAG_DAYS: u64 = 2;

/// Default lookback window in days for the start of the date range.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 92;

/// Search type filter for analytics queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Web search results
    Web,
    /// Image search results
    Image,
    /// Video search results
    Video,
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SearchType::Web => "web",
            SearchType::Image => "image",
            SearchType::Video => "video",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(SearchType::Web),
            "image" => Ok(SearchType::Image),
            "video" => Ok(SearchType::Video),
            _ => Err(format!(
                "Invalid search type: {s}. Valid options: web, image, video"
            )),
        }
    }
}

/// Grouping dimension for analytics queries
///
/// The order in which dimensions are requested determines the order of the
/// `keys` array in each response row, so [`QueryParams::dimensions`] must be
/// treated as ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    /// Page URL receiving the impression
    Page,
    /// Search query string
    Query,
    /// Country of the searcher
    Country,
    /// Device category (desktop, mobile, tablet)
    Device,
    /// Search appearance type (e.g. rich result)
    SearchAppearance,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Dimension::Page => "page",
            Dimension::Query => "query",
            Dimension::Country => "country",
            Dimension::Device => "device",
            Dimension::SearchAppearance => "searchAppearance",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(Dimension::Page),
            "query" => Ok(Dimension::Query),
            "country" => Ok(Dimension::Country),
            "device" => Ok(Dimension::Device),
            "searchAppearance" => Ok(Dimension::SearchAppearance),
            _ => Err(format!(
                "Invalid dimension: {s}. Valid options: page, query, country, device, searchAppearance"
            )),
        }
    }
}

/// Query parameters shared read-only across all per-property queries
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    /// Start of the reporting date range (inclusive)
    pub start_date: NaiveDate,
    /// End of the reporting date range (inclusive)
    pub end_date: NaiveDate,
    /// Maximum number of rows returned per query (1-5000)
    pub row_limit: u32,
    /// Search type filter
    pub search_type: SearchType,
    /// Ordered grouping dimensions
    pub dimensions: Vec<Dimension>,
}

impl QueryParams {
    /// Default start date: 92 days before today
    pub fn default_start_date() -> NaiveDate {
        Utc::now().date_naive() - Days::new(DEFAULT_LOOKBACK_DAYS)
    }

    /// Default end date: 2 days before today, matching the API's reporting lag
    pub fn default_end_date() -> NaiveDate {
        Utc::now().date_naive() - Days::new(REPORTING_LAG_DAYS)
    }

    /// Validate parameter integrity
    pub fn validate(&self) -> Result<(), String> {
        if self.start_date > self.end_date {
            return Err(format!(
                "Start date ({}) must not be after end date ({})",
                self.start_date, self.end_date
            ));
        }

        if self.row_limit == 0 || self.row_limit > 5000 {
            return Err(format!(
                "Row limit must be between 1 and 5000, got {}",
                self.row_limit
            ));
        }

        if self.dimensions.is_empty() {
            return Err("At least one dimension is required".to_string());
        }

        for (i, dim) in self.dimensions.iter().enumerate() {
            if self.dimensions[..i].contains(dim) {
                return Err(format!("Duplicate dimension: {dim}"));
            }
        }

        Ok(())
    }
}
