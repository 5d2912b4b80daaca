//! Export command implementation

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::CliError;
use crate::api::SearchConsoleClient;
use crate::auth::{Authenticator, ClientSecret};
use crate::dispatcher::Dispatcher;
use crate::output::OutputError;
use crate::{Dimension, QueryParams, SearchType};

/// Parse an ISO calendar date (`YYYY-MM-DD`)
fn parse_iso_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| format!("'{input}' is not a valid YYYY-MM-DD date: {e}"))
}

/// Search Console Keyword Exporter CLI
#[derive(Parser, Debug)]
#[command(name = "gsc-keyword-exporter")]
#[command(about = "Export Search Console keyword data to per-property CSV files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Start date for the report, formatted YYYY-MM-DD (default: 92 days ago)
    #[arg(long = "startDate", alias = "sd", value_parser = parse_iso_date)]
    pub start_date: Option<NaiveDate>,

    /// End date for the report, formatted YYYY-MM-DD (default: 2 days ago,
    /// matching the API's reporting lag)
    #[arg(long = "endDate", alias = "ed", value_parser = parse_iso_date)]
    pub end_date: Option<NaiveDate>,

    /// Number of rows downloaded per property (1-5000)
    #[arg(long = "rowLimit", alias = "rl", default_value = "5000", value_parser = clap::value_parser!(u32).range(1..=5000))]
    pub row_limit: u32,

    /// Search type: web, image, or video
    #[arg(long = "searchType", alias = "st", default_value = "web")]
    pub search_type: SearchType,

    /// Comma-separated grouping dimensions, a subset of
    /// page,query,country,device,searchAppearance
    #[arg(
        long = "dimensions",
        alias = "d",
        value_delimiter = ',',
        default_value = "page,query"
    )]
    pub dimensions: Vec<Dimension>,

    /// Directory for output CSV files and the error log
    #[arg(long = "output-dir", default_value = "saves")]
    pub output_dir: PathBuf,

    /// Path to the OAuth client secret file
    #[arg(long = "client-secret", default_value = "client_secret.json")]
    pub client_secret: PathBuf,
}

impl Cli {
    /// Resolve the shared query parameters, filling in date defaults
    pub fn query_params(&self) -> QueryParams {
        QueryParams {
            start_date: self.start_date.unwrap_or_else(QueryParams::default_start_date),
            end_date: self.end_date.unwrap_or_else(QueryParams::default_end_date),
            row_limit: self.row_limit,
            search_type: self.search_type,
            dimensions: self.dimensions.clone(),
        }
    }

    /// Run the export: authorize, list properties, dispatch queries, write
    /// CSV files
    pub async fn execute(&self) -> Result<(), CliError> {
        let params = self.query_params();
        params.validate().map_err(CliError::InvalidArgument)?;

        let secret = ClientSecret::load(&self.client_secret)?;
        let authenticator = Authenticator::new(secret)?;
        let access_token = authenticator.access_token().await?;

        let client = Arc::new(SearchConsoleClient::new(access_token));
        let properties = client.list_sites().await?;
        if properties.is_empty() {
            info!("No properties found for this account");
            return Ok(());
        }

        info!(
            "This will download keywords from {} to {} for {} properties",
            params.start_date,
            params.end_date,
            properties.len()
        );

        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            CliError::OutputError(OutputError::IoError(format!(
                "{}: {e}",
                self.output_dir.display()
            )))
        })?;

        let dispatcher = Dispatcher::new(client, Arc::new(params), self.output_dir.clone());
        let summary = dispatcher.run(properties).await;

        info!(
            "Run complete: {} dispatched, {} files written, {} without rows, {} failed",
            summary.dispatched,
            summary.files_written,
            summary.empty_properties,
            summary.failures
        );
        Ok(())
    }
}
