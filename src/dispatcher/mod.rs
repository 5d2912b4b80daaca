//! Rate-limited per-property query dispatch
//!
//! The dispatcher walks the property list in listing order, acquiring one
//! token per property from a [`TokenBucket`] sized for the list length.
//! Each dispatched property's query and CSV write run in an independent
//! spawned task, so dispatch timing is governed solely by the bucket and
//! never by response latency, and one property's failure cannot affect the
//! others.
//!
//! Invariants upheld here:
//!
//! - every listed property is dispatched exactly once, in listing order
//! - no more than one request is dispatched per bucket interval
//!
//! # Components
//!
//! - [`rate_limit`] - Token bucket implementation
//! - [`config`] - Bucket sizing constants
//! - [`Dispatcher`] - The fan-out loop plus per-property processing

pub mod config;
pub mod rate_limit;

pub use rate_limit::TokenBucket;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::api::SearchConsoleClient;
use crate::output::csv::{CsvKeywordWriter, RowProjection};
use crate::output::error_log::ErrorLog;
use crate::output::path::output_path;
use crate::output::OutputError;
use crate::QueryParams;

/// Outcome of processing a single property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyOutcome {
    /// Rows were returned and the CSV file was written
    Saved(PathBuf),
    /// The response carried no row set; recorded in the error log
    NoRows,
    /// The query or the write failed; logged and skipped
    Failed,
}

/// Counts accumulated over one dispatch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Properties dispatched
    pub dispatched: usize,
    /// CSV files written
    pub files_written: usize,
    /// Properties that returned no rows
    pub empty_properties: usize,
    /// Properties whose query or write failed
    pub failures: usize,
}

/// Dispatch every property through the bucket, spawning one task per
/// property
///
/// `start` is invoked synchronously in listing order, once per property,
/// immediately after that property's token is acquired; the future it
/// returns runs concurrently with subsequent dispatches.
pub async fn dispatch_all<F, Fut>(
    bucket: &TokenBucket,
    properties: &[String],
    mut start: F,
) -> Vec<JoinHandle<Fut::Output>>
where
    F: FnMut(usize, String) -> Fut,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    let mut handles = Vec::with_capacity(properties.len());
    for (index, property) in properties.iter().enumerate() {
        bucket.acquire().await;
        handles.push(tokio::spawn(start(index, property.clone())));
    }
    handles
}

/// Orchestrates the rate-limited query fan-out and result writing
pub struct Dispatcher {
    client: Arc<SearchConsoleClient>,
    params: Arc<QueryParams>,
    output_dir: PathBuf,
}

impl Dispatcher {
    /// Create a dispatcher writing CSV files under `output_dir`
    pub fn new(
        client: Arc<SearchConsoleClient>,
        params: Arc<QueryParams>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            client,
            params,
            output_dir,
        }
    }

    /// Query every property and write its results
    ///
    /// The output directory must already exist. Per-property failures are
    /// logged and counted, never propagated; the run completes once every
    /// spawned task has settled.
    pub async fn run(&self, properties: Vec<String>) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        if properties.is_empty() {
            return summary;
        }

        let bucket = TokenBucket::for_queue_len(properties.len());
        info!(
            "Dispatching {} properties at one query per {:?}",
            properties.len(),
            bucket.interval()
        );

        let error_log = Arc::new(ErrorLog::new(&self.output_dir));
        let handles = dispatch_all(&bucket, &properties, |_index, property| {
            let client = Arc::clone(&self.client);
            let params = Arc::clone(&self.params);
            let error_log = Arc::clone(&error_log);
            let output_dir = self.output_dir.clone();

            async move {
                process_property(&client, &params, &output_dir, &error_log, &property).await
            }
        })
        .await;

        summary.dispatched = handles.len();
        for handle in handles {
            match handle.await {
                Ok(PropertyOutcome::Saved(_)) => summary.files_written += 1,
                Ok(PropertyOutcome::NoRows) => summary.empty_properties += 1,
                Ok(PropertyOutcome::Failed) => summary.failures += 1,
                Err(e) => {
                    error!("Property task panicked: {e}");
                    summary.failures += 1;
                }
            }
        }

        summary
    }
}

/// Query one property and write its CSV (or record it in the error log)
async fn process_property(
    client: &SearchConsoleClient,
    params: &QueryParams,
    output_dir: &std::path::Path,
    error_log: &ErrorLog,
    property: &str,
) -> PropertyOutcome {
    let response = match client.query(property, params).await {
        Ok(response) => response,
        Err(e) => {
            error!("Query failed for {property}: {e}");
            return PropertyOutcome::Failed;
        }
    };

    let rows = match response.rows {
        Some(rows) => rows,
        None => {
            warn!(
                "No rows returned for {property} ({} to {}); consider removing it from Search Console",
                params.start_date, params.end_date
            );
            if let Err(e) = error_log.record_no_rows(property, params) {
                error!("Failed to record {property} in error log: {e}");
            }
            return PropertyOutcome::NoRows;
        }
    };

    let path = output_path(output_dir, params, property);
    let projection = RowProjection::new(&params.dimensions);

    let mut writer = match CsvKeywordWriter::create(&path) {
        Ok(writer) => writer,
        Err(OutputError::AlreadyExists(path)) => {
            error!(
                "File not saved for {property}: {} already exists",
                path.display()
            );
            return PropertyOutcome::Failed;
        }
        Err(e) => {
            error!("File not saved for {property}: {e}");
            return PropertyOutcome::Failed;
        }
    };

    for row in &rows {
        let record = projection.project(row, params);
        if let Err(e) = writer.write_record(&record) {
            error!("File not saved for {property}: {e}");
            return PropertyOutcome::Failed;
        }
    }

    if let Err(e) = writer.close() {
        error!("File not saved for {property}: {e}");
        return PropertyOutcome::Failed;
    }

    info!("File saved: {}", path.display());
    PropertyOutcome::Saved(path)
}
