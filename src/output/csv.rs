//! CSV output writer and response-row projection
//!
//! Response rows carry their dimension values positionally in a `keys`
//! array, ordered to match the requested dimension list. [`RowProjection`]
//! derives the key-to-column mapping from that configured order instead of
//! hard-coding positions, so the `URL` column is labeled correctly no
//! matter where (or whether) the `page` dimension was requested.

use ::csv::Writer;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

use super::{OutputError, OutputResult};
use crate::api::types::ApiRow;
use crate::{Dimension, QueryParams};

/// Separator joining multiple non-page key values into the `keys` column
const KEY_SEPARATOR: &str = ", ";

/// Column header, written when the file is created so a property with an
/// empty row set still yields a header-only file
const HEADER: [&str; 8] = [
    "URL",
    "keys",
    "clicks",
    "impressions",
    "ctr",
    "position",
    "startDate",
    "endDate",
];

/// One CSV output record
///
/// Field order defines the header order:
/// `URL,keys,clicks,impressions,ctr,position,startDate,endDate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Page URL, from the `page` dimension; empty if not requested
    #[serde(rename = "URL")]
    pub url: String,
    /// Remaining dimension values, joined in request order
    pub keys: String,
    /// Click count
    pub clicks: u64,
    /// Impression count
    pub impressions: u64,
    /// Click-through rate
    pub ctr: f64,
    /// Average position
    pub position: f64,
    /// Queried range start, `YYYY-MM-DD`
    #[serde(rename = "startDate")]
    pub start_date: String,
    /// Queried range end, `YYYY-MM-DD`
    #[serde(rename = "endDate")]
    pub end_date: String,
}

/// Maps positional response keys to named output columns
///
/// Built once per property from the configured dimension order.
#[derive(Debug, Clone, Copy)]
pub struct RowProjection {
    page_index: Option<usize>,
}

impl RowProjection {
    /// Derive the projection from the requested dimension order
    pub fn new(dimensions: &[Dimension]) -> Self {
        Self {
            page_index: dimensions.iter().position(|d| *d == Dimension::Page),
        }
    }

    /// Project one response row into an output record
    ///
    /// Rows are emitted in server order; the row's key at the `page`
    /// dimension's position becomes the `URL` column and the remaining keys
    /// are joined into the `keys` column.
    pub fn project(&self, row: &ApiRow, params: &QueryParams) -> KeywordRecord {
        let url = self
            .page_index
            .and_then(|i| row.keys.get(i))
            .cloned()
            .unwrap_or_default();

        let keys = row
            .keys
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.page_index)
            .map(|(_, key)| key.as_str())
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR);

        KeywordRecord {
            url,
            keys,
            clicks: row.clicks,
            impressions: row.impressions,
            ctr: row.ctr,
            position: row.position,
            start_date: params.start_date.to_string(),
            end_date: params.end_date.to_string(),
        }
    }
}

/// CSV writer for keyword records
///
/// Created with `create_new`, so a file left by a previous run makes
/// creation fail instead of silently overwriting it.
#[derive(Debug)]
pub struct CsvKeywordWriter {
    writer: Writer<BufWriter<File>>,
    records_written: u64,
}

impl CsvKeywordWriter {
    /// Create the output file, failing if it already exists
    ///
    /// The column header row is written up front; writing the header here
    /// rather than on the first record means a file closed with zero
    /// records still carries it.
    pub fn create<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    OutputError::AlreadyExists(path.to_path_buf())
                }
                _ => OutputError::IoError(format!("{}: {e}", path.display())),
            })?;

        debug!("Created CSV writer: path={}", path.display());

        let mut writer = Writer::from_writer(BufWriter::new(file));
        // Writing the header as a plain record also stops serialize() from
        // emitting its own header row later.
        writer
            .write_record(HEADER)
            .map_err(|e| OutputError::CsvError(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            records_written: 0,
        })
    }

    /// Write a single record
    pub fn write_record(&mut self, record: &KeywordRecord) -> OutputResult<()> {
        self.writer
            .serialize(record)
            .map_err(|e| OutputError::CsvError(format!("Failed to write record: {e}")))?;
        self.records_written += 1;
        Ok(())
    }

    /// Write multiple records at once
    pub fn write_records(&mut self, records: &[KeywordRecord]) -> OutputResult<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Number of records written so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush and finalize the file
    pub fn close(mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::IoError(format!("Failed to flush: {e}")))?;

        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {e}")))?;
        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get file handle: {e}")))?;
        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {e}")))?;

        debug!("CSV writer closed: {} records written", self.records_written);
        Ok(())
    }
}
