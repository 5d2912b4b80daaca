//! End-to-end tests for turning a query response into an on-disk CSV file
//!
//! These exercise the same pipeline the dispatcher runs per property:
//! parse the response JSON, project each row, and write the file under its
//! deterministic name.

use chrono::NaiveDate;
use gsc_keyword_exporter::api::types::QueryResponse;
use gsc_keyword_exporter::output::{
    output_path, CsvKeywordWriter, ErrorLog, OutputError, RowProjection,
};
use gsc_keyword_exporter::{Dimension, QueryParams, SearchType};
use std::path::Path;
use tempfile::TempDir;

fn params() -> QueryParams {
    QueryParams {
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        row_limit: 5000,
        search_type: SearchType::Web,
        dimensions: vec![Dimension::Query, Dimension::Page],
    }
}

fn write_response(output_dir: &Path, params: &QueryParams, property: &str, json: &str) {
    let response: QueryResponse = serde_json::from_str(json).unwrap();
    let rows = response.rows.expect("response carries rows");

    let path = output_path(output_dir, params, property);
    let projection = RowProjection::new(&params.dimensions);

    let mut writer = CsvKeywordWriter::create(&path).unwrap();
    for row in &rows {
        writer.write_record(&projection.project(row, params)).unwrap();
    }
    writer.close().unwrap();
}

const RESPONSE_JSON: &str = r#"{
    "rows": [
        {"keys": ["foo", "https://example.com/page"],
         "clicks": 3, "impressions": 10, "ctr": 0.3, "position": 4.2},
        {"keys": ["bar", "https://example.com/other"],
         "clicks": 1, "impressions": 40, "ctr": 0.025, "position": 11.5}
    ],
    "responseAggregationType": "byPage"
}"#;

#[test]
fn test_response_becomes_named_csv_file() {
    let dir = TempDir::new().unwrap();
    let params = params();

    write_response(dir.path(), &params, "https://example.com/", RESPONSE_JSON);

    let expected = dir
        .path()
        .join("2024-01-01 to 2024-03-31 - example.com - web.csv");
    let contents = std::fs::read_to_string(&expected).unwrap();

    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            "URL,keys,clicks,impressions,ctr,position,startDate,endDate",
            "https://example.com/page,foo,3,10,0.3,4.2,2024-01-01,2024-03-31",
            "https://example.com/other,bar,1,40,0.025,11.5,2024-01-01,2024-03-31",
        ]
    );
}

#[test]
fn test_empty_row_list_produces_header_only_file() {
    let dir = TempDir::new().unwrap();
    let params = params();

    // rows present but empty, as opposed to absent
    write_response(
        dir.path(),
        &params,
        "https://example.com/",
        r#"{"rows": [], "responseAggregationType": "byPage"}"#,
    );

    let path = output_path(dir.path(), &params, "https://example.com/");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents.lines().next().unwrap(),
        "URL,keys,clicks,impressions,ctr,position,startDate,endDate"
    );
    assert_eq!(contents.lines().count(), 1);
}

#[test]
fn test_second_run_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let params = params();

    write_response(dir.path(), &params, "https://example.com/", RESPONSE_JSON);
    let path = output_path(dir.path(), &params, "https://example.com/");
    let first_run = std::fs::read_to_string(&path).unwrap();

    let err = CsvKeywordWriter::create(&path).unwrap_err();
    assert!(matches!(err, OutputError::AlreadyExists(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), first_run);
}

#[test]
fn test_absent_rows_are_recorded_in_error_log_not_csv() {
    let dir = TempDir::new().unwrap();
    let params = params();
    let property = "https://stale.example.com/";

    let response: QueryResponse =
        serde_json::from_str(r#"{"responseAggregationType": "byPage"}"#).unwrap();
    assert!(response.rows.is_none());

    let log = ErrorLog::new(dir.path());
    log.record_no_rows(property, &params).unwrap();

    let log_contents = std::fs::read_to_string(log.path()).unwrap();
    assert!(log_contents.contains("No rows for property: https://stale.example.com/"));
    assert!(log_contents.contains("2024-01-01 to 2024-03-31"));

    // Only the error log exists in the output directory.
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["error_log.txt"]);
}

#[test]
fn test_multiple_properties_write_distinct_files() {
    let dir = TempDir::new().unwrap();
    let params = params();

    write_response(dir.path(), &params, "https://example.com/", RESPONSE_JSON);
    write_response(dir.path(), &params, "sc-domain:example.org", RESPONSE_JSON);

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "2024-01-01 to 2024-03-31 - example.com - web.csv",
            "2024-01-01 to 2024-03-31 - sc-domain_example.org - web.csv",
        ]
    );
}
