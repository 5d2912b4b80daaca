//! Unit tests for output file naming

use chrono::NaiveDate;
use gsc_keyword_exporter::output::{output_filename, output_path, sanitize_property};
use gsc_keyword_exporter::{Dimension, QueryParams, SearchType};
use std::path::{Path, PathBuf};

fn params(search_type: SearchType) -> QueryParams {
    QueryParams {
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        row_limit: 5000,
        search_type,
        dimensions: vec![Dimension::Page, Dimension::Query],
    }
}

#[test]
fn test_filename_scheme_for_url_property() {
    assert_eq!(
        output_filename(&params(SearchType::Web), "https://example.com/"),
        "2024-01-01 to 2024-03-31 - example.com - web.csv"
    );
}

#[test]
fn test_filename_scheme_for_domain_property() {
    assert_eq!(
        output_filename(&params(SearchType::Video), "sc-domain:example.com"),
        "2024-01-01 to 2024-03-31 - sc-domain_example.com - video.csv"
    );
}

#[test]
fn test_distinct_properties_get_distinct_filenames() {
    let params = params(SearchType::Web);
    let a = output_filename(&params, "https://example.com/");
    let b = output_filename(&params, "https://example.com/shop/");
    assert_ne!(a, b);
}

#[test]
fn test_sanitized_name_never_escapes_output_dir() {
    for hostile in [
        "https://../../etc/passwd",
        "https://example.com/../../other",
        "sc-domain:a/b\\c",
    ] {
        let name = sanitize_property(hostile);
        assert!(!name.contains(".."), "{hostile} -> {name}");
        assert!(!name.contains('/'), "{hostile} -> {name}");
        assert!(!name.contains('\\'), "{hostile} -> {name}");
    }
}

#[test]
fn test_output_path_stays_inside_directory() {
    let path = output_path(
        Path::new("saves"),
        &params(SearchType::Web),
        "https://example.com/deep/path/",
    );
    assert!(path.starts_with(PathBuf::from("saves")));
    assert_eq!(path.components().count(), 2);
}
