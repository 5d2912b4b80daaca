//! Unit tests for CLI argument parsing

use clap::Parser;
use gsc_keyword_exporter::cli::Cli;
use gsc_keyword_exporter::{Dimension, SearchType};
use std::path::PathBuf;

/// Defaults match the documented flag defaults when everything is omitted
#[test]
fn test_cli_defaults() {
    let cli = Cli::parse_from(["gsc-keyword-exporter"]);

    assert!(cli.start_date.is_none());
    assert!(cli.end_date.is_none());
    assert_eq!(cli.row_limit, 5000);
    assert_eq!(cli.search_type, SearchType::Web);
    assert_eq!(cli.dimensions, vec![Dimension::Page, Dimension::Query]);
    assert_eq!(cli.output_dir, PathBuf::from("saves"));
    assert_eq!(cli.client_secret, PathBuf::from("client_secret.json"));
}

#[test]
fn test_cli_resolves_default_dates() {
    let cli = Cli::parse_from(["gsc-keyword-exporter"]);
    let params = cli.query_params();

    assert!(params.validate().is_ok());
    assert_eq!((params.end_date - params.start_date).num_days(), 90);
}

#[test]
fn test_cli_parses_explicit_dates() {
    let cli = Cli::parse_from([
        "gsc-keyword-exporter",
        "--startDate",
        "2024-01-01",
        "--endDate",
        "2024-03-31",
    ]);
    let params = cli.query_params();

    assert_eq!(params.start_date.to_string(), "2024-01-01");
    assert_eq!(params.end_date.to_string(), "2024-03-31");
}

#[test]
fn test_cli_accepts_short_aliases() {
    let cli = Cli::parse_from([
        "gsc-keyword-exporter",
        "--sd",
        "2024-01-01",
        "--ed",
        "2024-03-31",
        "--rl",
        "100",
        "--st",
        "image",
        "--d",
        "query,country",
    ]);

    assert_eq!(cli.start_date.unwrap().to_string(), "2024-01-01");
    assert_eq!(cli.end_date.unwrap().to_string(), "2024-03-31");
    assert_eq!(cli.row_limit, 100);
    assert_eq!(cli.search_type, SearchType::Image);
    assert_eq!(cli.dimensions, vec![Dimension::Query, Dimension::Country]);
}

#[test]
fn test_cli_rejects_invalid_date() {
    let result = Cli::try_parse_from(["gsc-keyword-exporter", "--startDate", "01/02/2024"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_row_limit_out_of_range() {
    assert!(Cli::try_parse_from(["gsc-keyword-exporter", "--rowLimit", "0"]).is_err());
    assert!(Cli::try_parse_from(["gsc-keyword-exporter", "--rowLimit", "5001"]).is_err());
    assert!(Cli::try_parse_from(["gsc-keyword-exporter", "--rowLimit", "5000"]).is_ok());
}

#[test]
fn test_cli_rejects_unknown_search_type() {
    assert!(Cli::try_parse_from(["gsc-keyword-exporter", "--searchType", "news"]).is_err());
}

#[test]
fn test_cli_rejects_unknown_dimension() {
    assert!(Cli::try_parse_from(["gsc-keyword-exporter", "--dimensions", "page,keyword"]).is_err());
}

#[test]
fn test_cli_search_appearance_is_plain_dimension() {
    let cli = Cli::parse_from(["gsc-keyword-exporter", "--dimensions", "searchAppearance"]);
    assert_eq!(cli.dimensions, vec![Dimension::SearchAppearance]);
    assert!(cli.query_params().validate().is_ok());
}

#[test]
fn test_cli_duplicate_dimensions_fail_validation() {
    let cli = Cli::parse_from(["gsc-keyword-exporter", "--dimensions", "query,query"]);
    assert!(cli.query_params().validate().is_err());
}

#[test]
fn test_cli_reversed_dates_fail_validation() {
    let cli = Cli::parse_from([
        "gsc-keyword-exporter",
        "--startDate",
        "2024-03-31",
        "--endDate",
        "2024-01-01",
    ]);
    assert!(cli.query_params().validate().is_err());
}
