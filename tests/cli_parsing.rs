//! Tests for CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

use esi_gateway::Config;

#[test]
fn test_defaults() {
    let config = Config::try_parse_from(["esi_gateway"]).expect("Should parse with no args");
    assert_eq!(config.root, PathBuf::from("./public"));
    assert_eq!(config.port, 8788);
    assert!(config.bind.is_loopback());
    assert_eq!(config.timeout_seconds, 10);
    assert!(config.public_base_url.is_none());
    assert!(config.status_port.is_none());
}

#[test]
fn test_positional_root() {
    let config =
        Config::try_parse_from(["esi_gateway", "./site"]).expect("Should parse root argument");
    assert_eq!(config.root, PathBuf::from("./site"));
}

#[test]
fn test_full_flag_set() {
    let config = Config::try_parse_from([
        "esi_gateway",
        "./site",
        "--port",
        "9000",
        "--bind",
        "0.0.0.0",
        "--timeout-seconds",
        "3",
        "--user-agent",
        "test-agent/1.0",
        "--max-document-bytes",
        "1048576",
        "--status-port",
        "9100",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .expect("Should parse full flag set");

    assert_eq!(config.port, 9000);
    assert!(!config.bind.is_loopback());
    assert_eq!(config.timeout_seconds, 3);
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert_eq!(config.max_document_bytes, 1_048_576);
    assert_eq!(config.status_port, Some(9100));
    assert_eq!(
        log::LevelFilter::from(config.log_level),
        log::LevelFilter::Debug
    );
}

#[test]
fn test_public_base_url_parses() {
    let config = Config::try_parse_from([
        "esi_gateway",
        "--public-base-url",
        "https://site.example/",
    ])
    .expect("Should parse public base URL");
    assert_eq!(
        config.public_base_url.map(|u| u.to_string()),
        Some("https://site.example/".to_string())
    );
}

#[test]
fn test_invalid_public_base_url_rejected() {
    let result = Config::try_parse_from(["esi_gateway", "--public-base-url", "not a url"]);
    assert!(result.is_err());
}

#[test]
fn test_invalid_bind_rejected() {
    let result = Config::try_parse_from(["esi_gateway", "--bind", "not-an-ip"]);
    assert!(result.is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    let result = Config::try_parse_from(["esi_gateway", "--log-level", "verbose"]);
    assert!(result.is_err());
}
