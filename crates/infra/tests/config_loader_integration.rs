//! Integration tests for configuration loader
//!
//! Loads the shipped example configuration from disk in both supported
//! formats.

use std::fs;

use ticketmail_domain::TicketMailError;
use ticketmail_infra::config;

const EXAMPLE: &str = include_str!("../../../ticketmail.example.toml");

#[test]
fn test_load_example_toml_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("ticketmail.toml");
    fs::write(&path, EXAMPLE).expect("write config");

    let config = config::load(Some(path)).expect("example config loads");

    assert_eq!(config.event_name, "SummerHack 2024");
    assert_eq!(config.smtp.port, 465);
    assert_eq!(config.report.locale, "da");
    assert_eq!(config.unions.len(), 1);
}

#[test]
fn test_load_same_config_as_json() {
    let value: serde_json::Value = toml::from_str(EXAMPLE).expect("example is valid TOML");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, serde_json::to_string_pretty(&value).expect("json")).expect("write config");

    let from_json = config::load_from_file(Some(path)).expect("json config loads");
    let from_toml: ticketmail_domain::Config = toml::from_str(EXAMPLE).expect("toml config");
    assert_eq!(from_json, from_toml);
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/ticketmail.toml".into()));

    match result {
        Err(TicketMailError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_with_invalid_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("ticketmail.json");
    fs::write(&path, r#"{ "this is": "not valid" "#).expect("write config");

    match config::load_from_file(Some(path)) {
        Err(TicketMailError::Config(msg)) => assert!(msg.contains("Invalid JSON")),
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_unknown_locale_is_rejected_at_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("ticketmail.toml");
    fs::write(&path, EXAMPLE.replace("locale = \"da\"", "locale = \"xx-nope\"")).expect("write");

    assert!(matches!(config::load(Some(path)), Err(TicketMailError::Config(_))));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("ticketmail.ini");
    fs::write(&path, EXAMPLE).expect("write config");

    match config::load_from_file(Some(path)) {
        Err(TicketMailError::Config(msg)) => assert!(msg.contains("ini")),
        other => panic!("Expected Config error, got {other:?}"),
    }
}
