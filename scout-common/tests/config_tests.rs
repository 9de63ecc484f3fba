//! Config file discovery and loading
//!
//! Tests that touch SCOUT_CONFIG are marked #[serial] so they do not race
//! on the process environment.

use scout_common::config::{load_config, locate_config_file, LoggingConfig, TomlConfig};
use scout_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
#[serial]
fn test_explicit_path_wins_over_env() {
    let temp_dir = TempDir::new().unwrap();
    let explicit = temp_dir.path().join("explicit.toml");
    let from_env = temp_dir.path().join("env.toml");

    env::set_var("SCOUT_CONFIG", &from_env);
    let located = locate_config_file(Some(explicit.as_path()));
    env::remove_var("SCOUT_CONFIG");

    assert_eq!(located, Some(explicit));
}

#[test]
#[serial]
fn test_env_path_used_without_explicit() {
    let temp_dir = TempDir::new().unwrap();
    let from_env = temp_dir.path().join("env.toml");

    env::set_var("SCOUT_CONFIG", &from_env);
    let located = locate_config_file(None);
    env::remove_var("SCOUT_CONFIG");

    assert_eq!(located, Some(from_env));
}

#[test]
#[serial]
fn test_load_from_env_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
        base_url = "http://listing.test:9000"
        result_count = 7
        max_concurrency = 16

        [logging]
        level = "warn"
        "#,
    )
    .unwrap();

    env::set_var("SCOUT_CONFIG", &path);
    let config = load_config(None);
    env::remove_var("SCOUT_CONFIG");

    let loaded = config.unwrap();
    assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
    let config = loaded.config;
    assert_eq!(config.base_url.as_deref(), Some("http://listing.test:9000"));
    assert_eq!(config.result_count, Some(7));
    assert_eq!(config.max_concurrency, Some(16));
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "warn".to_string()
        }
    );
}

#[test]
#[serial]
fn test_missing_explicit_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let result = load_config(Some(missing.as_path()));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_unparseable_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "result_count = [not toml").unwrap();

    let result = load_config(Some(path.as_path()));
    match result {
        Err(Error::Config(msg)) => assert!(msg.contains("Parse")),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_toml_config_serializes_back() {
    let config = TomlConfig {
        base_url: Some("http://localhost:8080".to_string()),
        result_count: Some(5),
        ..Default::default()
    };

    let text = toml::to_string(&config).unwrap();
    let parsed: TomlConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}
