//! Unit tests for configuration loading and graceful degradation
//!
//! Tests that manipulate RFSC_CONFIG are marked with #[serial] so they run
//! sequentially, not in parallel.

use rfsc_common::config::{load_config, load_toml_config, TomlConfig, CONFIG_ENV_VAR};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::Path;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_full_config_file() {
    let file = write_config(
        r#"
bind_address = "0.0.0.0"
port = 6100
max_upload_bytes = 1048576
max_sessions = 4

[logging]
level = "debug"

[peak_detection]
height = -70.5
distance = 2
"#,
    );

    let config = load_toml_config(file.path()).unwrap();
    assert_eq!(config.bind_address, "0.0.0.0");
    assert_eq!(config.port, 6100);
    assert_eq!(config.max_upload_bytes, 1_048_576);
    assert_eq!(config.max_sessions, 4);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.file.is_none());
    assert_eq!(config.peak_detection.height, Some(-70.5));
    assert_eq!(config.peak_detection.distance, Some(2));
    assert!(config.feature_extractor().is_ok());
}

#[test]
fn test_partial_config_fills_defaults() {
    let file = write_config("port = 6200\n");
    let config = load_toml_config(file.path()).unwrap();
    let defaults = TomlConfig::default();

    assert_eq!(config.port, 6200);
    assert_eq!(config.bind_address, defaults.bind_address);
    assert_eq!(config.max_sessions, defaults.max_sessions);
    assert_eq!(config.logging, defaults.logging);
}

#[test]
fn test_malformed_config_is_error() {
    let file = write_config("port = \"not a number\"\n");
    assert!(load_toml_config(file.path()).is_err());
}

#[test]
#[serial]
fn test_explicit_missing_path_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    assert!(load_config(Some(Path::new("/nonexistent/rfsc/rfsc-an.toml"))).is_err());
}

#[test]
#[serial]
fn test_env_var_config_path() {
    let file = write_config("port = 6300\n");
    env::set_var(CONFIG_ENV_VAR, file.path());

    let config = load_config(None).unwrap();
    assert_eq!(config.port, 6300);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_explicit_path_beats_env_var() {
    let env_file = write_config("port = 6400\n");
    let cli_file = write_config("port = 6500\n");
    env::set_var(CONFIG_ENV_VAR, env_file.path());

    let config = load_config(Some(cli_file.path())).unwrap();
    assert_eq!(config.port, 6500);

    env::remove_var(CONFIG_ENV_VAR);
}
