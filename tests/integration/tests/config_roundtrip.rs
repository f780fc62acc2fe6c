//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use sigvault_core::config::{Config, LogFormat, LogLevel, StorageBackend};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sigvault.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.mount.path, "sigv4/");
    assert_eq!(loaded.storage.backend, StorageBackend::File);
    assert!(loaded.storage.path.is_none());
    assert_eq!(loaded.logging.level, LogLevel::Info);
    assert_eq!(loaded.logging.format, LogFormat::Pretty);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sigvault.json5");

    let mut config = Config::default();
    config.mount.path = "aws/keys/".to_string();
    config.storage.path = Some(dir.path().join("records"));
    config.logging.format = LogFormat::Json;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.mount.path, "aws/keys/");
    assert_eq!(loaded.storage_dir().unwrap(), dir.path().join("records"));
    assert_eq!(loaded.logging.format, LogFormat::Json);
    loaded.validate().unwrap();
}

#[test]
fn test_config_accepts_json5_syntax() {
    let config = Config::parse(
        r#"{
            // comments and trailing commas are allowed
            storage: { backend: "memory", },
            logging: { level: "debug" },
        }"#,
    )
    .unwrap();
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.mount.path, "sigv4/");
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/sigvault.json5"));
    assert!(result.is_err());

    let fallback = Config::load_or_default(Some(Path::new("/nonexistent/sigvault.json5"))).unwrap();
    assert_eq!(fallback.mount.path, "sigv4/");
}

#[test]
fn test_config_parse_invalid() {
    assert!(Config::parse("not valid json").is_err());
    assert!(Config::parse(r#"{ logging: { level: "loud" } }"#).is_err());
}
