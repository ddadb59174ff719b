//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use coachd_core::config::{Config, StoreKind};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    // Defaults should survive the roundtrip
    assert_eq!(loaded.gateway.port, config.gateway.port);
    assert_eq!(loaded.gateway.bind, config.gateway.bind);
    assert_eq!(loaded.provider.model, config.provider.model);
    assert_eq!(loaded.store.kind, StoreKind::Memory);
    assert_eq!(
        loaded.limits.assistant_max_iterations,
        config.limits.assistant_max_iterations
    );
    assert_eq!(
        loaded.limits.intake_max_iterations,
        config.limits.intake_max_iterations
    );
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.gateway.port = 9090;
    config.store.kind = StoreKind::File;
    config.limits.assistant_max_iterations = 8;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.gateway.port, 9090);
    assert_eq!(loaded.store.kind, StoreKind::File);
    assert_eq!(loaded.limits.assistant_max_iterations, 8);
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/config.json"));
    assert!(result.is_err());
}

#[test]
fn test_unset_api_key_omitted_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    Config::default().save(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("api_key"));
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"gateway": {"port": 9999}}"#).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.gateway.port, 9999);
    assert_eq!(loaded.gateway.bind, "127.0.0.1");
    assert_eq!(loaded.limits.assistant_max_iterations, 5);
}
