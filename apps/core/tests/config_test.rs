use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use appswitch_core::config::{load, save, validate, Config, ConfigError};

fn temp_dir(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("appswitch-config-{label}-{unique}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn defaults_are_valid() {
    let config = Config::default();
    assert!(validate(&config).is_ok());
    assert_eq!(config.max_results, 5);
    assert_eq!(config.recency_capacity, 25);
    assert_eq!(config.bundle_scan_timeout_ms, 50);
    assert_eq!(config.installed_cache_ttl_secs, 180);
    assert!(config
        .application_dirs
        .contains(&PathBuf::from("/System/Applications")));
}

#[test]
fn missing_file_yields_defaults_at_that_path() {
    let dir = temp_dir("missing");
    let path = dir.join("absent.toml");

    let config = load(Some(&path)).unwrap();

    assert_eq!(config.config_path, path);
    assert_eq!(config.max_results, Config::default().max_results);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn toml_overrides_selected_fields() {
    let dir = temp_dir("toml");
    let path = dir.join("config.toml");
    std::fs::write(&path, "max_results = 8\napplication_dirs = [\"/Applications\"]\n").unwrap();

    let config = load(Some(&path)).unwrap();

    assert_eq!(config.max_results, 8);
    assert_eq!(config.application_dirs, vec![PathBuf::from("/Applications")]);
    assert_eq!(config.recency_capacity, 25);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn json5_is_accepted_by_extension() {
    let dir = temp_dir("json5");
    let path = dir.join("config.json5");
    std::fs::write(&path, "{\n  // tighter scan budget\n  bundle_scan_timeout_ms: 25,\n}\n").unwrap();

    let config = load(Some(&path)).unwrap();

    assert_eq!(config.bundle_scan_timeout_ms, 25);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn out_of_range_values_are_rejected() {
    let dir = temp_dir("invalid");
    let path = dir.join("config.toml");
    std::fs::write(&path, "max_results = 0\n").unwrap();

    let result = load(Some(&path));

    assert!(matches!(result, Err(ConfigError::Invalid(_))));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn malformed_file_reports_parse_error() {
    let dir = temp_dir("malformed");
    let path = dir.join("config.toml");
    std::fs::write(&path, "max_results = [").unwrap();

    assert!(matches!(load(Some(&path)), Err(ConfigError::Parse { .. })));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn saved_config_loads_back() {
    let dir = temp_dir("save");
    let mut config = Config::default();
    config.config_path = dir.join("nested").join("config.toml");
    config.max_results = 7;
    config.recency_capacity = 40;

    save(&config).unwrap();
    let loaded = load(Some(&config.config_path)).unwrap();

    assert_eq!(loaded, config);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn validation_names_the_offending_field() {
    let mut config = Config::default();
    config.application_dirs.clear();
    assert!(validate(&config).unwrap_err().contains("application_dirs"));

    let mut config = Config::default();
    config.recency_capacity = 500;
    assert!(validate(&config).unwrap_err().contains("recency_capacity"));
}

#[test]
fn zero_cache_ttl_is_rejected() {
    let mut config = Config::default();
    config.installed_cache_ttl_secs = 0;
    assert!(validate(&config)
        .unwrap_err()
        .contains("installed_cache_ttl_secs"));

    let dir = temp_dir("ttl");
    let path = dir.join("config.toml");
    std::fs::write(&path, "installed_cache_ttl_secs = 0\n").unwrap();

    assert!(matches!(load(Some(&path)), Err(ConfigError::Invalid(_))));
    std::fs::remove_dir_all(&dir).unwrap();
}
