use millprobe_probe::{compile, lookup, SettingValue, SnapshotBuilder};
use millprobe_settings::{Config, DefaultValue, SettingsError};
use std::fs;
use tempfile::TempDir;

fn probe_config() -> Config {
    let mut config = Config::new();
    config.logging.level = "debug".to_string();
    config.output.validate_bounds = false;
    config
        .set_default("bore", "overtravel", SettingValue::Number(4.5))
        .unwrap();
    config
        .set_default("outside_corner", "corner", SettingValue::Enum(2))
        .unwrap();
    config
        .set_default("web", "quick", SettingValue::Boolean(true))
        .unwrap();
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let config = probe_config();
    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();

    assert_eq!(loaded.logging.level, "debug");
    assert!(!loaded.output.validate_bounds);
    assert_eq!(
        loaded.defaults["bore"]["overtravel"],
        DefaultValue::Float(4.5)
    );
    assert_eq!(
        loaded.defaults["outside_corner"]["corner"],
        DefaultValue::Integer(2)
    );
    assert_eq!(loaded.defaults["web"]["quick"], DefaultValue::Boolean(true));
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let config = probe_config();
    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();

    assert_eq!(loaded.logging, config.logging);
    assert_eq!(loaded.output, config.output);
    assert_eq!(loaded.defaults.len(), 3);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("millprobe").join("nested").join("config.toml");
    Config::new().save_to_file(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[logging]\njson = true\n").unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert!(config.logging.json);
    assert_eq!(config.logging.level, "info");
    assert!(config.output.validate_bounds);
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.ini");

    let err = Config::new().save_to_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::UnsupportedFormat(_)));

    fs::write(&path, "level = info").unwrap();
    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::UnsupportedFormat(_)));
}

#[test]
fn test_unknown_operation_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[defaults.drill]\ndepth = 3.0\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Probe(_)));
}

#[test]
fn test_unknown_setting_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[defaults.bore]\nquick = true\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Probe(_)));
}

#[test]
fn test_wrong_kind_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "defaults": { "bore": { "diameter": true } } }"#).unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Probe(_)));
}

#[test]
fn test_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[logging\nlevel = ").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::TomlError(_)));
}

#[test]
fn test_stored_defaults_flow_into_compiled_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[defaults.bore]\ndiameter = 22\novertravel = 1\n").unwrap();
    let config = Config::load_from_file(&path).unwrap();

    let bore = lookup("bore").unwrap();
    let mut builder = SnapshotBuilder::from_operation(bore);
    config.apply_defaults(&mut builder).unwrap();
    builder.set("depth", 8.0).unwrap();
    let snapshot = builder.build().unwrap();

    assert_eq!(compile(bore.code, &snapshot, None), "G6500.1 H22 Z8 O1");
}
