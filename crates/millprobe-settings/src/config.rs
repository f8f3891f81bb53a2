//! Configuration management for MillProbe
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Logging (level filter, output format)
//! - Output (whether values are checked against their bounds before compiling)
//! - Defaults (stored per-operation setting values layered over the catalog)

use crate::error::{SettingsError, SettingsResult};
use indexmap::IndexMap;
use millprobe_core::{ProbeError, SettingKind};
use millprobe_probe::{lookup, SettingDescriptor, SettingValue, SnapshotBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level filter (`error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
    /// Emit log records as JSON
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Command output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Check values against their advisory bounds before compiling
    pub validate_bounds: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            validate_bounds: true,
        }
    }
}

/// A stored setting value as written in a config file
///
/// Files carry plain booleans and numbers; the kind is taken from the
/// setting's descriptor when the value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// `true` / `false`
    Boolean(bool),
    /// Whole number, used for enum indices and integral numbers
    Integer(i64),
    /// Decimal number
    Float(f64),
}

impl DefaultValue {
    /// Interpret this value for a setting of the given kind
    pub fn to_setting_value(self, kind: SettingKind) -> SettingValue {
        match (self, kind) {
            (Self::Integer(i), SettingKind::Enum) if i >= 0 => SettingValue::Enum(i as usize),
            (Self::Integer(i), _) => SettingValue::Number(i as f64),
            (Self::Float(f), _) => SettingValue::Number(f),
            (Self::Boolean(b), _) => SettingValue::Boolean(b),
        }
    }

    fn resolve(self, key: &str, descriptor: &SettingDescriptor) -> SettingsResult<SettingValue> {
        Ok(descriptor.accept(key, self.to_setting_value(descriptor.kind()))?)
    }
}

impl From<SettingValue> for DefaultValue {
    fn from(value: SettingValue) -> Self {
        match value {
            SettingValue::Boolean(b) => Self::Boolean(b),
            SettingValue::Number(n) => Self::Float(n),
            SettingValue::Enum(i) => Self::Integer(i as i64),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingSettings,
    /// Output settings
    pub output: OutputSettings,
    /// Stored defaults: operation key → setting key → value
    pub defaults: IndexMap<String, IndexMap<String, DefaultValue>>,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/millprobe/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("millprobe").join("config.toml"))
    }

    /// Load the config from its default location
    ///
    /// A missing file is not an error and yields the built-in defaults.
    pub fn load_default() -> SettingsResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(SettingsError::UnsupportedFormat(path.display().to_string()));
        };

        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(SettingsError::UnsupportedFormat(path.display().to_string()));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if tracing::Level::from_str(&self.logging.level).is_err() {
            return Err(SettingsError::InvalidSetting {
                key: "logging.level".to_string(),
                reason: format!("unknown level '{}'", self.logging.level),
            });
        }

        for (operation, values) in &self.defaults {
            let op = lookup(operation)?;
            for (key, value) in values {
                let descriptor = op.setting(key).ok_or_else(|| {
                    ProbeError::UnknownSetting {
                        operation: operation.clone(),
                        setting: key.clone(),
                    }
                })?;
                value.resolve(key, descriptor)?;
            }
        }

        Ok(())
    }

    /// Store a default value for a setting of an operation
    pub fn set_default(
        &mut self,
        operation: &str,
        setting: &str,
        value: SettingValue,
    ) -> SettingsResult<()> {
        let op = lookup(operation)?;
        let descriptor =
            op.setting(setting)
                .ok_or_else(|| ProbeError::UnknownSetting {
                    operation: operation.to_string(),
                    setting: setting.to_string(),
                })?;
        let value = descriptor.accept(setting, value)?;
        self.defaults
            .entry(operation.to_string())
            .or_default()
            .insert(setting.to_string(), value.into());
        Ok(())
    }

    /// Layer the stored defaults for the builder's operation onto it
    pub fn apply_defaults(&self, builder: &mut SnapshotBuilder) -> SettingsResult<()> {
        let Some(values) = self.defaults.get(builder.operation()) else {
            return Ok(());
        };
        let op = lookup(builder.operation())?;
        for (key, value) in values {
            let descriptor =
                op.setting(key)
                    .ok_or_else(|| ProbeError::UnknownSetting {
                        operation: op.key.clone(),
                        setting: key.clone(),
                    })?;
            let value = value.resolve(key, descriptor)?;
            builder.set(key, value)?;
            tracing::debug!("Applied stored default {}.{} = {}", op.key, key, value);
        }
        Ok(())
    }
}
