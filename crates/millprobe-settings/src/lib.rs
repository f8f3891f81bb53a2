//! MillProbe Settings Crate
//!
//! Handles application configuration, config file persistence and stored
//! per-operation probe defaults.

pub mod config;
pub mod error;

pub use config::{Config, DefaultValue, LoggingSettings, OutputSettings};
pub use error::{SettingsError, SettingsResult};
