//! # MillProbe
//!
//! Probe cycle settings catalog and G-code command compiler for CNC mills.
//!
//! ## Architecture
//!
//! MillProbe is organized as a workspace with multiple crates:
//!
//! 1. **millprobe-core** - Error types, setting kinds, G-code word formatting
//! 2. **millprobe-probe** - Operation catalog, settings snapshots, command compiler
//! 3. **millprobe-settings** - Configuration files and stored probe defaults
//! 4. **millprobe** - Command line front end that integrates all crates
//!
//! ## Features
//!
//! - **Probe Catalog**: bore, boss, rectangular pockets and blocks, webs,
//!   single-axis pockets, outside and vise corners, single surfaces
//! - **Command Compiler**: one line per cycle, with external offsets folded
//!   into number settings by output letter
//! - **Stored Defaults**: per-operation defaults in TOML or JSON config files

pub mod cli;

pub use millprobe_core::{
    format_code, format_number, format_word, workplace_as_gcode, Error, GcodeError, ProbeError,
    Result, SettingKind, MAX_WORKPLACES,
};

pub use millprobe_probe::{
    catalog, compile, compile_operation, keys, lookup, Catalog, Condition, OperationType,
    ProbeCommand, ResolvedSetting, SettingDescriptor, SettingOption, SettingSpec, SettingValue,
    SettingsSnapshot, SnapshotBuilder, ValueModifier, ValueModifiers,
};

pub use millprobe_settings::{
    Config, DefaultValue, LoggingSettings, OutputSettings, SettingsError, SettingsResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging from the logging settings
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout to the generated G-code
/// - RUST_LOG environment variable support, falling back to `settings.level`
/// - Pretty or JSON formatting
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)?,
    };

    let json_layer = settings.json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
    });

    let pretty_layer = (!settings.json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()?;

    Ok(())
}
