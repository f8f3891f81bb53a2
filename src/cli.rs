//! Command line interface
//!
//! Parsing is done with clap; every subcommand renders its result to a
//! string so `main` only has to print it.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use millprobe_core::{format_code, workplace_as_gcode};
use millprobe_probe::{
    catalog, compile, lookup, OperationType, SettingDescriptor, SettingSpec, SnapshotBuilder,
    ValueModifiers,
};
use millprobe_settings::Config;
use std::fmt::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (.toml or .json). Defaults to the platform config directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the probe operations
    List,

    /// Show the settings of a probe operation
    Show {
        /// Operation key, e.g. `bore`
        operation: String,

        /// Print the operation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a probe operation into one line of G-code
    Compile {
        /// Operation key, e.g. `bore`
        operation: String,

        /// Override a setting, e.g. `--set diameter=12`
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,

        /// Offset added to a number setting by letter, e.g. `--modifier Z=-30`
        #[arg(long = "modifier", value_name = "LETTER=OFFSET")]
        modifiers: Vec<String>,

        /// Skip the bounds check
        #[arg(long)]
        no_validate: bool,
    },

    /// Print the G-code selecting a work coordinate system (0 = G54)
    Wcs {
        /// Zero-based work coordinate system index
        index: usize,
    },
}

impl Cli {
    /// Load the configuration named on the command line, or the default one
    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display())),
            None => Config::load_default().context("Failed to load default config"),
        }
    }

    /// Run the selected subcommand and return its output
    pub fn run(&self, config: &Config) -> anyhow::Result<String> {
        match &self.command {
            Command::List => Ok(list_operations()),
            Command::Show { operation, json } => {
                let operation = lookup(operation)?;
                if *json {
                    Ok(serde_json::to_string_pretty(operation)?)
                } else {
                    Ok(describe_operation(operation)?)
                }
            }
            Command::Compile {
                operation,
                overrides,
                modifiers,
                no_validate,
            } => compile_command(config, operation, overrides, modifiers, *no_validate),
            Command::Wcs { index } => Ok(workplace_as_gcode(*index)?),
        }
    }
}

fn list_operations() -> String {
    catalog()
        .iter()
        .map(|op| format!("{:<18} {:<9} {}", op.key, format_code(op.code), op.name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_operation(operation: &OperationType) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{} ({})", operation.name, format_code(operation.code))?;
    writeln!(out, "{}", operation.description)?;

    for (key, descriptor) in &operation.settings {
        let letter = descriptor.parameter.map(String::from).unwrap_or_else(|| "-".into());
        write!(
            out,
            "\n  {:<18} {} {:<7} default {}",
            key,
            letter,
            descriptor.kind(),
            describe_default(descriptor)
        )?;
        if let SettingSpec::Number {
            min: Some(min),
            max: Some(max),
            ..
        } = &descriptor.spec
        {
            write!(out, " [{}..{}]", min, max)?;
        }
        if let Some(unit) = &descriptor.unit {
            write!(out, " {}", unit)?;
        }
        if let Some(condition) = &descriptor.condition {
            write!(out, " (when {} = {})", condition.setting, condition.value)?;
        }
    }
    Ok(out)
}

fn describe_default(descriptor: &SettingDescriptor) -> String {
    let value = descriptor.default_value();
    match descriptor.option_label(&value) {
        Some(label) => format!("{} ({})", value, label),
        None => value.to_string(),
    }
}

fn compile_command(
    config: &Config,
    operation: &str,
    overrides: &[String],
    modifiers: &[String],
    no_validate: bool,
) -> anyhow::Result<String> {
    let operation = lookup(operation)?;
    let mut builder = SnapshotBuilder::from_operation(operation);
    config.apply_defaults(&mut builder)?;

    for entry in overrides {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", entry))?;
        builder.set_text(key.trim(), value)?;
    }
    let snapshot = builder.build()?;

    if config.output.validate_bounds && !no_validate {
        snapshot.check_bounds()?;
    }

    let modifiers = modifiers
        .iter()
        .map(|entry| ValueModifiers::parse_entry(entry))
        .collect::<Result<ValueModifiers, _>>()?;

    Ok(compile(operation.code, &snapshot, Some(&modifiers)))
}
