//! # MillProbe Probe
//!
//! Probe operation catalog and probe command compiler.
//!
//! ## Components
//!
//! - **Setting Catalog**: read-only registry of probing cycles (bore, boss,
//!   pockets, blocks, webs, corners, single surfaces) and their settings
//! - **Snapshots**: current values for one operation instance, with
//!   conditions resolved up front
//! - **Command Compiler**: turns a snapshot into one line of G-code,
//!   optionally folding external offsets into number settings
//!
//! ## Example
//!
//! ```
//! use millprobe_probe::{lookup, SnapshotBuilder, ValueModifiers, compile};
//!
//! let bore = lookup("bore").unwrap();
//! let mut builder = SnapshotBuilder::from_operation(bore);
//! builder.set("diameter", 12.0).unwrap();
//! let snapshot = builder.build().unwrap();
//!
//! assert_eq!(compile(bore.code, &snapshot, None), "G6500.1 H12 Z5 O2");
//!
//! let mods = ValueModifiers::new().with_offset('Z', -30.0);
//! assert_eq!(compile(bore.code, &snapshot, Some(&mods)), "G6500.1 H12 Z-35 O2");
//! ```

pub mod catalog;
pub mod command;
pub mod modifier;
pub mod setting;
pub mod snapshot;

pub use catalog::{catalog, keys, lookup, Catalog, OperationType};
pub use command::{compile, compile_operation, ProbeCommand};
pub use modifier::{is_number_modifier, ValueModifier, ValueModifiers};
pub use setting::{
    is_boolean_setting, is_enum_setting, is_number_setting, Condition, SettingDescriptor,
    SettingOption, SettingSpec, SettingValue,
};
pub use snapshot::{ResolvedSetting, SettingsSnapshot, SnapshotBuilder};

pub use millprobe_core::{ProbeError, SettingKind};
