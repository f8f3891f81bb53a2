//! # MillProbe Core
//!
//! Core types and utilities shared by the MillProbe crates.
//! Provides the error taxonomy, the setting kind discriminant and
//! the G-code word formatting used when probe commands are compiled.

pub mod error;
pub mod format;
pub mod types;
pub mod wcs;

pub use error::{Error, GcodeError, ProbeError, Result};
pub use format::{format_code, format_number, format_word};
pub use types::SettingKind;
pub use wcs::{workplace_as_gcode, MAX_WORKPLACES};
