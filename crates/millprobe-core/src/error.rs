//! Error handling for MillProbe
//!
//! Provides error types for every layer of probe command generation:
//! - Probe errors (catalog lookup, snapshot construction, bounds checks)
//! - G-Code errors (word formatting, work coordinate selection)
//!
//! All error types use `thiserror` for ergonomic error handling. None of
//! them are retryable: the inputs are static configuration, so a failure
//! always means no command line is produced.

use crate::types::SettingKind;
use thiserror::Error;

/// Probe error type
///
/// Represents failures while resolving an operation from the catalog,
/// building a settings snapshot for it, or checking its values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// Requested operation key is not in the catalog
    #[error("Unknown probe operation: {key}")]
    CatalogLookupFailure {
        /// The key that was looked up.
        key: String,
    },

    /// A setting's condition refers to a setting missing from the snapshot
    #[error("Setting '{setting}' depends on unknown setting '{condition}'")]
    UnresolvedCondition {
        /// The setting that declares the condition.
        setting: String,
        /// The missing setting key the condition refers to.
        condition: String,
    },

    /// An override names a setting the operation does not declare
    #[error("Operation '{operation}' has no setting '{setting}'")]
    UnknownSetting {
        /// The operation key.
        operation: String,
        /// The unknown setting key.
        setting: String,
    },

    /// A value of the wrong kind was supplied for a setting
    #[error("Setting '{setting}' expects a {expected} value, got {actual}")]
    KindMismatch {
        /// The setting key.
        setting: String,
        /// The kind declared by the descriptor.
        expected: SettingKind,
        /// The kind of the supplied value.
        actual: SettingKind,
    },

    /// A numeric value lies outside the descriptor's advisory range
    #[error("Setting '{setting}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        /// The setting key.
        setting: String,
        /// The offending value.
        value: f64,
        /// Lower bound, `-inf` when unbounded.
        min: f64,
        /// Upper bound, `inf` when unbounded.
        max: f64,
    },

    /// An enum index does not select any option
    #[error("Setting '{setting}' has no option {index} ({count} options)")]
    InvalidOption {
        /// The setting key.
        setting: String,
        /// The selected index.
        index: usize,
        /// Number of declared options.
        count: usize,
    },

    /// Text input could not be interpreted as a value for the setting
    #[error("Invalid value for '{setting}': {value}")]
    InvalidValue {
        /// The setting key.
        setting: String,
        /// The rejected input.
        value: String,
    },

    /// Text input could not be interpreted as a modifier
    #[error("Invalid modifier '{input}': expected <letter>=<offset>")]
    InvalidModifier {
        /// The rejected input.
        input: String,
    },
}

/// G-Code error type
///
/// Represents errors while producing individual G-code words.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// Work coordinate system index has no G-code equivalent
    #[error("Work coordinate system {index} not available (max {max})")]
    InvalidWorkplace {
        /// The requested zero-based index.
        index: usize,
        /// Highest supported index.
        max: usize,
    },
}

/// Main error type for MillProbe
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Probe error
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a catalog lookup failure
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Error::Probe(ProbeError::CatalogLookupFailure { .. }))
    }

    /// Check if this is a probe error
    pub fn is_probe_error(&self) -> bool {
        matches!(self, Error::Probe(_))
    }

    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
