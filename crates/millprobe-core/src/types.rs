//! Shared type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value domain of a probe setting
///
/// Determines which values a setting accepts and how the value is
/// serialized into a G-code word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    /// On/off flag, emitted as `1` or `0`
    Boolean,
    /// Decimal value, emitted in its shortest decimal form
    Number,
    /// Index into an ordered list of options
    Enum,
}

impl SettingKind {
    /// Get all setting kinds
    pub fn all() -> &'static [SettingKind] {
        &[SettingKind::Boolean, SettingKind::Number, SettingKind::Enum]
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::Enum => write!(f, "enum"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(SettingKind::Boolean.to_string(), "boolean");
        assert_eq!(SettingKind::Number.to_string(), "number");
        assert_eq!(SettingKind::Enum.to_string(), "enum");
    }

    #[test]
    fn test_all_kinds_distinct() {
        let kinds = SettingKind::all();
        assert_eq!(kinds.len(), 3);
        assert_ne!(kinds[0], kinds[1]);
        assert_ne!(kinds[1], kinds[2]);
    }
}
