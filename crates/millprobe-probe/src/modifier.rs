//! Value modifiers
//!
//! A modifier turns a relative setting into an absolute coordinate at
//! compile time. The caller supplies an offset for an output address
//! letter, for example the current machine Z position for the `Z` word,
//! and the compiler writes `value * multiplier + offset` instead of the
//! stored value.

use millprobe_core::ProbeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Externally supplied adjustment of one output word
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ValueModifier {
    /// Offset added to the scaled value of a number setting
    Offset(f64),
}

/// Check whether a modifier applies to number settings
pub fn is_number_modifier(modifier: &ValueModifier) -> bool {
    matches!(modifier, ValueModifier::Offset(_))
}

/// Modifiers keyed by output address letter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueModifiers {
    modifiers: BTreeMap<char, ValueModifier>,
}

impl ValueModifiers {
    /// Create an empty modifier set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an offset for `letter`, replacing any previous modifier
    pub fn insert(&mut self, letter: char, offset: f64) -> &mut Self {
        self.modifiers
            .insert(letter.to_ascii_uppercase(), ValueModifier::Offset(offset));
        self
    }

    /// Builder form of [`ValueModifiers::insert`]
    pub fn with_offset(mut self, letter: char, offset: f64) -> Self {
        self.insert(letter, offset);
        self
    }

    /// Get the modifier for `letter`
    pub fn get(&self, letter: char) -> Option<&ValueModifier> {
        self.modifiers.get(&letter.to_ascii_uppercase())
    }

    /// Letters that carry a modifier
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.modifiers.keys().copied()
    }

    /// Number of modifiers
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Check if there are no modifiers
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Parse a single `<letter>=<offset>` entry, e.g. `Z=-30`
    pub fn parse_entry(input: &str) -> Result<(char, f64), ProbeError> {
        let invalid = || ProbeError::InvalidModifier {
            input: input.to_string(),
        };
        let (letter, offset) = input.split_once('=').ok_or_else(invalid)?;
        let mut chars = letter.trim().chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c,
            _ => return Err(invalid()),
        };
        let offset: f64 = offset.trim().parse().map_err(|_| invalid())?;
        if !offset.is_finite() {
            return Err(invalid());
        }
        Ok((letter, offset))
    }
}

impl FromStr for ValueModifiers {
    type Err = ProbeError;

    /// Parse a comma separated list such as `Z=-30,X=1.5`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Self::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (letter, offset) = Self::parse_entry(entry)?;
            modifiers.insert(letter, offset);
        }
        Ok(modifiers)
    }
}

impl FromIterator<(char, f64)> for ValueModifiers {
    fn from_iter<I: IntoIterator<Item = (char, f64)>>(iter: I) -> Self {
        let mut modifiers = Self::new();
        for (letter, offset) in iter {
            modifiers.insert(letter, offset);
        }
        modifiers
    }
}
