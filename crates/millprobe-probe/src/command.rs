//! Probe command compiler
//!
//! Serializes one operation's settings snapshot into a single line of
//! G-code: the cycle's G code followed by one `<letter><value>` word per
//! emitted setting, in snapshot order, separated by single spaces.
//!
//! Per setting:
//! - settings without an output letter are skipped;
//! - settings whose condition does not hold are omitted entirely;
//! - booleans are written as `1`/`0`, enum values as the option index;
//! - numbers are written as stored, unless a modifier exists for their
//!   letter, in which case `value * multiplier + offset` is written.
//!
//! The multiplier only takes part in modifier arithmetic. A depth of 5 with
//! multiplier -1 is written as `Z5` when no `Z` modifier is given. Macros on
//! the controller side rely on this, so it is kept as is.

use crate::catalog::{lookup, OperationType};
use crate::modifier::{is_number_modifier, ValueModifier, ValueModifiers};
use crate::setting::SettingValue;
use crate::snapshot::{SettingsSnapshot, SnapshotBuilder};
use millprobe_core::{format_code, format_number, format_word, ProbeError};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A probe cycle ready to be written as G-code
#[derive(Debug, Clone)]
pub struct ProbeCommand {
    code: f64,
    settings: SettingsSnapshot,
}

impl ProbeCommand {
    /// Create a command from a G code and a snapshot
    pub fn new(code: f64, settings: SettingsSnapshot) -> Self {
        Self { code, settings }
    }

    /// Create a command for a catalog operation using its default values
    pub fn with_defaults(operation: &OperationType) -> Result<Self, ProbeError> {
        Ok(Self::new(
            operation.code,
            SettingsSnapshot::defaults(operation)?,
        ))
    }

    /// G code of the cycle
    pub fn code(&self) -> f64 {
        self.code
    }

    /// Settings snapshot
    pub fn settings(&self) -> &SettingsSnapshot {
        &self.settings
    }

    /// Write the command line
    pub fn to_gcode(&self, modifiers: Option<&ValueModifiers>) -> String {
        compile(self.code, &self.settings, modifiers)
    }
}

/// Compile a snapshot into a single G-code line
///
/// Each modifier is applied to at most one setting: the first included
/// number setting carrying its letter.
pub fn compile(code: f64, settings: &SettingsSnapshot, modifiers: Option<&ValueModifiers>) -> String {
    let mut words = vec![format_code(code)];
    let mut consumed: HashSet<char> = HashSet::new();

    for setting in settings.iter() {
        let Some(letter) = setting.descriptor().parameter else {
            continue;
        };

        if !settings.is_included(setting) {
            debug!(
                "Omitting {} from {}: condition not met",
                setting.key(),
                settings.operation()
            );
            continue;
        }

        let word = match setting.value() {
            SettingValue::Boolean(enabled) => format_word(letter, u8::from(enabled)),
            SettingValue::Number(value) => {
                let modifier = modifiers
                    .and_then(|m| m.get(letter))
                    .filter(|m| is_number_modifier(m) && !consumed.contains(&letter));
                match modifier {
                    Some(ValueModifier::Offset(offset)) => {
                        consumed.insert(letter);
                        let adjusted = value * setting.descriptor().multiplier + offset;
                        debug!(
                            "Applied {} modifier {} to {}: {} -> {}",
                            letter,
                            offset,
                            setting.key(),
                            value,
                            adjusted
                        );
                        format_word(letter, format_number(adjusted))
                    }
                    None => format_word(letter, format_number(value)),
                }
            }
            SettingValue::Enum(index) => format_word(letter, index),
        };
        words.push(word);
    }

    if let Some(modifiers) = modifiers {
        for letter in modifiers.letters().filter(|l| !consumed.contains(l)) {
            warn!(
                "Modifier for {} matched no setting of {}",
                letter,
                settings.operation()
            );
        }
    }

    words.join(" ")
}

/// Look up an operation, apply overrides to its defaults and compile it
///
/// * `key` - catalog key of the operation
/// * `overrides` - `(setting key, value)` pairs applied in order
/// * `modifiers` - optional offsets keyed by output letter
pub fn compile_operation<'a, I>(
    key: &str,
    overrides: I,
    modifiers: Option<&ValueModifiers>,
) -> Result<String, ProbeError>
where
    I: IntoIterator<Item = (&'a str, SettingValue)>,
{
    let operation = lookup(key)?;
    let mut builder = SnapshotBuilder::from_operation(operation);
    for (setting, value) in overrides {
        builder.set(setting, value)?;
    }
    let snapshot = builder.build()?;
    Ok(compile(operation.code, &snapshot, modifiers))
}
