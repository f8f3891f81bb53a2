//! Probe setting descriptors and values
//!
//! A [`SettingDescriptor`] is the static schema of one configurable
//! parameter of a probe operation: its kind, default, advisory bounds,
//! output address letter and an optional visibility condition. A
//! [`SettingValue`] is the current value of such a parameter.
//!
//! Descriptors are immutable once built. Catalog entries share them through
//! `Arc`, and a per-operation variation is a modified copy of the shared
//! descriptor, never an in-place edit.

use millprobe_core::{ProbeError, SettingKind};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One selectable option of an enum setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingOption {
    /// Display icon
    pub icon: String,
    /// Display label
    pub label: String,
}

impl SettingOption {
    /// Create a new option
    pub fn new(icon: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            label: label.into(),
        }
    }
}

/// Current value of a setting
///
/// Written as a plain boolean or number. When read back, whole numbers
/// without a fraction part are option indices and decimals are numbers, so
/// `Enum(1)` (`1`) and `Number(1.0)` (`1.0`) stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Value of a boolean setting
    Boolean(bool),
    /// Value of a number setting
    Number(f64),
    /// Selected option index of an enum setting
    Enum(usize),
}

impl SettingValue {
    /// Kind of setting this value belongs to
    pub fn kind(&self) -> SettingKind {
        match self {
            Self::Boolean(_) => SettingKind::Boolean,
            Self::Number(_) => SettingKind::Number,
            Self::Enum(_) => SettingKind::Enum,
        }
    }
}

impl<'de> Deserialize<'de> for SettingValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SettingValueVisitor)
    }
}

struct SettingValueVisitor;

impl<'de> Visitor<'de> for SettingValueVisitor {
    type Value = SettingValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, a decimal number or an option index")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(SettingValue::Boolean(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        usize::try_from(v)
            .map(SettingValue::Enum)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        match u64::try_from(v) {
            Ok(index) => self.visit_u64(index),
            Err(_) => Ok(SettingValue::Number(v as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(SettingValue::Number(v))
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<usize> for SettingValue {
    fn from(value: usize) -> Self {
        Self::Enum(value)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Number(v) => write!(f, "{}", millprobe_core::format_number(*v)),
            Self::Enum(v) => write!(f, "{}", v),
        }
    }
}

/// Kind-specific part of a descriptor: default value and constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SettingSpec {
    /// On/off flag
    Boolean {
        /// Default value
        default: bool,
    },
    /// Decimal value with advisory bounds
    Number {
        /// Default value
        default: f64,
        /// Smallest accepted value
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Largest accepted value
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        /// Input increment
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    /// Choice from an ordered option list
    Enum {
        /// Default option index
        default: usize,
        /// Ordered options; the value is an index into this list
        options: Vec<SettingOption>,
    },
}

impl SettingSpec {
    /// Kind discriminant
    pub fn kind(&self) -> SettingKind {
        match self {
            Self::Boolean { .. } => SettingKind::Boolean,
            Self::Number { .. } => SettingKind::Number,
            Self::Enum { .. } => SettingKind::Enum,
        }
    }

    /// Default value
    pub fn default_value(&self) -> SettingValue {
        match self {
            Self::Boolean { default } => SettingValue::Boolean(*default),
            Self::Number { default, .. } => SettingValue::Number(*default),
            Self::Enum { default, .. } => SettingValue::Enum(*default),
        }
    }
}

/// Visibility rule: the setting is emitted only while another setting of
/// the same operation holds `value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Key of the controlling setting
    pub setting: String,
    /// Value the controlling setting must hold
    pub value: SettingValue,
}

/// Static schema of one probe setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDescriptor {
    /// Display label
    pub label: String,
    /// Help text
    pub description: String,
    /// Output address letter; settings without one are never emitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<char>,
    /// Display icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Scale factor applied before a modifier offset is added
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Display unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Visibility rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Kind, default and constraints
    #[serde(flatten)]
    pub spec: SettingSpec,
}

fn default_multiplier() -> f64 {
    1.0
}

impl SettingDescriptor {
    fn with_spec(label: &str, description: &str, spec: SettingSpec) -> Self {
        Self {
            label: label.to_string(),
            description: description.to_string(),
            parameter: None,
            icon: None,
            multiplier: 1.0,
            unit: None,
            condition: None,
            spec,
        }
    }

    /// Create a boolean setting
    pub fn boolean(label: &str, description: &str, default: bool) -> Self {
        Self::with_spec(label, description, SettingSpec::Boolean { default })
    }

    /// Create an unbounded number setting
    pub fn number(label: &str, description: &str, default: f64) -> Self {
        Self::with_spec(
            label,
            description,
            SettingSpec::Number {
                default,
                min: None,
                max: None,
                step: None,
            },
        )
    }

    /// Create an enum setting
    pub fn enumeration(
        label: &str,
        description: &str,
        default: usize,
        options: Vec<SettingOption>,
    ) -> Self {
        Self::with_spec(label, description, SettingSpec::Enum { default, options })
    }

    /// Set the output address letter
    pub fn parameter(mut self, letter: char) -> Self {
        self.parameter = Some(letter);
        self
    }

    /// Set the display icon
    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Set the display unit
    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    /// Set the modifier multiplier
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the advisory range of a number setting; ignored for other kinds
    pub fn range(mut self, lower: f64, upper: f64) -> Self {
        if let SettingSpec::Number { min, max, .. } = &mut self.spec {
            *min = Some(lower);
            *max = Some(upper);
        }
        self
    }

    /// Set the input increment of a number setting; ignored for other kinds
    pub fn step(mut self, increment: f64) -> Self {
        if let SettingSpec::Number { step, .. } = &mut self.spec {
            *step = Some(increment);
        }
        self
    }

    /// Only emit this setting while `setting` holds `value`
    pub fn condition(mut self, setting: &str, value: impl Into<SettingValue>) -> Self {
        self.condition = Some(Condition {
            setting: setting.to_string(),
            value: value.into(),
        });
        self
    }

    /// Kind discriminant
    pub fn kind(&self) -> SettingKind {
        self.spec.kind()
    }

    /// Default value
    pub fn default_value(&self) -> SettingValue {
        self.spec.default_value()
    }

    /// Options of an enum setting, empty for other kinds
    pub fn options(&self) -> &[SettingOption] {
        match &self.spec {
            SettingSpec::Enum { options, .. } => options,
            _ => &[],
        }
    }

    /// Label of the option selected by `value`, if it is a valid enum index
    pub fn option_label(&self, value: &SettingValue) -> Option<&str> {
        match value {
            SettingValue::Enum(index) => self.options().get(*index).map(|o| o.label.as_str()),
            _ => None,
        }
    }

    /// Check that `value` can be stored for this setting
    ///
    /// Only the kind is checked, and numbers must be finite. Bounds are
    /// advisory and checked separately by [`SettingDescriptor::check_bounds`].
    pub fn accept(&self, key: &str, value: SettingValue) -> Result<SettingValue, ProbeError> {
        if value.kind() != self.kind() {
            return Err(ProbeError::KindMismatch {
                setting: key.to_string(),
                expected: self.kind(),
                actual: value.kind(),
            });
        }
        if let SettingValue::Number(v) = value {
            if !v.is_finite() {
                return Err(ProbeError::InvalidValue {
                    setting: key.to_string(),
                    value: v.to_string(),
                });
            }
        }
        Ok(value)
    }

    /// Check `value` against the advisory bounds
    ///
    /// Numbers must lie within `min..=max`; enum indices must select an
    /// option. Boolean values always pass.
    pub fn check_bounds(&self, key: &str, value: &SettingValue) -> Result<(), ProbeError> {
        match (&self.spec, value) {
            (SettingSpec::Number { min, max, .. }, SettingValue::Number(v)) => {
                let lower = min.unwrap_or(f64::NEG_INFINITY);
                let upper = max.unwrap_or(f64::INFINITY);
                if *v < lower || *v > upper {
                    return Err(ProbeError::OutOfRange {
                        setting: key.to_string(),
                        value: *v,
                        min: lower,
                        max: upper,
                    });
                }
                Ok(())
            }
            (SettingSpec::Enum { options, .. }, SettingValue::Enum(index)) => {
                if *index >= options.len() {
                    return Err(ProbeError::InvalidOption {
                        setting: key.to_string(),
                        index: *index,
                        count: options.len(),
                    });
                }
                Ok(())
            }
            (SettingSpec::Boolean { .. }, SettingValue::Boolean(_)) => Ok(()),
            _ => Err(ProbeError::KindMismatch {
                setting: key.to_string(),
                expected: self.kind(),
                actual: value.kind(),
            }),
        }
    }

    /// Interpret text input as a value for this setting
    ///
    /// Booleans accept `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`.
    /// Enums accept an option index or an option label (case-insensitive).
    pub fn parse_value(&self, key: &str, input: &str) -> Result<SettingValue, ProbeError> {
        let text = input.trim();
        let invalid = || ProbeError::InvalidValue {
            setting: key.to_string(),
            value: input.to_string(),
        };

        let value = match &self.spec {
            SettingSpec::Boolean { .. } => match text.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => SettingValue::Boolean(true),
                "false" | "0" | "no" | "off" => SettingValue::Boolean(false),
                _ => return Err(invalid()),
            },
            SettingSpec::Number { .. } => {
                SettingValue::Number(text.parse::<f64>().map_err(|_| invalid())?)
            }
            SettingSpec::Enum { options, .. } => match text.parse::<usize>() {
                Ok(index) => SettingValue::Enum(index),
                Err(_) => options
                    .iter()
                    .position(|o| o.label.eq_ignore_ascii_case(text))
                    .map(SettingValue::Enum)
                    .ok_or_else(invalid)?,
            },
        };
        self.accept(key, value)
    }
}

/// Check whether a descriptor is a boolean setting
pub fn is_boolean_setting(descriptor: &SettingDescriptor) -> bool {
    matches!(descriptor.spec, SettingSpec::Boolean { .. })
}

/// Check whether a descriptor is a number setting
pub fn is_number_setting(descriptor: &SettingDescriptor) -> bool {
    matches!(descriptor.spec, SettingSpec::Number { .. })
}

/// Check whether a descriptor is an enum setting
pub fn is_enum_setting(descriptor: &SettingDescriptor) -> bool {
    matches!(descriptor.spec, SettingSpec::Enum { .. })
}
