//! Settings snapshots
//!
//! A snapshot holds the current value of every setting of one operation
//! instance, in emission order. It is assembled with a [`SnapshotBuilder`]
//! (catalog defaults first, then overrides) and lives for one compilation.
//!
//! Building resolves each setting's condition to the position of the
//! setting it depends on, so a dangling condition is reported before any
//! text is generated and never needs to be looked up again.

use crate::catalog::OperationType;
use crate::setting::{SettingDescriptor, SettingValue};
use indexmap::IndexMap;
use millprobe_core::ProbeError;
use std::sync::Arc;

/// A setting with its current value
#[derive(Debug, Clone)]
pub struct ResolvedSetting {
    key: String,
    descriptor: Arc<SettingDescriptor>,
    value: SettingValue,
    condition: Option<usize>,
}

impl ResolvedSetting {
    /// Setting key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Setting descriptor
    pub fn descriptor(&self) -> &SettingDescriptor {
        &self.descriptor
    }

    /// Current value
    pub fn value(&self) -> SettingValue {
        self.value
    }
}

/// Assembles a [`SettingsSnapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    operation: String,
    entries: IndexMap<String, (Arc<SettingDescriptor>, SettingValue)>,
}

impl SnapshotBuilder {
    /// Create an empty builder for the named operation
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            entries: IndexMap::new(),
        }
    }

    /// Create a builder holding the catalog defaults of `operation`
    pub fn from_operation(operation: &OperationType) -> Self {
        let mut builder = Self::new(operation.key.clone());
        for (key, descriptor) in &operation.settings {
            builder.add_setting(key, Arc::clone(descriptor));
        }
        builder
    }

    /// Operation this snapshot is for
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Add a setting holding its default value
    ///
    /// Re-adding an existing key replaces it in place, keeping its position.
    pub fn add_setting(&mut self, key: &str, descriptor: Arc<SettingDescriptor>) -> &mut Self {
        let value = descriptor.default_value();
        self.entries.insert(key.to_string(), (descriptor, value));
        self
    }

    /// Add a setting holding `value`
    pub fn add_setting_with_value(
        &mut self,
        key: &str,
        descriptor: Arc<SettingDescriptor>,
        value: SettingValue,
    ) -> Result<&mut Self, ProbeError> {
        let value = descriptor.accept(key, value)?;
        self.entries.insert(key.to_string(), (descriptor, value));
        Ok(self)
    }

    /// Override the value of a setting already in the builder
    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) -> Result<&mut Self, ProbeError> {
        let operation = &self.operation;
        let (descriptor, current) =
            self.entries
                .get_mut(key)
                .ok_or_else(|| ProbeError::UnknownSetting {
                    operation: operation.clone(),
                    setting: key.to_string(),
                })?;
        *current = descriptor.accept(key, value.into())?;
        Ok(self)
    }

    /// Override the value of a setting from text input
    pub fn set_text(&mut self, key: &str, input: &str) -> Result<&mut Self, ProbeError> {
        let descriptor = self
            .entries
            .get(key)
            .map(|(descriptor, _)| Arc::clone(descriptor))
            .ok_or_else(|| ProbeError::UnknownSetting {
                operation: self.operation.clone(),
                setting: key.to_string(),
            })?;
        let value = descriptor.parse_value(key, input)?;
        self.set(key, value)
    }

    /// Resolve conditions and produce the snapshot
    pub fn build(self) -> Result<SettingsSnapshot, ProbeError> {
        let mut settings = Vec::with_capacity(self.entries.len());
        for (key, (descriptor, value)) in &self.entries {
            let condition = match &descriptor.condition {
                Some(condition) => Some(self.entries.get_index_of(&condition.setting).ok_or_else(
                    || ProbeError::UnresolvedCondition {
                        setting: key.clone(),
                        condition: condition.setting.clone(),
                    },
                )?),
                None => None,
            };
            settings.push(ResolvedSetting {
                key: key.clone(),
                descriptor: Arc::clone(descriptor),
                value: *value,
                condition,
            });
        }
        Ok(SettingsSnapshot {
            operation: self.operation,
            settings,
        })
    }
}

/// Current values of every setting of one operation instance
#[derive(Debug, Clone)]
pub struct SettingsSnapshot {
    operation: String,
    settings: Vec<ResolvedSetting>,
}

impl SettingsSnapshot {
    /// Snapshot of the catalog defaults of `operation`
    pub fn defaults(operation: &OperationType) -> Result<Self, ProbeError> {
        SnapshotBuilder::from_operation(operation).build()
    }

    /// Operation this snapshot is for
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Settings in emission order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedSetting> {
        self.settings.iter()
    }

    /// Get a setting by key
    pub fn get(&self, key: &str) -> Option<&ResolvedSetting> {
        self.settings.iter().find(|s| s.key == key)
    }

    /// Get the current value of a setting
    pub fn value(&self, key: &str) -> Option<SettingValue> {
        self.get(key).map(ResolvedSetting::value)
    }

    /// Number of settings
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Check if the snapshot holds no settings
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Check whether a setting's condition currently holds
    ///
    /// Settings without a condition are always included.
    pub fn is_included(&self, setting: &ResolvedSetting) -> bool {
        match (setting.condition, &setting.descriptor.condition) {
            (Some(index), Some(condition)) => self.settings[index].value == condition.value,
            _ => true,
        }
    }

    /// Check the values of all included settings against their bounds
    ///
    /// Settings hidden by their condition are not checked since they never
    /// reach the generated command.
    pub fn check_bounds(&self) -> Result<(), ProbeError> {
        self.settings
            .iter()
            .filter(|s| self.is_included(s))
            .try_for_each(|s| s.descriptor.check_bounds(&s.key, &s.value))
    }
}
