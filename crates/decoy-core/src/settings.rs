// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Engine configuration.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};

/// Policy for calls no contract matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FakeMode {
    /// Unmatched calls fail (mock).
    #[default]
    Strict,
    /// Unmatched calls return the declared return type's default (stub).
    Lenient,
}

/// Settings applied to every fake a factory creates.
///
/// ```
/// use decoy_core::{FakeMode, FakeSettings};
///
/// let settings = FakeSettings::from_json(br#"{ "mode": "lenient" }"#).unwrap();
/// assert_eq!(settings.mode, FakeMode::Lenient);
/// assert!(!settings.verify_on_drop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FakeSettings {
    /// Initial unmatched-call policy.
    pub mode: FakeMode,
    /// Log every dispatched call at `debug` instead of `trace`.
    pub trace_calls: bool,
    /// Run `verify_all` when a fake is dropped, panicking on violations.
    pub verify_on_drop: bool,
}

impl FakeSettings {
    /// Strict settings.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient settings.
    pub fn lenient() -> Self {
        Self {
            mode: FakeMode::Lenient,
            ..Self::default()
        }
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// [`SettingsError::Parse`] on malformed JSON or unknown fields.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SettingsError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    /// [`SettingsError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_strict() {
        assert_eq!(FakeSettings::from_json(b"{}").unwrap(), FakeSettings::strict());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = FakeSettings::from_json(br#"{ "moed": "lenient" }"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid fake settings"));
    }

    #[test]
    fn json_round_trips() {
        let settings = FakeSettings {
            mode: FakeMode::Lenient,
            trace_calls: true,
            verify_on_drop: true,
        };
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"lenient\""));
        assert_eq!(FakeSettings::from_json(json.as_bytes()).unwrap(), settings);
    }
}
