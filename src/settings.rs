//! Generation parameter defaults and caller overrides.
//!
//! Every prompt config carries default generation parameters; callers may
//! override any subset per render call. The merge is a pure shallow merge.
//! Provider and model names are not validated here; whether they are legal
//! is the completion client's concern.

use serde::{Deserialize, Serialize};

/// Temperature used when a prompt config does not set one.
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Final generation parameters returned alongside rendered text.
///
/// Also the shape of the `defaults` block of a prompt config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Completion provider identifier (e.g. "openai").
    pub provider: String,

    /// Model identifier passed to the provider.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            provider: String::new(),
            model: String::new(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationSettings {
    /// Merge caller overrides over these defaults.
    ///
    /// Each field is taken from the patch if present, else from `self`.
    pub fn merged(&self, patch: &SettingsPatch) -> GenerationSettings {
        GenerationSettings {
            provider: patch
                .provider
                .clone()
                .unwrap_or_else(|| self.provider.clone()),
            model: patch.model.clone().unwrap_or_else(|| self.model.clone()),
            temperature: patch.temperature.unwrap_or(self.temperature),
        }
    }
}

/// Caller-supplied overrides applied over a config's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    /// Override for the provider, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Override for the model, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Override for the temperature, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl SettingsPatch {
    /// True when no field is overridden.
    pub fn is_empty(&self) -> bool {
        self.provider.is_none() && self.model.is_none() && self.temperature.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> GenerationSettings {
        GenerationSettings {
            provider: "openai".to_string(),
            model: "m1".to_string(),
            temperature: 0.7,
        }
    }

    #[test]
    fn merge_takes_overridden_fields_from_patch() {
        let patch = SettingsPatch {
            temperature: Some(0.2),
            ..Default::default()
        };
        let merged = defaults().merged(&patch);
        assert_eq!(
            merged,
            GenerationSettings {
                provider: "openai".to_string(),
                model: "m1".to_string(),
                temperature: 0.2,
            }
        );
    }

    #[test]
    fn merge_with_empty_patch_returns_defaults() {
        let merged = defaults().merged(&SettingsPatch::default());
        assert_eq!(merged, defaults());
    }

    #[test]
    fn merge_overrides_every_field() {
        let patch = SettingsPatch {
            provider: Some("anthropic".to_string()),
            model: Some("m2".to_string()),
            temperature: Some(1.0),
        };
        let merged = defaults().merged(&patch);
        assert_eq!(merged.provider, "anthropic");
        assert_eq!(merged.model, "m2");
        assert_eq!(merged.temperature, 1.0);
    }

    #[test]
    fn patch_is_empty() {
        assert!(SettingsPatch::default().is_empty());
        assert!(
            !SettingsPatch {
                model: Some("m2".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn settings_default_temperature() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.temperature, DEFAULT_TEMPERATURE);
        assert!(settings.provider.is_empty());
    }
}
