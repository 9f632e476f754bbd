//! Tag vocabulary for action markup.
//!
//! Prompt templates decide which element names the model emits, so the names
//! are configuration rather than constants.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Named vocabulary presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyPreset {
    /// `<boltArtifact>` / `<boltAction>`
    #[default]
    Bolt,
    /// `<studioArtifact>` / `<studioAction>`
    Studio,
    /// Names taken from `artifact_tag` / `action_tag`
    Custom,
}

/// Element names for the artifact wrapper and its actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVocabulary {
    artifact_tag: String,
    action_tag: String,
}

impl TagVocabulary {
    pub fn bolt() -> Self {
        Self {
            artifact_tag: "boltArtifact".to_string(),
            action_tag: "boltAction".to_string(),
        }
    }

    pub fn studio() -> Self {
        Self {
            artifact_tag: "studioArtifact".to_string(),
            action_tag: "studioAction".to_string(),
        }
    }

    /// Build a vocabulary from explicit element names.
    pub fn custom(artifact_tag: &str, action_tag: &str) -> Result<Self, ApiError> {
        validate_tag(artifact_tag)?;
        validate_tag(action_tag)?;
        if artifact_tag == action_tag {
            return Err(ApiError::ConfigError(format!(
                "Artifact and action tags must differ (both '{}')",
                action_tag
            )));
        }
        Ok(Self {
            artifact_tag: artifact_tag.to_string(),
            action_tag: action_tag.to_string(),
        })
    }

    pub fn from_preset(
        preset: VocabularyPreset,
        artifact_tag: Option<&str>,
        action_tag: Option<&str>,
    ) -> Result<Self, ApiError> {
        match preset {
            VocabularyPreset::Bolt => Ok(Self::bolt()),
            VocabularyPreset::Studio => Ok(Self::studio()),
            VocabularyPreset::Custom => {
                let artifact = artifact_tag.ok_or_else(|| {
                    ApiError::ConfigError("Custom vocabulary requires artifact_tag".to_string())
                })?;
                let action = action_tag.ok_or_else(|| {
                    ApiError::ConfigError("Custom vocabulary requires action_tag".to_string())
                })?;
                Self::custom(artifact, action)
            }
        }
    }

    pub fn artifact_tag(&self) -> &str {
        &self.artifact_tag
    }

    pub fn action_tag(&self) -> &str {
        &self.action_tag
    }
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self::bolt()
    }
}

fn validate_tag(tag: &str) -> Result<(), ApiError> {
    if tag.trim().is_empty() {
        return Err(ApiError::ConfigError("Tag name cannot be empty".to_string()));
    }
    let valid = tag
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'));
    if !valid {
        return Err(ApiError::ConfigError(format!(
            "Invalid tag name '{}' (allowed: ASCII letters, digits, '_', '-', ':')",
            tag
        )));
    }
    Ok(())
}
