//! Configuration
//!
//! Layered configuration: built-in defaults, then the global config file, then
//! a project file, then `CODESTUDIO__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::action::strict::StrictIngestor;
use crate::action::vocabulary::{TagVocabulary, VocabularyPreset};
use crate::action::ActionScanner;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::DEFAULT_ROOT_NAME;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl StudioConfig {
    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ApiError> {
        self.parser.vocabulary()?;
        if self.session.root_name.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "session.root_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Action markup configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Tag vocabulary preset: bolt, studio, custom
    #[serde(default)]
    pub vocabulary: VocabularyPreset,

    /// Wrapper element name when `vocabulary = "custom"`
    #[serde(default)]
    pub artifact_tag: Option<String>,

    /// Action element name when `vocabulary = "custom"`
    #[serde(default)]
    pub action_tag: Option<String>,
}

impl ParserConfig {
    pub fn vocabulary(&self) -> Result<TagVocabulary, ApiError> {
        TagVocabulary::from_preset(
            self.vocabulary,
            self.artifact_tag.as_deref(),
            self.action_tag.as_deref(),
        )
    }

    pub fn scanner(&self) -> Result<ActionScanner, ApiError> {
        Ok(ActionScanner::new(self.vocabulary()?))
    }

    pub fn ingestor(&self) -> Result<StrictIngestor, ApiError> {
        Ok(StrictIngestor::new(self.vocabulary()?))
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the tree's root folder
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Select the first created file when nothing is selected yet
    #[serde(default = "default_true")]
    pub select_first_file: bool,
}

fn default_root_name() -> String {
    DEFAULT_ROOT_NAME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            select_first_file: default_true(),
        }
    }
}
