//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::StudioConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a project directory from files and environment.
    pub fn load(project_dir: &Path) -> Result<StudioConfig, ApiError> {
        let config = MergeService::load(project_dir)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<StudioConfig, ApiError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> StudioConfig {
        StudioConfig::default()
    }
}
