//! MergeService: orchestrates sources, applies precedence, deserializes to StudioConfig.

use crate::config::sources::{environment, global_file, project_file};
use crate::config::StudioConfig;
use config::ConfigError;
use std::path::Path;

use super::builder_with_defaults;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config for a project directory and standard sources.
    /// Precedence: global file (lowest) -> project file -> environment (highest).
    pub fn load(project_dir: &Path) -> Result<StudioConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = project_file::add_to_builder(builder, project_dir)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<StudioConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = builder.add_source(config::File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
