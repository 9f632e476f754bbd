//! Global config file: `<platform config dir>/codestudio/config.toml`

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::PathBuf;

/// Location of the global config file, when the platform has a config dir.
pub fn path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "codestudio", "codestudio")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the global config file (optional) to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match path() {
        Some(path) => Ok(builder.add_source(File::from(path).required(false))),
        None => Ok(builder),
    }
}
