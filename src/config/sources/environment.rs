//! Environment variable source: CODESTUDIO prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `CODESTUDIO__PARSER__VOCABULARY=studio` sets `parser.vocabulary`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("CODESTUDIO")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
