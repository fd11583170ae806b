//! # Config Loader
//!
//! Reads a `PipelineConfig` from TOML or JSON and checks its ranges.
//! Missing sections and fields take the pipeline defaults, so an empty file
//! is a valid configuration.
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_or_default(Some(Path::new("pipeline.toml")))?;
//! println!("interp: {}", config.correct.interp);
//! # Ok::<(), contracts::ContractError>(())
//! ```

mod parser;
mod validator;

pub use contracts::PipelineConfig;
pub use parser::ConfigFormat;

use std::path::Path;

use contracts::ContractError;
use tracing::debug;

/// Pipeline configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate the file at `path`, format chosen by extension
    pub fn load_from_path(path: &Path) -> Result<PipelineConfig, ContractError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let config = Self::load_from_str(&content, format)?;
        debug!(path = %path.display(), ?format, "pipeline config loaded");
        Ok(config)
    }

    /// Parse `content` and validate the result
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<PipelineConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Load `path` when given, otherwise return the default pipeline
    pub fn load_or_default(path: Option<&Path>) -> Result<PipelineConfig, ContractError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                debug!("no pipeline config given, using defaults");
                Ok(PipelineConfig::default())
            }
        }
    }

    /// Re-check a configuration after it was changed in code (CLI overrides)
    pub fn validate(config: &PipelineConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Render `config` in `format`
    pub fn render(config: &PipelineConfig, format: ConfigFormat) -> Result<String, ContractError> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(config)
                .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}"))),
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}"))),
        }
    }

    pub fn to_toml(config: &PipelineConfig) -> Result<String, ContractError> {
        Self::render(config, ConfigFormat::Toml)
    }

    pub fn to_json(config: &PipelineConfig) -> Result<String, ContractError> {
        Self::render(config, ConfigFormat::Json)
    }
}
