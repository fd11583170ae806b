//! Error types for CLI operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Input recording not found
    #[error("Recording not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// Configuration file not found
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Command-line override rejected
    #[error("Invalid value for --{flag}: {message}")]
    InvalidOverride { flag: &'static str, message: String },
}

impl CliError {
    pub fn input_not_found(path: &Path) -> Self {
        Self::InputNotFound {
            path: path.to_path_buf(),
        }
    }

    pub fn config_not_found(path: &Path) -> Self {
        Self::ConfigNotFound {
            path: path.to_path_buf(),
        }
    }

    pub fn invalid_override(flag: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOverride {
            flag,
            message: message.into(),
        }
    }
}
