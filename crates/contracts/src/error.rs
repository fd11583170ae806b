//! Layered error definitions
//!
//! Categorized by source: format / contract / interpolation / archive / config

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Format Errors =====
    /// Recording file extension not recognized, or no reader registered for it
    #[error("unsupported recording format '{}': {message}", path.display())]
    UnsupportedFormat { path: PathBuf, message: String },

    // ===== Contract Errors =====
    /// Invalid argument or configuration passed to an operation
    #[error("contract violation at '{field}': {message}")]
    ContractViolation { field: String, message: String },

    /// Not enough valid anchor samples to interpolate around a blink
    #[error("insufficient data to correct blink [{onset}, {offset}]: {source}")]
    InsufficientData {
        onset: usize,
        offset: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ===== Persistence Errors =====
    /// Save target already exists and overwrite was not requested
    #[error("file '{}' already exists", path.display())]
    DestinationExists { path: PathBuf },

    /// Archive encode/decode failure
    #[error("archive codec error: {message}")]
    ArchiveCodec { message: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create unsupported format error
    pub fn unsupported_format(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create contract violation error
    pub fn contract_violation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ContractViolation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create insufficient data error for the blink `[onset, offset]`
    pub fn insufficient_data(
        onset: usize,
        offset: usize,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InsufficientData {
            onset,
            offset,
            source: Box::new(source),
        }
    }

    /// Create destination exists error
    pub fn destination_exists(path: impl AsRef<Path>) -> Self {
        Self::DestinationExists {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create archive codec error
    pub fn archive_codec(message: impl Into<String>) -> Self {
        Self::ArchiveCodec {
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised before any state was touched
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }
}
