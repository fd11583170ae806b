//! Recording reader trait and file format detection

use std::path::Path;

use contracts::{ContractError, Recording};

/// Recording file formats known to the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordingFormat {
    /// Compressed multi-array archive (`.pca`), read and written natively
    Archive,
    /// Tracker-native EDF (`.edf`), needs an external reader
    Edf,
}

impl RecordingFormat {
    /// Detect the format from the file extension (case-insensitive)
    ///
    /// # Errors
    /// Unsupported format when the extension is missing or unknown.
    pub fn from_path(path: &Path) -> Result<Self, ContractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pca") => Ok(Self::Archive),
            Some("edf") => Ok(Self::Edf),
            Some(other) => Err(ContractError::unsupported_format(
                path,
                format!("extension '.{other}' is not supported, expected .pca or .edf"),
            )),
            None => Err(ContractError::unsupported_format(
                path,
                "missing file extension, expected .pca or .edf",
            )),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Archive => "pca",
            Self::Edf => "edf",
        }
    }
}

impl std::fmt::Display for RecordingFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Reader for one recording format
///
/// Implement this to plug a tracker-native parser into
/// [`RecordingLoader`](crate::RecordingLoader).
pub trait RecordingReader: Send + Sync {
    /// Format handled by this reader
    fn format(&self) -> RecordingFormat;

    /// Read a complete recording from `path`
    fn read(&self, path: &Path) -> Result<Recording, ContractError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            RecordingFormat::from_path(Path::new("a/b/run1.pca")).unwrap(),
            RecordingFormat::Archive
        );
        assert_eq!(
            RecordingFormat::from_path(Path::new("RUN1.EDF")).unwrap(),
            RecordingFormat::Edf
        );
    }

    #[test]
    fn test_unknown_extension_rejected() {
        for path in ["run1.csv", "run1"] {
            let err = RecordingFormat::from_path(Path::new(path)).unwrap_err();
            assert!(matches!(err, ContractError::UnsupportedFormat { .. }), "{path}");
        }
    }
}
