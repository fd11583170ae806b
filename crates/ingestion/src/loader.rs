//! Extension-dispatching recording loader

use std::collections::HashMap;
use std::path::Path;

use contracts::{ContractError, Recording};
use tracing::{info, instrument};

use crate::archive::ArchiveReader;
use crate::reader::{RecordingFormat, RecordingReader};

/// Recording loader
///
/// Picks a reader by file extension. The archive reader is always
/// registered; tracker-native formats need a reader supplied through
/// [`register`](Self::register).
pub struct RecordingLoader {
    readers: HashMap<RecordingFormat, Box<dyn RecordingReader>>,
}

impl RecordingLoader {
    pub fn new() -> Self {
        let mut loader = Self {
            readers: HashMap::new(),
        };
        loader.register(Box::new(ArchiveReader));
        loader
    }

    /// Register a reader, replacing any reader for the same format
    pub fn register(&mut self, reader: Box<dyn RecordingReader>) -> &mut Self {
        self.readers.insert(reader.format(), reader);
        self
    }

    /// Whether a reader is registered for `format`
    pub fn supports(&self, format: RecordingFormat) -> bool {
        self.readers.contains_key(&format)
    }

    /// Load and validate a recording
    ///
    /// # Errors
    /// - unsupported format (unknown extension, or no reader registered)
    /// - reader failure (I/O, decoding)
    /// - events referencing samples outside the signal
    #[instrument(name = "recording_load", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Recording, ContractError> {
        let path = path.as_ref();
        let format = RecordingFormat::from_path(path)?;
        let reader = self.readers.get(&format).ok_or_else(|| {
            ContractError::unsupported_format(
                path,
                format!("no reader registered for .{format} recordings"),
            )
        })?;

        let recording = reader.read(path)?;
        recording.validate()?;

        info!(
            format = %format,
            samples = recording.signal.len(),
            sampling_rate = recording.signal.sampling_rate(),
            blinks = recording.blinks.len(),
            messages = recording.messages.len(),
            "recording loaded"
        );
        observability::record_recording_loaded(format.extension(), recording.signal.len());
        Ok(recording)
    }
}

impl Default for RecordingLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordingLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formats: Vec<_> = self.readers.keys().map(|f| f.extension()).collect();
        formats.sort_unstable();
        f.debug_struct("RecordingLoader")
            .field("formats", &formats)
            .finish()
    }
}
