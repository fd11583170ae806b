//! # Ingestion
//!
//! Recording input and output.
//!
//! Responsibilities:
//! - Dispatch recording files to a reader by extension
//! - Read and write the compressed `.pca` archive
//! - Host pluggable readers for tracker-native formats (`.edf`)
//! - Generate synthetic recordings for tests and demos
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{save_archive, RecordingLoader};
//!
//! let loader = RecordingLoader::new();
//! let mut recording = loader.load("session_01.pca")?;
//! // ... detect / correct ...
//! save_archive(&recording, "session_01_clean.pca", false)?;
//! ```
//!
//! ## Synthetic Data
//!
//! ```ignore
//! use ingestion::SyntheticRecording;
//!
//! let recording = SyntheticRecording::new(500.0, 10.0)
//!     .blink(2.0, 0.12, 0.03)
//!     .message(1.0, "TRIALID 1")
//!     .build()?;
//! ```

mod archive;
mod loader;
mod reader;
mod synthetic;

// Re-exports
pub use archive::{
    decode_archive, encode_archive, load_archive, save_archive, ArchiveReader, ARCHIVE_MAGIC,
    ARCHIVE_VERSION,
};
pub use loader::RecordingLoader;
pub use reader::{RecordingFormat, RecordingReader};
pub use synthetic::{SyntheticBlink, SyntheticRecording};
