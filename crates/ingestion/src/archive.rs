//! Compressed recording archive (`.pca`)
//!
//! Layout:
//!
//! ```text
//! +--------+---------+----------------------------------------------+
//! | magic  | version | LZ4 block (u32 LE uncompressed size prefix)  |
//! | 4 B    | u16 LE  | bincode(ArchiveRecord)                       |
//! +--------+---------+----------------------------------------------+
//! ```
//!
//! The record holds the sections `info, times, data, blinks, saccades,
//! messages`. Floats are stored as raw bits, so NaN samples survive a round
//! trip unchanged.

use std::fs;
use std::path::Path;

use contracts::{
    ContractError, MessageEvent, Recording, RecordingInfo, Sample, SampleInterval, SignalStore,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::reader::{RecordingFormat, RecordingReader};

/// File tag at offset 0
pub const ARCHIVE_MAGIC: [u8; 4] = *b"PCAR";

/// Current layout version
pub const ARCHIVE_VERSION: u16 = 1;

const HEADER_LEN: usize = ARCHIVE_MAGIC.len() + 2;

#[derive(Serialize, Deserialize)]
struct ArchiveRecord {
    info: RecordingInfo,
    times: Vec<f64>,
    data: Vec<Sample>,
    blinks: Vec<SampleInterval>,
    saccades: Vec<SampleInterval>,
    messages: Vec<MessageEvent>,
}

/// Serialize a recording into archive bytes
pub fn encode_archive(recording: &Recording) -> Result<Vec<u8>, ContractError> {
    let record = ArchiveRecord {
        info: recording.signal.info().clone(),
        times: recording.signal.times().to_vec(),
        data: recording.signal.channels().to_vec(),
        blinks: recording.blinks.clone(),
        saccades: recording.saccades.clone(),
        messages: recording.messages.clone(),
    };

    let payload = bincode::serialize(&record)
        .map_err(|e| ContractError::archive_codec(format!("encode failed: {e}")))?;
    let compressed = lz4_flex::compress_prepend_size(&payload);

    let mut bytes = Vec::with_capacity(HEADER_LEN + compressed.len());
    bytes.extend_from_slice(&ARCHIVE_MAGIC);
    bytes.extend_from_slice(&ARCHIVE_VERSION.to_le_bytes());
    bytes.extend_from_slice(&compressed);
    Ok(bytes)
}

/// Parse archive bytes into a validated recording
pub fn decode_archive(bytes: &[u8]) -> Result<Recording, ContractError> {
    if bytes.len() < HEADER_LEN || bytes[..ARCHIVE_MAGIC.len()] != ARCHIVE_MAGIC {
        return Err(ContractError::archive_codec("not a recording archive (bad magic)"));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != ARCHIVE_VERSION {
        return Err(ContractError::archive_codec(format!(
            "unsupported archive version {version}, expected {ARCHIVE_VERSION}"
        )));
    }

    let payload = lz4_flex::decompress_size_prepended(&bytes[HEADER_LEN..])
        .map_err(|e| ContractError::archive_codec(format!("decompress failed: {e}")))?;
    let record: ArchiveRecord = bincode::deserialize(&payload)
        .map_err(|e| ContractError::archive_codec(format!("decode failed: {e}")))?;

    let signal = SignalStore::new(record.info, record.times, record.data)?;
    let recording = Recording {
        signal,
        blinks: record.blinks,
        saccades: record.saccades,
        messages: record.messages,
    };
    recording.validate()?;
    Ok(recording)
}

/// Write `recording` to `path`
///
/// Returns the number of bytes written.
///
/// # Errors
/// Destination exists when `path` is present and `overwrite` is false.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save_archive(
    recording: &Recording,
    path: impl AsRef<Path>,
    overwrite: bool,
) -> Result<usize, ContractError> {
    let path = path.as_ref();
    if path.exists() && !overwrite {
        return Err(ContractError::destination_exists(path));
    }

    let bytes = encode_archive(recording)?;
    if let Err(e) = fs::write(path, &bytes) {
        observability::record_recording_saved(0, false);
        return Err(e.into());
    }

    info!(
        samples = recording.signal.len(),
        blinks = recording.blinks.len(),
        bytes = bytes.len(),
        "archive saved"
    );
    observability::record_recording_saved(bytes.len(), true);
    Ok(bytes.len())
}

/// Read an archive from `path`
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_archive(path: impl AsRef<Path>) -> Result<Recording, ContractError> {
    let bytes = fs::read(path.as_ref())?;
    let recording = decode_archive(&bytes)?;
    debug!(
        samples = recording.signal.len(),
        compressed_bytes = bytes.len(),
        "archive loaded"
    );
    Ok(recording)
}

/// Built-in reader for `.pca` archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveReader;

impl RecordingReader for ArchiveReader {
    fn format(&self) -> RecordingFormat {
        RecordingFormat::Archive
    }

    fn read(&self, path: &Path) -> Result<Recording, ContractError> {
        load_archive(path)
    }
}
