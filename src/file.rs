//! Loading and saving `.svbin` record files.
//!
//! A file holds exactly one record, optionally wrapped in a compression
//! codec. Unless [`FileOptions::compression`] says otherwise the codec is
//! picked from the file extension, so `psi.svbin.gz` is gunzipped before
//! decoding and `psi.svbin` is read as-is.

use std::path::Path;

use bytes::Bytes;
use log::debug;
use num_complex::Complex;

use crate::codecs::{AnyCodec, codec_for_path};
use crate::error::{SvbinError, SvbinResult};
use crate::options::FileOptions;
use crate::reader::ArchiveReader;
use crate::store::StorageBackend;
use crate::types::ArchiveRecord;
use crate::writer::ArchiveWriter;

fn compression_for(path: &str, options: &FileOptions) -> Option<AnyCodec> {
    options.compression.or_else(|| codec_for_path(path))
}

fn unpack(data: &[u8], path: &str, options: &FileOptions) -> SvbinResult<ArchiveRecord> {
    let reader = ArchiveReader::new(options.codec);
    match compression_for(path, options) {
        Some(codec) => {
            debug!("decompressing {path} with {}", codec.codec_id());
            reader.decode(&codec.decode(data)?)
        }
        None => reader.decode(data),
    }
}

fn pack(
    path: &str,
    shape: &[usize],
    elements: &[Complex<f64>],
    time: f64,
    options: &FileOptions,
) -> SvbinResult<Vec<u8>> {
    let raw = ArchiveWriter::new(options.codec).encode(shape, elements, time)?;
    match compression_for(path, options) {
        Some(codec) => {
            debug!("compressing {path} with {}", codec.codec_id());
            codec.encode(&raw)
        }
        None => Ok(raw),
    }
}

// ---------------------------------------------------------------------------
// Blocking filesystem access
// ---------------------------------------------------------------------------

/// Read a record file from disk.
pub fn read_record(path: impl AsRef<Path>, options: &FileOptions) -> SvbinResult<ArchiveRecord> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    unpack(&data, &path.to_string_lossy(), options)
}

/// Write `elements` as a record file, truncating any existing file.
pub fn write_record(
    path: impl AsRef<Path>,
    shape: &[usize],
    elements: &[Complex<f64>],
    time: f64,
    options: &FileOptions,
) -> SvbinResult<()> {
    let path = path.as_ref();
    let data = pack(&path.to_string_lossy(), shape, elements, time, options)?;
    std::fs::write(path, data)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Storage backends
// ---------------------------------------------------------------------------

/// Fetch and decode a record stored under `path`.
pub async fn load_record(
    backend: &dyn StorageBackend,
    path: &str,
    options: &FileOptions,
) -> SvbinResult<ArchiveRecord> {
    let data = backend
        .get(path)
        .await?
        .ok_or_else(|| SvbinError::NotFound(path.to_string()))?;
    unpack(&data, path, options)
}

/// Encode a record and store it under `path`.
pub async fn save_record(
    backend: &dyn StorageBackend,
    path: &str,
    shape: &[usize],
    elements: &[Complex<f64>],
    time: f64,
    options: &FileOptions,
) -> SvbinResult<()> {
    let data = pack(path, shape, elements, time, options)?;
    backend.put(path, Bytes::from(data)).await
}
