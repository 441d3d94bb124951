//! Codec and file options, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::codecs::{AnyCodec, codec_to_json, parse_codec};
use crate::error::{SvbinError, SvbinResult};
use crate::types::{Endian, MAX_RANK};

fn default_max_rank() -> usize {
    MAX_RANK
}

// ---------------------------------------------------------------------------
// CodecOptions
// ---------------------------------------------------------------------------

/// Settings shared by [`ArchiveReader`](crate::ArchiveReader) and
/// [`ArchiveWriter`](crate::ArchiveWriter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecOptions {
    #[serde(default)]
    pub endian: Endian,
    #[serde(default = "default_max_rank")]
    max_rank: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            endian: Endian::default(),
            max_rank: MAX_RANK,
        }
    }
}

impl CodecOptions {
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Lower the rank bound. Values outside `1..=MAX_RANK` are clamped.
    pub fn with_max_rank(mut self, max_rank: usize) -> Self {
        self.max_rank = max_rank.clamp(1, MAX_RANK);
        self
    }

    /// Effective rank bound, never above [`MAX_RANK`].
    pub fn max_rank(&self) -> usize {
        self.max_rank.clamp(1, MAX_RANK)
    }

    /// The rank bound may be lowered, never raised past what the engine archives.
    pub fn validate(&self) -> SvbinResult<()> {
        if self.max_rank == 0 || self.max_rank > MAX_RANK {
            return Err(SvbinError::Config(format!(
                "max_rank must be in 1..={MAX_RANK}, got {}",
                self.max_rank
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileOptions
// ---------------------------------------------------------------------------

/// Options for loading and saving record files.
///
/// With `compression` unset the codec is chosen from the file extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileOptions {
    pub codec: CodecOptions,
    pub compression: Option<AnyCodec>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawFileOptions {
    #[serde(flatten)]
    codec: CodecOptions,
    #[serde(default)]
    compression: Option<serde_json::Value>,
}

impl FileOptions {
    /// Parse options such as
    /// `{"endian": "little", "max_rank": 4, "compression": {"name": "zstd"}}`.
    pub fn from_json(text: &str) -> SvbinResult<Self> {
        let raw: RawFileOptions = serde_json::from_str(text)?;
        raw.codec.validate()?;
        let compression = raw.compression.as_ref().map(parse_codec).transpose()?;
        Ok(Self {
            codec: raw.codec,
            compression,
        })
    }

    pub fn to_json(&self) -> SvbinResult<String> {
        let raw = RawFileOptions {
            codec: self.codec,
            compression: self.compression.as_ref().map(codec_to_json),
        };
        Ok(serde_json::to_string_pretty(&raw)?)
    }
}
