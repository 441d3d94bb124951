//! Whole-file compression layers wrapped around an encoded record.

pub mod gzip;
pub mod lz4;
pub mod zlib;
pub mod zstd;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SvbinError, SvbinResult};

// ---------------------------------------------------------------------------
// CodecId
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecId {
    Gzip,
    Zlib,
    Zstd,
    Lz4,
}

impl CodecId {
    /// File extension that selects this codec, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            CodecId::Gzip => "gz",
            CodecId::Zlib => "zz",
            CodecId::Zstd => "zst",
            CodecId::Lz4 => "lz4",
        }
    }
}

impl std::fmt::Display for CodecId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecId::Gzip => write!(f, "gzip"),
            CodecId::Zlib => write!(f, "zlib"),
            CodecId::Zstd => write!(f, "zstd"),
            CodecId::Lz4 => write!(f, "lz4"),
        }
    }
}

// ---------------------------------------------------------------------------
// AnyCodec  (enum dispatch, no Box<dyn>)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyCodec {
    Gzip(gzip::GzipCodec),
    Zlib(zlib::ZlibCodec),
    Zstd(zstd::ZstdCodec),
    Lz4(lz4::Lz4Codec),
}

impl AnyCodec {
    /// Codec with default settings for `id`.
    pub fn with_defaults(id: CodecId) -> Self {
        match id {
            CodecId::Gzip => AnyCodec::Gzip(Default::default()),
            CodecId::Zlib => AnyCodec::Zlib(Default::default()),
            CodecId::Zstd => AnyCodec::Zstd(Default::default()),
            CodecId::Lz4 => AnyCodec::Lz4(Default::default()),
        }
    }

    pub fn codec_id(&self) -> CodecId {
        match self {
            AnyCodec::Gzip(_) => CodecId::Gzip,
            AnyCodec::Zlib(_) => CodecId::Zlib,
            AnyCodec::Zstd(_) => CodecId::Zstd,
            AnyCodec::Lz4(_) => CodecId::Lz4,
        }
    }

    pub fn decode(&self, data: &[u8]) -> SvbinResult<Vec<u8>> {
        match self {
            AnyCodec::Gzip(c) => c.decode(data),
            AnyCodec::Zlib(c) => c.decode(data),
            AnyCodec::Zstd(c) => c.decode(data),
            AnyCodec::Lz4(c) => c.decode(data),
        }
    }

    pub fn encode(&self, data: &[u8]) -> SvbinResult<Vec<u8>> {
        match self {
            AnyCodec::Gzip(c) => c.encode(data),
            AnyCodec::Zlib(c) => c.encode(data),
            AnyCodec::Zstd(c) => c.encode(data),
            AnyCodec::Lz4(c) => c.encode(data),
        }
    }
}

/// Pick a codec from the last extension of `path`; `None` means uncompressed.
pub fn codec_for_path(path: impl AsRef<Path>) -> Option<AnyCodec> {
    let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
    let id = match ext.as_str() {
        "gz" | "gzip" => CodecId::Gzip,
        "zz" | "zlib" => CodecId::Zlib,
        "zst" | "zstd" => CodecId::Zstd,
        "lz4" => CodecId::Lz4,
        _ => return None,
    };
    Some(AnyCodec::with_defaults(id))
}

// ---------------------------------------------------------------------------
// JSON codec parsing
// ---------------------------------------------------------------------------

/// `{ "name": ..., "configuration": ... }` envelope used in option files.
#[derive(Debug, Deserialize, Serialize)]
struct CodecEnvelope {
    name: String,
    #[serde(default)]
    configuration: Option<serde_json::Value>,
}

/// Map a codec name string to its [`CodecId`].
pub fn lookup_codec_id(name: &str) -> Option<CodecId> {
    match name.to_lowercase().as_str() {
        "gzip" | "gz" => Some(CodecId::Gzip),
        "zlib" => Some(CodecId::Zlib),
        "zstd" => Some(CodecId::Zstd),
        "lz4" => Some(CodecId::Lz4),
        _ => None,
    }
}

/// Parse a single codec from its JSON envelope.
pub fn parse_codec(value: &serde_json::Value) -> SvbinResult<AnyCodec> {
    let env: CodecEnvelope = serde_json::from_value(value.clone())
        .map_err(|e| SvbinError::Codec(format!("Invalid codec envelope: {e}")))?;
    let config = env
        .configuration
        .unwrap_or(serde_json::Value::Object(Default::default()));
    let id = lookup_codec_id(&env.name)
        .ok_or_else(|| SvbinError::Codec(format!("Unknown codec: {}", env.name)))?;

    let bad = |e: serde_json::Error| SvbinError::Codec(format!("Invalid {id} configuration: {e}"));
    Ok(match id {
        CodecId::Gzip => AnyCodec::Gzip(serde_json::from_value(config).map_err(bad)?),
        CodecId::Zlib => AnyCodec::Zlib(serde_json::from_value(config).map_err(bad)?),
        CodecId::Zstd => AnyCodec::Zstd(serde_json::from_value(config).map_err(bad)?),
        CodecId::Lz4 => AnyCodec::Lz4(serde_json::from_value(config).map_err(bad)?),
    })
}

/// Inverse of [`parse_codec`].
pub fn codec_to_json(codec: &AnyCodec) -> serde_json::Value {
    let configuration = match codec {
        AnyCodec::Gzip(c) => serde_json::to_value(c),
        AnyCodec::Zlib(c) => serde_json::to_value(c),
        AnyCodec::Zstd(c) => serde_json::to_value(c),
        AnyCodec::Lz4(c) => serde_json::to_value(c),
    }
    .unwrap_or(serde_json::Value::Null);
    serde_json::json!({
        "name": codec.codec_id().to_string(),
        "configuration": configuration,
    })
}
