use serde::{Deserialize, Serialize};

use crate::error::{SvbinError, SvbinResult};

const SIZE_PREFIX_BYTES: usize = 4;

/// Best-case LZ4 block expansion is a little under 255:1.
const MAX_EXPANSION: usize = 255;

/// LZ4 block with a 4-byte little-endian uncompressed-size prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lz4Codec {}

impl Lz4Codec {
    pub fn decode(&self, data: &[u8]) -> SvbinResult<Vec<u8>> {
        let (prefix, payload) = data
            .split_first_chunk::<SIZE_PREFIX_BYTES>()
            .ok_or_else(|| SvbinError::Codec("lz4 block is missing its size prefix".into()))?;
        let expected = u32::from_le_bytes(*prefix) as usize;
        let ceiling = payload.len().saturating_mul(MAX_EXPANSION).saturating_add(16);
        if expected > ceiling {
            return Err(SvbinError::Codec(format!(
                "lz4 block declares {expected} bytes from a {}-byte payload",
                payload.len()
            )));
        }

        let out = lz4_flex::block::decompress(payload, expected)
            .map_err(|e| SvbinError::Codec(format!("lz4 decompress failed: {e}")))?;
        if out.len() != expected {
            return Err(SvbinError::Codec(format!(
                "lz4 block declared {expected} bytes, produced {}",
                out.len()
            )));
        }
        Ok(out)
    }

    pub fn encode(&self, data: &[u8]) -> SvbinResult<Vec<u8>> {
        let size = u32::try_from(data.len()).map_err(|_| {
            SvbinError::Codec(format!("lz4 block too large: {} bytes", data.len()))
        })?;
        let compressed = lz4_flex::block::compress(data);
        let mut out = Vec::with_capacity(SIZE_PREFIX_BYTES + compressed.len());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&compressed);
        Ok(out)
    }
}
