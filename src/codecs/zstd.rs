use serde::{Deserialize, Serialize};

use crate::error::{SvbinError, SvbinResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZstdCodec {
    #[serde(default = "default_level")]
    pub level: i32,
}

fn default_level() -> i32 {
    3
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl ZstdCodec {
    /// Decode a complete zstd stream; frames without a content size are accepted.
    pub fn decode(&self, data: &[u8]) -> SvbinResult<Vec<u8>> {
        zstd::stream::decode_all(data)
            .map_err(|e| SvbinError::Codec(format!("zstd decompress failed: {e}")))
    }

    pub fn encode(&self, data: &[u8]) -> SvbinResult<Vec<u8>> {
        zstd::stream::encode_all(data, self.level)
            .map_err(|e| SvbinError::Codec(format!("zstd compress failed: {e}")))
    }
}
