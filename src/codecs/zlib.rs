use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde::{Deserialize, Serialize};

use crate::error::{SvbinError, SvbinResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZlibCodec {
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    1
}

impl Default for ZlibCodec {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl ZlibCodec {
    pub fn decode(&self, data: &[u8]) -> SvbinResult<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 2);
        ZlibDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| SvbinError::Codec(format!("zlib decompress failed: {e}")))?;
        Ok(out)
    }

    pub fn encode(&self, data: &[u8]) -> SvbinResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(self.level.min(9)));
        encoder
            .write_all(data)
            .and_then(|_| encoder.finish())
            .map_err(|e| SvbinError::Codec(format!("zlib compress failed: {e}")))
    }
}
