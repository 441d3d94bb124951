use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

use crate::error::{SvbinError, SvbinResult};

/// Gzip wrapper, the usual choice for archived `.svbin.gz` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GzipCodec {
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    6
}

impl Default for GzipCodec {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl GzipCodec {
    pub fn decode(&self, data: &[u8]) -> SvbinResult<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 2);
        GzDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| SvbinError::Codec(format!("gzip decompress failed: {e}")))?;
        Ok(out)
    }

    pub fn encode(&self, data: &[u8]) -> SvbinResult<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(self.level.min(9)));
        encoder
            .write_all(data)
            .and_then(|_| encoder.finish())
            .map_err(|e| SvbinError::Codec(format!("gzip compress failed: {e}")))
    }
}
