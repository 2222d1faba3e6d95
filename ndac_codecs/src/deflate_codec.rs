use std::io::Read;

use flate2::read::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;

use ndac_core::codec::{Codec, CodecId};
use ndac_core::error::CodecError;

/// Deflate codec in a zlib wrapper.
///
/// Lowest latency of the real codecs and the weakest ratio; the benchmark
/// matrix carries it as the cheap baseline the two heavy codecs are
/// measured against.
#[derive(Debug)]
pub struct DeflateCodec {
    /// Compression level, 0 (none) to 9 (smallest).
    pub level: u32,
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl DeflateCodec {
    /// Out-of-range levels are clamped to 0–9.
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }
}

impl Codec for DeflateCodec {
    fn id(&self) -> CodecId {
        CodecId::Deflate
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        ZlibEncoder::new(raw, Compression::new(self.level))
            .read_to_end(&mut out)
            .map_err(|e| CodecError::backend("deflate", e))?;
        Ok(out)
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        ZlibDecoder::new(compressed)
            .read_to_end(&mut out)
            .map_err(|e| CodecError::corrupt("deflate", e))?;
        Ok(out)
    }
}
