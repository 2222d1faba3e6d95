use std::io::Read;

use bzip2::read::{BzDecoder, BzEncoder};
use bzip2::Compression;

use ndac_core::codec::{Codec, CodecId};
use ndac_core::error::CodecError;

/// bzip2 codec.
///
/// The quicker of the two heavy codecs on dense numeric data; the default
/// policy's dense branch runs it at level 9. The block format records its
/// own block size, so any level decompresses without knowing how it was
/// produced.
#[derive(Debug)]
pub struct Bzip2Codec {
    /// Compression level, 1 (fast) to 9 (smallest).
    pub level: u32,
}

impl Default for Bzip2Codec {
    fn default() -> Self {
        Self { level: 9 }
    }
}

impl Bzip2Codec {
    /// Out-of-range levels are clamped to 1–9.
    pub fn new(level: u32) -> Self {
        Self {
            level: level.clamp(1, 9),
        }
    }
}

impl Codec for Bzip2Codec {
    fn id(&self) -> CodecId {
        CodecId::Bzip2
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        BzEncoder::new(raw, Compression::new(self.level))
            .read_to_end(&mut out)
            .map_err(|e| CodecError::backend("bz2", e))?;
        Ok(out)
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        BzDecoder::new(compressed)
            .read_to_end(&mut out)
            .map_err(|e| CodecError::corrupt("bz2", e))?;
        Ok(out)
    }
}
