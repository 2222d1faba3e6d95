use std::io::Read;

use xz2::read::{XzDecoder, XzEncoder};

use ndac_core::codec::{Codec, CodecId};
use ndac_core::error::CodecError;

/// LZMA codec using the xz container.
///
/// Highest ratio in the registry, and on sparse data even the fastest preset
/// stays competitive; the default policy's sparse branch runs preset 1.
/// The xz framing embeds the filter chain and dictionary size, so the
/// decoder never needs the compress-time preset. A raw LZMA stream would
/// couple writer and reader through hard-coded filter constants.
#[derive(Debug)]
pub struct LzmaCodec {
    /// xz preset, 0 (fast) to 9 (smallest).
    pub preset: u32,
}

impl Default for LzmaCodec {
    fn default() -> Self {
        Self { preset: 6 }
    }
}

impl LzmaCodec {
    /// Out-of-range presets are clamped to 0–9.
    pub fn new(preset: u32) -> Self {
        Self {
            preset: preset.min(9),
        }
    }
}

impl Codec for LzmaCodec {
    fn id(&self) -> CodecId {
        CodecId::Lzma
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        XzEncoder::new(raw, self.preset)
            .read_to_end(&mut out)
            .map_err(|e| CodecError::backend("lzma", e))?;
        Ok(out)
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        XzDecoder::new(compressed)
            .read_to_end(&mut out)
            .map_err(|e| CodecError::corrupt("lzma", e))?;
        Ok(out)
    }
}
