use ndac_core::codec::{Codec, CodecId};
use ndac_core::error::CodecError;

/// No-op codec: stores the payload verbatim.
///
/// Useful for verifying the container round-trip independently of any real
/// codec, and as the identity baseline when comparing the others.
#[derive(Debug)]
pub struct StoreCodec;

impl Codec for StoreCodec {
    fn id(&self) -> CodecId {
        CodecId::Store
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(raw.to_vec())
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(compressed.to_vec())
    }
}
