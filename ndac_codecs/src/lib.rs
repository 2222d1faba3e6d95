//! The codec registry and the registry-bound pipeline entry points.

mod bzip2_codec;
mod deflate_codec;
mod lzma_codec;
mod store;

pub use bzip2_codec::Bzip2Codec;
pub use deflate_codec::DeflateCodec;
pub use lzma_codec::LzmaCodec;
pub use store::StoreCodec;

use ndac_core::codec::{Codec, CodecChoice, CodecId};
use ndac_core::error::{CodecError, Error};
use ndac_core::policy::SelectionPolicy;
use ndac_core::{format, npy, pipeline, NdArray};

/// Resolve a codec from its on-wire id, at that codec's default level.
///
/// Called when opening an existing container; the level only ever affects
/// compression, so the default instance decompresses anything the codec
/// family ever produced.
pub fn codec_by_id(id: u8) -> Result<Box<dyn Codec>, CodecError> {
    match CodecId::try_from(id)? {
        CodecId::Store => Ok(Box::new(StoreCodec)),
        CodecId::Bzip2 => Ok(Box::new(Bzip2Codec::default())),
        CodecId::Lzma => Ok(Box::new(LzmaCodec::default())),
        CodecId::Deflate => Ok(Box::new(DeflateCodec::default())),
    }
}

/// Build the codec for a selected (id, level) pair.
pub fn codec_for(choice: CodecChoice) -> Box<dyn Codec> {
    match choice.codec {
        CodecId::Store => Box::new(StoreCodec),
        CodecId::Bzip2 => Box::new(Bzip2Codec::new(choice.level)),
        CodecId::Lzma => Box::new(LzmaCodec::new(choice.level)),
        CodecId::Deflate => Box::new(DeflateCodec::new(choice.level)),
    }
}

// ── pipeline entry points ──────────────────────────────────────────────────

/// Compress path: sniff the input into an array, let the policy pick a
/// codec, compress, frame.
pub fn compress(input: &[u8], policy: &SelectionPolicy) -> Result<Vec<u8>, Error> {
    let array = npy::decode_any(input)?;
    let blob = compress_with(&array, policy.select(&array))?;
    Ok(blob)
}

/// Compress an already-decoded array with an explicit choice: the forced
/// path behind the CLI's `--codec` flag and the benchmark harness.
pub fn compress_with(array: &NdArray, choice: CodecChoice) -> Result<Vec<u8>, CodecError> {
    pipeline::compress_array(array, codec_for(choice).as_ref())
}

/// Decompress path up to the array: unframe, dispatch on the codec id,
/// decompress, reshape.
pub fn decompress_to_array(blob: &[u8]) -> Result<NdArray, Error> {
    let (header, payload) = format::decode(blob)?;
    let codec = codec_by_id(header.codec_id)?;
    pipeline::decompress_array(header, payload, codec.as_ref())
}

/// Full decompress path ending at the canonical npy representation.
pub fn decompress(blob: &[u8]) -> Result<Vec<u8>, Error> {
    Ok(npy::write_npy(&decompress_to_array(blob)?))
}
