//! Round-trip pipeline steps that run once a codec has been resolved.
//!
//! Codec resolution by id lives with the codec implementations, not here;
//! callers look the codec up and pass it in. Both paths move arrays by value
//! and touch no shared state.

use crate::array::NdArray;
use crate::codec::Codec;
use crate::error::{CodecError, Error};
use crate::format::{self, ContainerHeader};

/// Compress an array's buffer and frame it: the compress path after
/// selection has produced a codec.
pub fn compress_array(array: &NdArray, codec: &dyn Codec) -> Result<Vec<u8>, CodecError> {
    let payload = codec.compress(array.as_bytes())?;
    let header = ContainerHeader::new(codec.id() as u8, array.shape().to_vec(), array.dtype());
    Ok(format::encode(&header, &payload))
}

/// Decompress a container's payload and reshape it: the decompress path
/// after the header has been parsed and its codec id resolved.
///
/// Consumes the header; the array takes over its shape.
pub fn decompress_array(
    header: ContainerHeader,
    payload: &[u8],
    codec: &dyn Codec,
) -> Result<NdArray, Error> {
    let raw = codec.decompress(payload)?;
    let array = NdArray::from_parts(header.shape, header.dtype, raw)?;
    Ok(array)
}
