//! NDAC container wire format.
//!
//! Layout (all integers little-endian unsigned):
//! ```text
//!   codec_id : u8
//!   rank     : u32
//!   shape    : rank × u32
//!   dtype    : 8-byte ASCII tag, NUL-padded
//!   payload  : codec-specific compressed bytes, runs to end of blob
//! ```
//!
//! The header is variable-length: its size is only known once `rank` has been
//! read, so decoding is a two-pass parse (fixed prefix, then shape + tag).
//! The payload carries no length prefix: a container is only meaningful as a
//! whole blob and must never be concatenated with trailing data.

use crate::dtype::Dtype;
use crate::error::FormatError;

/// Bytes of header before the shape entries: codec_id (1) + rank (4).
pub const HEADER_PREFIX_LEN: usize = 5;

/// Bytes per shape dimension.
pub const SHAPE_ENTRY_LEN: usize = 4;

/// Bytes of the dtype tag field.
pub const DTYPE_TAG_LEN: usize = 8;

/// Smallest possible header: rank 0, no shape entries.
pub const MIN_HEADER_LEN: usize = HEADER_PREFIX_LEN + DTYPE_TAG_LEN;

/// Decoded representation of a container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub codec_id: u8,
    pub shape: Vec<u32>,
    pub dtype: Dtype,
}

impl ContainerHeader {
    pub fn new(codec_id: u8, shape: Vec<u32>, dtype: Dtype) -> Self {
        Self {
            codec_id,
            shape,
            dtype,
        }
    }

    /// Serialized header length for this rank.
    pub fn encoded_len(&self) -> usize {
        HEADER_PREFIX_LEN + self.shape.len() * SHAPE_ENTRY_LEN + DTYPE_TAG_LEN
    }

    /// Serialize the header alone.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.push(self.codec_id);
        buf.extend_from_slice(&(self.shape.len() as u32).to_le_bytes());
        for &dim in &self.shape {
            buf.extend_from_slice(&dim.to_le_bytes());
        }
        let mut tag = [0u8; DTYPE_TAG_LEN];
        let text = self.dtype.tag().as_bytes();
        tag[..text.len()].copy_from_slice(text);
        buf.extend_from_slice(&tag);
        buf
    }
}

/// Serialize a header followed verbatim by its payload.
pub fn encode(header: &ContainerHeader, payload: &[u8]) -> Vec<u8> {
    let mut blob = header.to_bytes();
    blob.reserve(payload.len());
    blob.extend_from_slice(payload);
    blob
}

/// Parse a container blob into its header and borrowed payload slice.
pub fn decode(blob: &[u8]) -> Result<(ContainerHeader, &[u8]), FormatError> {
    // Pass 1: fixed prefix.
    if blob.len() < HEADER_PREFIX_LEN {
        return Err(FormatError::Truncated {
            section: "codec id and rank",
            needed: HEADER_PREFIX_LEN as u64,
            available: blob.len() as u64,
        });
    }
    let codec_id = blob[0];
    let rank = u32::from_le_bytes([blob[1], blob[2], blob[3], blob[4]]);

    // Pass 2: rank shape entries plus the dtype tag. 64-bit arithmetic so a
    // hostile rank cannot wrap the length check.
    let needed =
        HEADER_PREFIX_LEN as u64 + rank as u64 * SHAPE_ENTRY_LEN as u64 + DTYPE_TAG_LEN as u64;
    if (blob.len() as u64) < needed {
        return Err(FormatError::Truncated {
            section: "shape and dtype tag",
            needed,
            available: blob.len() as u64,
        });
    }

    let mut shape = Vec::with_capacity(rank as usize);
    let mut off = HEADER_PREFIX_LEN;
    for _ in 0..rank {
        shape.push(u32::from_le_bytes([
            blob[off],
            blob[off + 1],
            blob[off + 2],
            blob[off + 3],
        ]));
        off += SHAPE_ENTRY_LEN;
    }

    let tag_bytes = &blob[off..off + DTYPE_TAG_LEN];
    let unpadded = match tag_bytes.iter().position(|&b| b == 0) {
        Some(end) => &tag_bytes[..end],
        None => tag_bytes,
    };
    let dtype = std::str::from_utf8(unpadded)
        .ok()
        .and_then(Dtype::from_tag)
        .ok_or_else(|| FormatError::UnknownDtype {
            tag: String::from_utf8_lossy(unpadded).into_owned(),
        })?;
    off += DTYPE_TAG_LEN;

    Ok((
        ContainerHeader {
            codec_id,
            shape,
            dtype,
        },
        &blob[off..],
    ))
}
