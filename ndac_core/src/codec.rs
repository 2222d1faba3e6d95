use std::fmt;

use crate::error::CodecError;

/// Closed enumeration of codec ids. The numeric values are the on-wire
/// discriminator stored in the container header and must never change.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecId {
    /// Payload stored verbatim.
    Store = 0,
    /// bzip2 block format.
    Bzip2 = 1,
    /// LZMA in an xz container. The xz framing carries its own filter and
    /// dictionary metadata, so decompression never depends on compress-time
    /// settings (raw LZMA streams, which do, are not supported).
    Lzma = 2,
    /// Deflate in a zlib wrapper.
    Deflate = 3,
}

impl CodecId {
    pub const ALL: [CodecId; 4] = [CodecId::Store, CodecId::Bzip2, CodecId::Lzma, CodecId::Deflate];

    /// Short name used in method labels and CLI arguments.
    pub fn name(self) -> &'static str {
        match self {
            CodecId::Store => "store",
            CodecId::Bzip2 => "bz2",
            CodecId::Lzma => "lzma",
            CodecId::Deflate => "deflate",
        }
    }
}

impl TryFrom<u8> for CodecId {
    type Error = CodecError;

    fn try_from(id: u8) -> Result<Self, CodecError> {
        match id {
            0 => Ok(CodecId::Store),
            1 => Ok(CodecId::Bzip2),
            2 => Ok(CodecId::Lzma),
            3 => Ok(CodecId::Deflate),
            other => Err(CodecError::Unsupported(other)),
        }
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A codec id paired with its compression level/preset.
///
/// Only the id crosses the wire; the level affects the compressor alone,
/// since every backing format self-describes what its decoder needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecChoice {
    pub codec: CodecId,
    pub level: u32,
}

impl CodecChoice {
    pub fn new(codec: CodecId, level: u32) -> Self {
        Self { codec, level }
    }
}

impl fmt::Display for CodecChoice {
    /// Method label, e.g. `bz2-9`. Store has no level and prints bare.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.codec {
            CodecId::Store => f.write_str("store"),
            codec => write!(f, "{}-{}", codec, self.level),
        }
    }
}

/// Core compression abstraction.
///
/// Each `Codec` implementation:
/// - Is identified by a stable [`CodecId`] stored in the container header.
/// - Must satisfy `decompress(compress(x)) == x` for every byte sequence;
///   lossy substitution is a defect, not a trade-off.
/// - Must decompress without being told the compress-time level; the stream
///   itself carries whatever the decoder needs.
pub trait Codec: Send + Sync + fmt::Debug {
    /// Stable codec id stored in the container header.
    fn id(&self) -> CodecId;

    /// Human-readable codec name for display.
    fn name(&self) -> &'static str {
        self.id().name()
    }

    /// Compress a whole payload.
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Decompress a whole payload.
    fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>, CodecError>;
}
