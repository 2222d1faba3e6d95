//! Error taxonomy for the compression pipeline.
//!
//! Three families, matching the three places an operation can go wrong:
//! [`InputError`] while decoding an external array source, [`FormatError`]
//! while parsing or validating a container, and [`CodecError`] inside a
//! compression backend. All of them are terminal for the operation that
//! raised them; nothing here is retried.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella error for pipeline entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// The external array source could not be decoded.
#[derive(Debug, Error)]
pub enum InputError {
    /// None of the recognized source encodings matched.
    #[error("malformed source: {0}")]
    MalformedSource(String),
}

/// The container blob is damaged or inconsistent with itself.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The blob ended before a header section it declared.
    #[error("container truncated: {section} needs {needed} bytes, {available} available")]
    Truncated {
        section: &'static str,
        needed: u64,
        available: u64,
    },

    /// The dtype tag is not one of the recognized fixed-width numeric types.
    #[error("unknown dtype tag {tag:?}")]
    UnknownDtype { tag: String },

    /// The payload length disagrees with the declared shape and dtype.
    #[error("size mismatch: shape {shape:?} of {dtype} needs {expected} bytes, got {actual}")]
    SizeMismatch {
        shape: Vec<u32>,
        dtype: &'static str,
        expected: u64,
        actual: u64,
    },
}

/// A compression backend failed.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The codec id is not in the registry. Either the blob is corrupt or it
    /// was written by a build with a different registry.
    #[error("unsupported codec id {0}")]
    Unsupported(u8),

    /// The decompressor could not parse its input stream.
    #[error("corrupt {codec} stream: {source}")]
    Corrupt {
        codec: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The backing library failed outside of a stream-parse problem.
    #[error("{codec} backend error: {source}")]
    Backend {
        codec: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl CodecError {
    pub fn corrupt(codec: &'static str, source: std::io::Error) -> Self {
        CodecError::Corrupt { codec, source }
    }

    pub fn backend(codec: &'static str, source: std::io::Error) -> Self {
        CodecError::Backend { codec, source }
    }
}
