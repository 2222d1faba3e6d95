use std::fmt;

/// Element type of an array, restricted to fixed-width little-endian numerics.
///
/// Each variant maps to a numpy-style array-interface tag (`<i2`, `<f4`, ...)
/// which is what the container stores on the wire. One-byte types additionally
/// accept the `|` byte-order prefix since that is what the array interface
/// reports for types where byte order does not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dtype {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
}

impl Dtype {
    /// Every supported dtype, in tag order.
    pub const ALL: [Dtype; 10] = [
        Dtype::Int8,
        Dtype::Uint8,
        Dtype::Int16,
        Dtype::Uint16,
        Dtype::Int32,
        Dtype::Uint32,
        Dtype::Int64,
        Dtype::Uint64,
        Dtype::Float32,
        Dtype::Float64,
    ];

    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            Dtype::Int8 | Dtype::Uint8 => 1,
            Dtype::Int16 | Dtype::Uint16 => 2,
            Dtype::Int32 | Dtype::Uint32 | Dtype::Float32 => 4,
            Dtype::Int64 | Dtype::Uint64 | Dtype::Float64 => 8,
        }
    }

    /// Canonical on-wire tag.
    pub fn tag(self) -> &'static str {
        match self {
            Dtype::Int8 => "<i1",
            Dtype::Uint8 => "<u1",
            Dtype::Int16 => "<i2",
            Dtype::Uint16 => "<u2",
            Dtype::Int32 => "<i4",
            Dtype::Uint32 => "<u4",
            Dtype::Int64 => "<i8",
            Dtype::Uint64 => "<u8",
            Dtype::Float32 => "<f4",
            Dtype::Float64 => "<f8",
        }
    }

    /// Parse a tag, accepting the `|` alias for one-byte types.
    /// Big-endian (`>`) tags are not recognized.
    pub fn from_tag(tag: &str) -> Option<Dtype> {
        match tag {
            "<i1" | "|i1" => Some(Dtype::Int8),
            "<u1" | "|u1" => Some(Dtype::Uint8),
            "<i2" => Some(Dtype::Int16),
            "<u2" => Some(Dtype::Uint16),
            "<i4" => Some(Dtype::Int32),
            "<u4" => Some(Dtype::Uint32),
            "<i8" => Some(Dtype::Int64),
            "<u8" => Some(Dtype::Uint64),
            "<f4" => Some(Dtype::Float32),
            "<f8" => Some(Dtype::Float64),
            _ => None,
        }
    }

    /// Count zero-valued elements in a raw little-endian buffer.
    ///
    /// Zero is a value test, not a byte test: float negative zero counts,
    /// NaN does not. For integers the two coincide (zero is all-bytes-zero
    /// regardless of width or signedness).
    pub fn count_zeros(self, data: &[u8]) -> usize {
        match self {
            Dtype::Float32 => data
                .chunks_exact(4)
                .filter(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) == 0.0)
                .count(),
            Dtype::Float64 => data
                .chunks_exact(8)
                .filter(|c| {
                    f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) == 0.0
                })
                .count(),
            _ => data
                .chunks_exact(self.size())
                .filter(|c| c.iter().all(|&b| b == 0))
                .count(),
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
