use crate::dtype::Dtype;
use crate::error::FormatError;

/// An N-dimensional array as a contiguous little-endian byte buffer plus
/// shape and dtype. Immutable after construction; the pipeline consumes it
/// by value and discards it after framing.
///
/// Rank 0 is a scalar (one element); a 0 anywhere in the shape makes the
/// array empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdArray {
    shape: Vec<u32>,
    dtype: Dtype,
    data: Vec<u8>,
}

/// Byte length implied by a shape/dtype pair.
///
/// The product saturates on overflow; a saturated length can never equal a
/// real buffer length, so `from_parts` still rejects such shapes.
pub fn declared_byte_len(shape: &[u32], dtype: Dtype) -> u64 {
    let elements = shape.iter().fold(1u64, |n, &d| n.saturating_mul(d as u64));
    elements.saturating_mul(dtype.size() as u64)
}

impl NdArray {
    /// Build an array from its parts, validating that the buffer length
    /// matches `product(shape) * element_size(dtype)`.
    pub fn from_parts(shape: Vec<u32>, dtype: Dtype, data: Vec<u8>) -> Result<Self, FormatError> {
        let expected = declared_byte_len(&shape, dtype);
        if expected != data.len() as u64 {
            return Err(FormatError::SizeMismatch {
                shape,
                dtype: dtype.tag(),
                expected,
                actual: data.len() as u64,
            });
        }
        Ok(Self { shape, dtype, data })
    }

    pub fn shape(&self) -> &[u32] {
        &self.shape
    }

    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements (1 for rank 0).
    pub fn element_count(&self) -> u64 {
        self.shape.iter().map(|&d| d as u64).product()
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Fraction of zero-valued elements, in [0, 1]. Empty arrays report 0.0.
    pub fn sparsity(&self) -> f64 {
        let total = self.element_count();
        if total == 0 {
            return 0.0;
        }
        self.dtype.count_zeros(&self.data) as f64 / total as f64
    }
}
