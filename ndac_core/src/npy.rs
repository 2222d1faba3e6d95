//! Array source and sink: npy read/write plus ordered input sniffing.
//!
//! The external representation is the npy format (v1.0, falling back to the
//! v2.0 header only when a pathological rank overflows the v1 length field).
//! [`decode_any`] accepts the three source encodings seen in the wild, tried
//! in order: a JSON object with integer `"rows"`, base64 text wrapping an
//! npy blob, and a raw npy blob. First success wins; if none match the input
//! is rejected as malformed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::array::NdArray;
use crate::dtype::Dtype;
use crate::error::InputError;

const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Magic (6) + version (2) + u16 header length (2).
const NPY_V1_PREAMBLE_LEN: usize = 10;

/// Magic (6) + version (2) + u32 header length (4).
const NPY_V2_PREAMBLE_LEN: usize = 12;

fn malformed(msg: impl Into<String>) -> InputError {
    InputError::MalformedSource(msg.into())
}

// ── npy reader ─────────────────────────────────────────────────────────────

/// Parse an npy blob into an [`NdArray`].
///
/// C-order little-endian data only; `fortran_order: True` and big-endian
/// descr tags are rejected.
pub fn read_npy(blob: &[u8]) -> Result<NdArray, InputError> {
    if blob.len() < NPY_V1_PREAMBLE_LEN {
        return Err(malformed("npy: truncated preamble"));
    }
    if &blob[..6] != NPY_MAGIC {
        return Err(malformed("npy: bad magic"));
    }
    let (major, minor) = (blob[6], blob[7]);
    let (header_len, header_start) = match major {
        1 => (u16::from_le_bytes([blob[8], blob[9]]) as usize, NPY_V1_PREAMBLE_LEN),
        2 => {
            if blob.len() < NPY_V2_PREAMBLE_LEN {
                return Err(malformed("npy: truncated v2 preamble"));
            }
            let len = u32::from_le_bytes([blob[8], blob[9], blob[10], blob[11]]);
            (len as usize, NPY_V2_PREAMBLE_LEN)
        }
        _ => {
            return Err(malformed(format!(
                "npy: unsupported format version {major}.{minor}"
            )))
        }
    };
    let data_start = header_start
        .checked_add(header_len)
        .ok_or_else(|| malformed("npy: header length overflow"))?;
    if blob.len() < data_start {
        return Err(malformed("npy: truncated header"));
    }
    let header = std::str::from_utf8(&blob[header_start..data_start])
        .map_err(|_| malformed("npy: header is not valid UTF-8"))?;

    let descr = dict_str(header, "descr").ok_or_else(|| malformed("npy: missing descr"))?;
    let dtype = Dtype::from_tag(descr)
        .ok_or_else(|| malformed(format!("npy: unsupported descr {descr:?}")))?;

    match dict_value(header, "fortran_order") {
        Some(rest) if rest.starts_with("False") => {}
        Some(rest) if rest.starts_with("True") => {
            return Err(malformed("npy: fortran order not supported"));
        }
        _ => return Err(malformed("npy: missing fortran_order")),
    }

    let shape = dict_shape(header).ok_or_else(|| malformed("npy: bad shape tuple"))?;

    NdArray::from_parts(shape, dtype, blob[data_start..].to_vec())
        .map_err(|e| malformed(format!("npy: {e}")))
}

/// Find the value text following `'key':` in the header dict.
fn dict_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let pattern = format!("'{key}':");
    let start = header.find(&pattern)? + pattern.len();
    Some(header[start..].trim_start())
}

/// Extract a single-quoted string value.
fn dict_str<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let rest = dict_value(header, key)?.strip_prefix('\'')?;
    let end = rest.find('\'')?;
    Some(&rest[..end])
}

/// Extract the shape tuple as dimensions.
fn dict_shape(header: &str) -> Option<Vec<u32>> {
    let rest = dict_value(header, "shape")?.strip_prefix('(')?;
    let inner = &rest[..rest.find(')')?];
    let mut shape = Vec::new();
    for part in inner.split(',') {
        let part = part.trim();
        if part.is_empty() {
            // trailing comma in "(500,)" or the empty "()" tuple
            continue;
        }
        shape.push(part.parse::<u32>().ok()?);
    }
    Some(shape)
}

// ── npy writer ─────────────────────────────────────────────────────────────

/// Serialize an [`NdArray`] as an npy blob.
pub fn write_npy(array: &NdArray) -> Vec<u8> {
    let shape = array.shape();
    let shape_repr = match shape.len() {
        0 => "()".to_string(),
        1 => format!("({},)", shape[0]),
        _ => {
            let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
            format!("({})", dims.join(", "))
        }
    };
    let mut dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        array.dtype().tag(),
        shape_repr
    );

    // v1 header unless the dict overflows the u16 length field (only
    // reachable at absurd rank); pad with spaces to a 64-byte boundary,
    // newline last.
    let v1 = NPY_V1_PREAMBLE_LEN + dict.len() + 1 <= u16::MAX as usize;
    let preamble_len = if v1 { NPY_V1_PREAMBLE_LEN } else { NPY_V2_PREAMBLE_LEN };
    let pad = (64 - (preamble_len + dict.len() + 1) % 64) % 64;
    dict.extend(std::iter::repeat(' ').take(pad));
    dict.push('\n');

    let mut blob = Vec::with_capacity(preamble_len + dict.len() + array.byte_len());
    blob.extend_from_slice(NPY_MAGIC);
    if v1 {
        blob.extend_from_slice(&[1, 0]);
        blob.extend_from_slice(&(dict.len() as u16).to_le_bytes());
    } else {
        blob.extend_from_slice(&[2, 0]);
        blob.extend_from_slice(&(dict.len() as u32).to_le_bytes());
    }
    blob.extend_from_slice(dict.as_bytes());
    blob.extend_from_slice(array.as_bytes());
    blob
}

// ── input sniffing ─────────────────────────────────────────────────────────

/// Decode an input blob by trying each recognized source encoding in order.
pub fn decode_any(input: &[u8]) -> Result<NdArray, InputError> {
    if let Some(array) = try_json_rows(input) {
        return Ok(array);
    }
    if let Some(array) = try_base64_npy(input) {
        return Ok(array);
    }
    if let Ok(array) = read_npy(input) {
        return Ok(array);
    }
    Err(malformed(
        "input is not JSON rows, base64-wrapped npy, or raw npy",
    ))
}

/// JSON object with a `"rows"` key: either a flat integer list (rank 1) or a
/// rectangular list of integer rows (rank 2), decoded as int16. Ragged rows
/// and out-of-range values fail the attempt.
fn try_json_rows(input: &[u8]) -> Option<NdArray> {
    let value: serde_json::Value = serde_json::from_slice(input).ok()?;
    let rows = value.get("rows")?.as_array()?;

    if !rows.is_empty() && rows.iter().all(|v| v.is_array()) {
        let ncols = rows[0].as_array()?.len();
        let mut data = Vec::with_capacity(rows.len() * ncols * 2);
        for row in rows {
            let row = row.as_array()?;
            if row.len() != ncols {
                return None;
            }
            for v in row {
                push_i16(&mut data, v)?;
            }
        }
        let shape = vec![u32::try_from(rows.len()).ok()?, u32::try_from(ncols).ok()?];
        NdArray::from_parts(shape, Dtype::Int16, data).ok()
    } else {
        let mut data = Vec::with_capacity(rows.len() * 2);
        for v in rows {
            push_i16(&mut data, v)?;
        }
        let shape = vec![u32::try_from(rows.len()).ok()?];
        NdArray::from_parts(shape, Dtype::Int16, data).ok()
    }
}

fn push_i16(data: &mut Vec<u8>, value: &serde_json::Value) -> Option<()> {
    let n = i16::try_from(value.as_i64()?).ok()?;
    data.extend_from_slice(&n.to_le_bytes());
    Some(())
}

/// Base64 text (standard alphabet) whose decoded bytes parse as npy.
fn try_base64_npy(input: &[u8]) -> Option<NdArray> {
    let text = std::str::from_utf8(input).ok()?;
    let decoded = BASE64.decode(text.trim()).ok()?;
    read_npy(&decoded).ok()
}
