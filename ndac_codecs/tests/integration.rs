//! Integration tests for the codec registry and the full compress path:
//! sniff input, pick a codec by sparsity, frame, and round-trip back out.
//!
//! The headline scenario is the one the selection policy was tuned on: a
//! 500×500 int16 matrix at 90% zeros must come back byte-exact through the
//! sparse branch, and a dense matrix through the dense branch.

use ndac_codecs::{
    codec_by_id, compress, compress_with, decompress, decompress_to_array, Bzip2Codec,
    DeflateCodec, LzmaCodec, StoreCodec,
};
use ndac_core::codec::{Codec, CodecChoice, CodecId};
use ndac_core::error::{CodecError, Error};
use ndac_core::npy::write_npy;
use ndac_core::{format, ContainerHeader, Dtype, NdArray, SelectionPolicy};

// ── helpers ────────────────────────────────────────────────────────────────

/// Generate `len` deterministic bytes using a simple LCG.
fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 56) as u8
        })
        .collect()
}

/// Generate `len` highly compressible bytes (repeating pattern).
fn compressible_bytes(len: usize) -> Vec<u8> {
    let pattern = b"the quick brown fox jumps over the lazy dog. ";
    (0..len).map(|i| pattern[i % pattern.len()]).collect()
}

/// Square int16 matrix with roughly `zero_fraction` zero entries.
fn sparse_i16_matrix(side: u32, zero_fraction: f64, seed: u64) -> NdArray {
    let count = side as usize * side as usize;
    let threshold = (zero_fraction * 10_000.0) as u64;
    let mut data = Vec::with_capacity(count * 2);
    let mut rng = seed;
    for _ in 0..count {
        rng = rng
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let draw = rng >> 33;
        let value: i16 = if draw % 10_000 < threshold {
            0
        } else {
            ((draw >> 16) % 199) as i16 - 99
        };
        data.extend_from_slice(&value.to_le_bytes());
    }
    NdArray::from_parts(vec![side, side], Dtype::Int16, data).unwrap()
}

// ── codec round trips ──────────────────────────────────────────────────────

#[test]
fn test_store_is_identity() {
    let data = pseudo_random_bytes(4096, 0x5EED);
    let codec = StoreCodec;
    assert_eq!(codec.compress(&data).unwrap(), data);
    assert_eq!(codec.decompress(&data).unwrap(), data);
}

#[test]
fn test_roundtrip_bz2() {
    let data = compressible_bytes(128 * 1024);
    let codec = Bzip2Codec::new(9);
    let compressed = codec.compress(&data).unwrap();
    assert!(
        compressed.len() < data.len(),
        "bz2 should shrink compressible data: {} vs {}",
        compressed.len(),
        data.len()
    );
    assert_eq!(codec.decompress(&compressed).unwrap(), data);
}

#[test]
fn test_roundtrip_lzma() {
    let data = compressible_bytes(128 * 1024);
    let codec = LzmaCodec::new(1);
    let compressed = codec.compress(&data).unwrap();
    assert!(compressed.len() < data.len());
    assert_eq!(codec.decompress(&compressed).unwrap(), data);
}

#[test]
fn test_roundtrip_deflate() {
    let data = compressible_bytes(128 * 1024);
    let codec = DeflateCodec::new(6);
    let compressed = codec.compress(&data).unwrap();
    assert!(compressed.len() < data.len());
    assert_eq!(codec.decompress(&compressed).unwrap(), data);
}

#[test]
fn test_roundtrip_high_entropy_bytes() {
    // Random data won't compress, but it must still come back byte-exact.
    let data = pseudo_random_bytes(64 * 1024, 0xDEAD_BEEF);
    let codecs: [Box<dyn Codec>; 3] = [
        Box::new(Bzip2Codec::default()),
        Box::new(LzmaCodec::default()),
        Box::new(DeflateCodec::default()),
    ];
    for codec in &codecs {
        let compressed = codec.compress(&data).unwrap();
        assert_eq!(
            codec.decompress(&compressed).unwrap(),
            data,
            "{} round trip on random bytes",
            codec.name()
        );
    }
}

#[test]
fn test_empty_payload_roundtrip() {
    let codecs: [Box<dyn Codec>; 4] = [
        Box::new(StoreCodec),
        Box::new(Bzip2Codec::default()),
        Box::new(LzmaCodec::default()),
        Box::new(DeflateCodec::default()),
    ];
    for codec in &codecs {
        let compressed = codec.compress(&[]).unwrap();
        assert!(
            codec.decompress(&compressed).unwrap().is_empty(),
            "{} should round-trip the empty payload",
            codec.name()
        );
    }
}

#[test]
fn test_decompress_garbage_is_corrupt_error() {
    let garbage = b"this is not a valid compressed stream of any kind";
    let codecs: [Box<dyn Codec>; 3] = [
        Box::new(Bzip2Codec::default()),
        Box::new(LzmaCodec::default()),
        Box::new(DeflateCodec::default()),
    ];
    for codec in &codecs {
        let err = codec.decompress(garbage).unwrap_err();
        assert!(
            matches!(err, CodecError::Corrupt { .. }),
            "{} should report Corrupt, got {err:?}",
            codec.name()
        );
    }
}

// ── registry ───────────────────────────────────────────────────────────────

#[test]
fn test_codec_by_id_covers_registry() {
    for id in CodecId::ALL {
        let codec = codec_by_id(id as u8).unwrap();
        assert_eq!(codec.id(), id);
        assert_eq!(codec.name(), id.name());
    }
}

#[test]
fn test_codec_by_id_unknown() {
    let err = codec_by_id(9).unwrap_err();
    assert!(matches!(err, CodecError::Unsupported(9)));
    assert_eq!(err.to_string(), "unsupported codec id 9");
}

#[test]
fn test_levels_do_not_affect_decode() {
    // A reader resolves codecs by id alone, at default level; streams written
    // at any level must decompress through that default instance.
    let data = compressible_bytes(32 * 1024);
    let cases: [(Box<dyn Codec>, Box<dyn Codec>); 3] = [
        (Box::new(Bzip2Codec::new(1)), Box::new(Bzip2Codec::new(9))),
        (Box::new(LzmaCodec::new(0)), Box::new(LzmaCodec::new(9))),
        (Box::new(DeflateCodec::new(1)), Box::new(DeflateCodec::new(9))),
    ];
    for (fast, slow) in &cases {
        let reader = codec_by_id(fast.id() as u8).unwrap();
        for writer in [fast, slow] {
            let compressed = writer.compress(&data).unwrap();
            assert_eq!(
                reader.decompress(&compressed).unwrap(),
                data,
                "{} level independence",
                writer.name()
            );
        }
    }
}

// ── adaptive compress path ─────────────────────────────────────────────────

#[test]
fn test_auto_compress_sparse_matrix_takes_lzma_branch() {
    let array = sparse_i16_matrix(500, 0.9, 0xA11CE);
    assert!(
        (array.sparsity() - 0.9).abs() < 0.01,
        "corpus generator drifted: sparsity={}",
        array.sparsity()
    );

    let input = write_npy(&array);
    let blob = compress(&input, &SelectionPolicy::default()).unwrap();

    let (header, _) = format::decode(&blob).unwrap();
    assert_eq!(header.codec_id, CodecId::Lzma as u8, "sparse branch is lzma");
    assert_eq!(header.shape, vec![500, 500]);
    assert_eq!(header.dtype, Dtype::Int16);

    assert_eq!(decompress_to_array(&blob).unwrap(), array);
    // The npy writer is deterministic, so the full path reproduces the input.
    assert_eq!(decompress(&blob).unwrap(), input);
}

#[test]
fn test_auto_compress_dense_matrix_takes_bz2_branch() {
    let array = sparse_i16_matrix(200, 0.0, 0xB0B);
    assert!(array.sparsity() < 0.02, "sparsity={}", array.sparsity());

    let blob = compress(&write_npy(&array), &SelectionPolicy::default()).unwrap();
    let (header, _) = format::decode(&blob).unwrap();
    assert_eq!(header.codec_id, CodecId::Bzip2 as u8, "dense branch is bz2");
    assert_eq!(decompress_to_array(&blob).unwrap(), array);
}

#[test]
fn test_auto_compress_json_rows_input() {
    let blob = compress(
        br#"{"rows": [[0, 0, 0], [0, 5, 0], [0, 0, 0]]}"#,
        &SelectionPolicy::default(),
    )
    .unwrap();
    let array = decompress_to_array(&blob).unwrap();
    assert_eq!(array.shape(), &[3, 3]);
    assert_eq!(array.dtype(), Dtype::Int16);
    assert!((array.sparsity() - 8.0 / 9.0).abs() < 1e-12);
}

#[test]
fn test_forced_choice_overrides_policy() {
    // Sparse data would take lzma under the policy; a forced deflate-9
    // must be honored and still round-trip.
    let array = sparse_i16_matrix(100, 0.9, 7);
    let blob = compress_with(&array, CodecChoice::new(CodecId::Deflate, 9)).unwrap();
    let (header, _) = format::decode(&blob).unwrap();
    assert_eq!(header.codec_id, CodecId::Deflate as u8);
    assert_eq!(decompress_to_array(&blob).unwrap(), array);
}

#[test]
fn test_sparse_data_compresses_strongly() {
    let array = sparse_i16_matrix(500, 0.9, 0xCAFE);
    let raw = array.byte_len();

    let blob = compress_with(&array, CodecChoice::new(CodecId::Lzma, 1)).unwrap();
    let ratio = blob.len() as f64 / raw as f64;
    eprintln!("lzma-1 on 90% zeros: ratio={:.4}", ratio);
    assert!(
        ratio < 0.25,
        "90%-zero int16 data should compress at least 4x, got ratio={:.4}",
        ratio
    );
}

#[test]
fn test_decompress_rejects_unknown_codec_container() {
    let header = ContainerHeader::new(7, vec![1], Dtype::Int8);
    let blob = format::encode(&header, &[0]);
    let err = decompress_to_array(&blob).unwrap_err();
    assert!(
        matches!(err, Error::Codec(CodecError::Unsupported(7))),
        "got {err:?}"
    );
}

#[test]
fn test_decompress_rejects_corrupt_payload() {
    let header = ContainerHeader::new(CodecId::Bzip2 as u8, vec![4], Dtype::Int32);
    let blob = format::encode(&header, b"definitely not bzip2");
    let err = decompress_to_array(&blob).unwrap_err();
    assert!(
        matches!(err, Error::Codec(CodecError::Corrupt { .. })),
        "got {err:?}"
    );
}

#[test]
fn test_decompress_rejects_wrong_payload_size() {
    // A valid bz2 stream whose decompressed length disagrees with the shape.
    let codec = Bzip2Codec::default();
    let payload = codec.compress(&[1, 2, 3, 4]).unwrap();
    let header = ContainerHeader::new(CodecId::Bzip2 as u8, vec![3], Dtype::Int32);
    let blob = format::encode(&header, &payload);
    let err = decompress_to_array(&blob).unwrap_err();
    assert!(matches!(err, Error::Format(_)), "got {err:?}");
}
