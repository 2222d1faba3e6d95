//! The (sample × method) benchmark matrix.
//!
//! Every pair is independent: compress, decompress, verify, score. Pairs run
//! on the rayon pool; results come back in input order, so reports and tie
//! breaks are deterministic regardless of scheduling.

use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;

use ndac_core::codec::{CodecChoice, CodecId};
use ndac_core::NdArray;

use crate::aggregate::{bucket_winners, summarize_methods, BucketSpec};
use crate::report::{BenchReport, BenchmarkResult, RunFailure};
use crate::score::score;

/// One cell of the test matrix.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub choice: CodecChoice,
}

impl Method {
    pub fn new(choice: CodecChoice) -> Self {
        Self {
            name: choice.to_string(),
            choice,
        }
    }
}

/// A named corpus entry.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: String,
    pub array: NdArray,
}

impl Sample {
    pub fn new(name: impl Into<String>, array: NdArray) -> Self {
        Self {
            name: name.into(),
            array,
        }
    }
}

/// The fixed default matrix: bz2 levels 1–9, lzma presets 0–9, deflate
/// levels 1–9. Store is omitted; its ratio of 1.0 always scores zero.
pub fn default_matrix() -> Vec<Method> {
    let mut methods = Vec::with_capacity(28);
    for level in 1..=9 {
        methods.push(Method::new(CodecChoice::new(CodecId::Bzip2, level)));
    }
    for preset in 0..=9 {
        methods.push(Method::new(CodecChoice::new(CodecId::Lzma, preset)));
    }
    for level in 1..=9 {
        methods.push(Method::new(CodecChoice::new(CodecId::Deflate, level)));
    }
    methods
}

/// Abort condition for the whole batch: a codec reported success but the
/// round-tripped bytes differ. Detected codec errors are per-run
/// [`RunFailure`]s instead and never abort the batch.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("round-trip mismatch for {method} on {sample}: decompressed bytes differ from input")]
    RoundTripMismatch { sample: String, method: String },
}

enum RunOutcome {
    Done(Box<BenchmarkResult>),
    Failed(RunFailure),
}

fn run_one(sample: &Sample, method: &Method) -> Result<RunOutcome, BenchError> {
    let raw = sample.array.as_bytes();
    let codec = ndac_codecs::codec_for(method.choice);

    let t0 = Instant::now();
    let compressed = match codec.compress(raw) {
        Ok(bytes) => bytes,
        Err(e) => return Ok(failed(sample, method, e)),
    };
    let compress_time = t0.elapsed().as_secs_f64();

    let t1 = Instant::now();
    let restored = match codec.decompress(&compressed) {
        Ok(bytes) => bytes,
        Err(e) => return Ok(failed(sample, method, e)),
    };
    let decompress_time = t1.elapsed().as_secs_f64();

    if restored != raw {
        return Err(BenchError::RoundTripMismatch {
            sample: sample.name.clone(),
            method: method.name.clone(),
        });
    }

    let ratio = compressed.len() as f64 / raw.len() as f64;
    let total_time = compress_time + decompress_time;
    Ok(RunOutcome::Done(Box::new(BenchmarkResult {
        sample: sample.name.clone(),
        method: method.name.clone(),
        sparsity: sample.array.sparsity(),
        original_size: raw.len() as u64,
        compressed_size: compressed.len() as u64,
        compression_ratio: ratio,
        compress_time,
        decompress_time,
        total_time,
        score: score(ratio, total_time),
    })))
}

fn failed(sample: &Sample, method: &Method, error: impl std::fmt::Display) -> RunOutcome {
    RunOutcome::Failed(RunFailure {
        sample: sample.name.clone(),
        method: method.name.clone(),
        error: error.to_string(),
    })
}

/// Run every (sample, method) pair in parallel and aggregate.
///
/// All pairs complete before errors are examined, so a round-trip mismatch
/// surfaces as the first failing pair in input order, not whichever thread
/// lost the race.
pub fn run_matrix(
    samples: &[Sample],
    methods: &[Method],
    buckets: &BucketSpec,
) -> Result<BenchReport, BenchError> {
    let pairs: Vec<(&Sample, &Method)> = samples
        .iter()
        .flat_map(|sample| methods.iter().map(move |method| (sample, method)))
        .collect();

    let outcomes: Vec<Result<RunOutcome, BenchError>> = pairs
        .par_iter()
        .map(|&(sample, method)| run_one(sample, method))
        .collect();

    let mut results = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome? {
            RunOutcome::Done(result) => results.push(*result),
            RunOutcome::Failed(failure) => failures.push(failure),
        }
    }

    let method_summaries = summarize_methods(&results);
    let bucket_summaries = bucket_winners(&results, buckets);
    Ok(BenchReport {
        results,
        failures,
        methods: method_summaries,
        buckets: bucket_summaries,
    })
}
