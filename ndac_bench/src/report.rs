//! Report types; the bench command serializes these as its JSON artifact.

use serde::Serialize;

/// One measured (sample, method) run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub sample: String,
    pub method: String,
    pub sparsity: f64,
    pub original_size: u64,
    pub compressed_size: u64,
    /// compressed / original; above 1 means the codec expanded the data.
    pub compression_ratio: f64,
    pub compress_time: f64,
    pub decompress_time: f64,
    pub total_time: f64,
    pub score: f64,
}

/// A run aborted by a codec error. Recorded, excluded from aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct RunFailure {
    pub sample: String,
    pub method: String,
    pub error: String,
}

/// Score/ratio reduction for one method across the corpus.
#[derive(Debug, Clone, Serialize)]
pub struct MethodSummary {
    pub method: String,
    pub runs: usize,
    pub mean_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub stddev_score: f64,
    pub mean_ratio: f64,
    pub min_ratio: f64,
    pub max_ratio: f64,
    pub stddev_ratio: f64,
}

/// Best method for one sparsity interval `[lower, upper)`.
#[derive(Debug, Clone, Serialize)]
pub struct BucketSummary {
    pub lower: f64,
    pub upper: f64,
    /// Distinct samples that landed in this bucket.
    pub samples: usize,
    pub winner: String,
    pub winner_mean_score: f64,
}

/// Everything a bench run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub results: Vec<BenchmarkResult>,
    pub failures: Vec<RunFailure>,
    pub methods: Vec<MethodSummary>,
    pub buckets: Vec<BucketSummary>,
}

impl BenchReport {
    /// Method summaries sorted by mean score, best first. The sort is
    /// stable, so equal scores keep first-seen order.
    pub fn top_methods(&self, n: usize) -> Vec<&MethodSummary> {
        let mut sorted: Vec<&MethodSummary> = self.methods.iter().collect();
        sorted.sort_by(|a, b| {
            b.mean_score
                .partial_cmp(&a.mean_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.truncate(n);
        sorted
    }
}
