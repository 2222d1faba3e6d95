//! Benchmark and aggregation harness: run the codec matrix over a corpus,
//! score every run, and reduce the results into per-method summaries and
//! per-sparsity-bucket winners. This is where the selection policy's
//! thresholds come from.

pub mod aggregate;
pub mod matrix;
pub mod report;
pub mod score;

pub use aggregate::{bucket_winners, summarize_methods, BucketSpec};
pub use matrix::{default_matrix, run_matrix, BenchError, Method, Sample};
pub use report::{BenchReport, BenchmarkResult, BucketSummary, MethodSummary, RunFailure};
pub use score::{score, SCORE_TIME_BUDGET};
