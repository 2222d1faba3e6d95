//! Per-method summaries and sparsity-bucketed winners.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::report::{BenchmarkResult, BucketSummary, MethodSummary};

struct Stats {
    mean: f64,
    min: f64,
    max: f64,
    stddev: f64,
}

/// Population mean/min/max/stddev. Empty input reduces to all zeros.
fn stats_of(values: &[f64]) -> Stats {
    if values.is_empty() {
        return Stats {
            mean: 0.0,
            min: 0.0,
            max: 0.0,
            stddev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Stats {
        mean,
        min,
        max,
        stddev: variance.sqrt(),
    }
}

/// Group results by method, in first-seen order, and reduce score and ratio.
pub fn summarize_methods(results: &[BenchmarkResult]) -> Vec<MethodSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&BenchmarkResult>> = HashMap::new();
    for result in results {
        groups
            .entry(result.method.as_str())
            .or_insert_with(|| {
                order.push(result.method.as_str());
                Vec::new()
            })
            .push(result);
    }

    order
        .iter()
        .map(|&name| {
            let group = &groups[name];
            let scores: Vec<f64> = group.iter().map(|r| r.score).collect();
            let ratios: Vec<f64> = group.iter().map(|r| r.compression_ratio).collect();
            let score = stats_of(&scores);
            let ratio = stats_of(&ratios);
            MethodSummary {
                method: name.to_string(),
                runs: group.len(),
                mean_score: score.mean,
                min_score: score.min,
                max_score: score.max,
                stddev_score: score.stddev,
                mean_ratio: ratio.mean,
                min_ratio: ratio.min,
                max_ratio: ratio.max,
                stddev_ratio: ratio.stddev,
            }
        })
        .collect()
}

/// Sparsity interval layout: fine buckets near zero, where the interesting
/// codec crossover happens, coarse buckets above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketSpec {
    /// Width of the fine buckets covering [0, fine_limit).
    pub fine_width: f64,
    /// Where fine buckets stop and coarse buckets begin.
    pub fine_limit: f64,
    /// Width of the coarse buckets covering [fine_limit, 1.0].
    pub coarse_width: f64,
}

impl Default for BucketSpec {
    fn default() -> Self {
        Self {
            fine_width: 0.005,
            fine_limit: 0.05,
            coarse_width: 0.05,
        }
    }
}

impl BucketSpec {
    fn fine_count(&self) -> usize {
        (self.fine_limit / self.fine_width).round() as usize
    }

    /// Bucket index for a sparsity value. Exact 1.0 folds into the top
    /// bucket rather than opening a new one past the end of the range.
    pub fn index_of(&self, sparsity: f64) -> usize {
        let s = sparsity.clamp(0.0, 1.0).min(1.0 - f64::EPSILON);
        if s < self.fine_limit {
            (s / self.fine_width) as usize
        } else {
            self.fine_count() + ((s - self.fine_limit) / self.coarse_width) as usize
        }
    }

    /// `[lower, upper)` bounds of a bucket index.
    pub fn bounds(&self, index: usize) -> (f64, f64) {
        let fine = self.fine_count();
        if index < fine {
            (
                index as f64 * self.fine_width,
                (index + 1) as f64 * self.fine_width,
            )
        } else {
            let lower = self.fine_limit + (index - fine) as f64 * self.coarse_width;
            (lower, lower + self.coarse_width)
        }
    }
}

/// Group results by sparsity bucket and pick each bucket's best method by
/// mean score. Strict comparison keeps the earlier-seen method on ties.
pub fn bucket_winners(results: &[BenchmarkResult], spec: &BucketSpec) -> Vec<BucketSummary> {
    let mut buckets: BTreeMap<usize, Vec<&BenchmarkResult>> = BTreeMap::new();
    for result in results {
        buckets
            .entry(spec.index_of(result.sparsity))
            .or_default()
            .push(result);
    }

    buckets
        .iter()
        .map(|(&index, group)| {
            let (lower, upper) = spec.bounds(index);
            let samples: HashSet<&str> = group.iter().map(|r| r.sample.as_str()).collect();

            let mut order: Vec<&str> = Vec::new();
            let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
            for r in group {
                let entry = sums.entry(r.method.as_str()).or_insert_with(|| {
                    order.push(r.method.as_str());
                    (0.0, 0)
                });
                entry.0 += r.score;
                entry.1 += 1;
            }

            let mut winner = "";
            let mut winner_mean = f64::NEG_INFINITY;
            for name in &order {
                let (sum, count) = sums[name];
                let mean = sum / count as f64;
                if mean > winner_mean {
                    winner = name;
                    winner_mean = mean;
                }
            }

            BucketSummary {
                lower,
                upper,
                samples: samples.len(),
                winner: winner.to_string(),
                winner_mean_score: winner_mean,
            }
        })
        .collect()
}
