/// Time budget in seconds: a run whose compress+decompress time reaches
/// this scores zero no matter how well it compressed.
pub const SCORE_TIME_BUDGET: f64 = 1.012;

/// Combined ratio/time score in [0, 1].
///
/// `ratio` is compressed/original size, `total_time` is compress plus
/// decompress seconds. Each factor is floored at zero before multiplying,
/// so ratio ≥ 1 or time ≥ budget forces exactly 0 on its own; two
/// overruns must never multiply back into a positive score.
pub fn score(ratio: f64, total_time: f64) -> f64 {
    let size_factor = (1.0 - ratio).max(0.0);
    let time_factor = (1.0 - total_time / SCORE_TIME_BUDGET).max(0.0);
    (size_factor * time_factor).clamp(0.0, 1.0)
}
