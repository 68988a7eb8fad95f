// src/latency.rs - Percentile over a small set of request timings

use std::time::Duration;

/// Approximate 95th percentile of `samples`.
///
/// Sorted ascending, the sample at `floor(n * 0.95) - 1` is taken; when that
/// index falls outside the samples the slowest one is used instead.
pub fn p95(samples: &[Duration]) -> Option<Duration> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort();

    let index = (sorted.len() as f64 * 0.95).floor() as i64 - 1;
    match usize::try_from(index).ok().and_then(|i| sorted.get(i)) {
        Some(sample) => Some(*sample),
        None => sorted.last().copied(),
    }
}
