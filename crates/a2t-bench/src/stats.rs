//! Sample statistics over millisecond timings.

use serde::Serialize;

/// Arithmetic mean; 0 for an empty sample.
pub fn mean(samples: &[u64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation (n - 1 denominator); 0 for fewer than two samples.
pub fn stdev(samples: &[u64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    let variance = samples
        .iter()
        .map(|&s| {
            let d = s as f64 - m;
            d * d
        })
        .sum::<f64>()
        / (samples.len() - 1) as f64;
    variance.sqrt()
}

/// Element-wise sum of two series.
///
/// An empty side yields the other unchanged; otherwise the result is as long
/// as the shorter series.
pub fn sum_series(a: &[u64], b: &[u64]) -> Vec<u64> {
    if a.is_empty() {
        return b.to_vec();
    }
    if b.is_empty() {
        return a.to_vec();
    }
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

/// Mean and standard deviation of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub samples: Vec<u64>,
    pub mean: f64,
    pub stdev: f64,
}

impl Summary {
    pub fn from_samples(samples: &[u64]) -> Self {
        Self {
            samples: samples.to_vec(),
            mean: mean(samples),
            stdev: stdev(samples),
        }
    }

    /// `mean ± stdev`, rounded to whole milliseconds.
    pub fn format_mean_stdev(&self) -> String {
        format!("{:.0} ± {:.0}", self.mean, self.stdev)
    }
}
