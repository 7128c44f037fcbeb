use serde::{Deserialize, Serialize};

use crate::sample::Sample;

/// Count, moments and quartiles of a sample, in the layout of a dataframe `describe()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>, // sample std; None for a single value
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

pub fn describe(sample: &Sample) -> Describe {
    let mut sorted = sample.values().to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        Some((ss / (n - 1) as f64).sqrt())
    } else {
        None
    };
    Describe {
        count: n,
        mean,
        std,
        min: sorted[0],
        p25: quantile(&sorted, 0.25),
        p50: quantile(&sorted, 0.50),
        p75: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    }
}

/// Linear interpolation between closest ranks; `sorted` must be ascending and non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl Describe {
    /// Rows as printed under a `describe()` call.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("count", format!("{:.6}", self.count as f64)),
            ("mean", format!("{:.6}", self.mean)),
            ("std", self.std.map_or("NaN".into(), |s| format!("{s:.6}"))),
            ("min", format!("{:.6}", self.min)),
            ("25%", format!("{:.6}", self.p25)),
            ("50%", format!("{:.6}", self.p50)),
            ("75%", format!("{:.6}", self.p75)),
            ("max", format!("{:.6}", self.max)),
        ]
    }
}
