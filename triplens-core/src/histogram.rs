use serde::{Deserialize, Serialize};
use triplens_common::{Result, TripLensError};

pub const DEFAULT_BINS: usize = 30;

/// One interval of the partitioned value range. Intervals are `[left, right)`
/// except the last, which also holds `right`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: u64,
    /// `"{left} to {right}"` with both edges truncated toward zero.
    pub interval: String,
    /// Natural log of `count`. `None` when log scale is off or the bin is empty.
    pub log_count: Option<f64>,
}

impl HistogramBin {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramTable {
    pub bins: Vec<HistogramBin>,
    pub log_scale: bool,
}

impl HistogramTable {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistogramBin> {
        self.bins.iter()
    }

    /// Sum of all bin counts.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// `len() + 1` edges, left to right.
    pub fn edges(&self) -> Vec<f64> {
        let mut edges: Vec<f64> = self.bins.iter().map(|b| b.left).collect();
        if let Some(last) = self.bins.last() {
            edges.push(last.right);
        }
        edges
    }

    /// Bar height for a bin: log count on a log table (0 when undefined), raw count otherwise.
    pub fn height(&self, bin: &HistogramBin) -> f64 {
        if self.log_scale {
            bin.log_count.unwrap_or(0.0)
        } else {
            bin.count as f64
        }
    }
}

impl<'a> IntoIterator for &'a HistogramTable {
    type Item = &'a HistogramBin;
    type IntoIter = std::slice::Iter<'a, HistogramBin>;
    fn into_iter(self) -> Self::IntoIter {
        self.bins.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramOptions {
    pub bins: usize,
    pub log_scale: bool,
    /// Explicit `(lo, hi)` range; values outside it are not counted.
    pub range: Option<(f64, f64)>,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            log_scale: false,
            range: None,
        }
    }
}

impl HistogramOptions {
    pub fn new(bins: usize) -> Self {
        Self { bins, ..Self::default() }
    }
    pub fn log_scale(mut self, log_scale: bool) -> Self {
        self.log_scale = log_scale;
        self
    }
    pub fn range(mut self, lo: f64, hi: f64) -> Self {
        self.range = Some((lo, hi));
        self
    }
}

pub fn build_histogram(values: &[f64], bin_count: usize, use_log_scale: bool) -> Result<HistogramTable> {
    build_histogram_with(values, &HistogramOptions::new(bin_count).log_scale(use_log_scale))
}

pub fn build_histogram_with(values: &[f64], opts: &HistogramOptions) -> Result<HistogramTable> {
    if opts.bins == 0 {
        return Err(TripLensError::invalid("bin_count", "must be at least 1"));
    }
    if values.is_empty() {
        return Err(TripLensError::EmptyInput("sample has no values".into()));
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(TripLensError::NonFiniteInput { index, value });
    }
    let (lo, hi) = match opts.range {
        Some((lo, hi)) => {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(TripLensError::invalid("range", format!("bounds must be finite, got ({lo}, {hi})")));
            }
            if lo >= hi {
                return Err(TripLensError::DegenerateRange { lo, hi });
            }
            (lo, hi)
        }
        None => {
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            (min, max)
        }
    };
    let edges = bin_edges(lo, hi, opts.bins)?;
    let mut counts = vec![0u64; opts.bins];
    for &v in values {
        if let Some(idx) = locate(v, &edges) {
            counts[idx] += 1;
        }
    }
    tracing::debug!(bins = opts.bins, lo, hi, n = values.len(), "built histogram");
    let bins = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let (left, right) = (edges[i], edges[i + 1]);
            HistogramBin {
                left,
                right,
                count,
                interval: interval_label(left, right),
                log_count: if opts.log_scale && count > 0 { Some((count as f64).ln()) } else { None },
            }
        })
        .collect();
    Ok(HistogramTable { bins, log_scale: opts.log_scale })
}

/// Equal-width edges over `[lo, hi]`. A zero-width range falls back to bins of width 1
/// starting at `lo`, widened to stay distinct at large magnitudes.
fn bin_edges(lo: f64, hi: f64, bins: usize) -> Result<Vec<f64>> {
    let edges: Vec<f64> = if lo == hi {
        let width = 1f64.max(lo.abs() * f64::EPSILON * 2.0);
        (0..=bins).map(|i| lo + width * i as f64).collect()
    } else {
        let span = hi - lo;
        let mut edges: Vec<f64> = if span.is_finite() {
            (0..=bins).map(|i| lo + span * i as f64 / bins as f64).collect()
        } else {
            // lerp form keeps both terms finite when hi - lo overflows
            (0..=bins)
                .map(|i| {
                    let t = i as f64 / bins as f64;
                    lo * (1.0 - t) + hi * t
                })
                .collect()
        };
        edges[bins] = hi;
        edges
    };
    if edges.iter().any(|e| !e.is_finite()) {
        return Err(TripLensError::invalid("sample", format!("bin edges from {lo} overflow f64")));
    }
    if !edges.windows(2).all(|w| w[0] < w[1]) {
        return Err(TripLensError::invalid(
            "bin_count",
            format!("too many bins ({bins}) for data range [{lo}, {hi}]"),
        ));
    }
    Ok(edges)
}

/// Index of the bin holding `v`, or `None` if it falls outside the edges.
fn locate(v: f64, edges: &[f64]) -> Option<usize> {
    let bins = edges.len() - 1;
    if v < edges[0] || v > edges[bins] {
        return None;
    }
    // edges are strictly increasing; the last bin also holds its right edge
    let idx = edges.partition_point(|&e| e <= v) - 1;
    Some(idx.min(bins - 1))
}

pub fn interval_label(left: f64, right: f64) -> String {
    format!("{} to {}", left.trunc() as i64, right.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(t: &HistogramTable) -> Vec<u64> {
        t.iter().map(|b| b.count).collect()
    }

    #[test]
    fn ten_values_five_bins() {
        let values: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let t = build_histogram(&values, 5, false).unwrap();
        assert_eq!(t.len(), 5);
        assert_eq!(counts(&t), vec![2, 2, 2, 2, 2]);
        let expected = [0.0, 1.8, 3.6, 5.4, 7.2, 9.0];
        for (e, x) in t.edges().iter().zip(expected) {
            assert!((e - x).abs() < 1e-12, "{e} vs {x}");
        }
        for b in &t {
            assert!((b.width() - 1.8).abs() < 1e-12);
        }
    }

    #[test]
    fn labels_truncate_edges() {
        let values: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let t = build_histogram(&values, 5, false).unwrap();
        let labels: Vec<&str> = t.iter().map(|b| b.interval.as_str()).collect();
        assert_eq!(labels, vec!["0 to 1", "1 to 3", "3 to 5", "5 to 7", "7 to 9"]);
    }

    #[test]
    fn negative_edges_truncate_toward_zero() {
        assert_eq!(interval_label(-2.7, -0.4), "-2 to 0");
    }

    #[test]
    fn repeated_value_no_division_by_zero() {
        let t = build_histogram(&[5.0, 5.0, 5.0], 3, false).unwrap();
        assert_eq!(counts(&t), vec![3, 0, 0]);
        assert_eq!(t.edges(), vec![5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn single_value_single_bin() {
        let t = build_histogram(&[42.5], 1, false).unwrap();
        assert_eq!(counts(&t), vec![1]);
    }

    #[test]
    fn interior_boundary_goes_right() {
        // edges 0, 1, 2; value 1.0 sits on the interior edge
        let t = build_histogram(&[0.0, 1.0, 2.0], 2, false).unwrap();
        assert_eq!(counts(&t), vec![1, 2]);
    }

    #[test]
    fn max_lands_in_last_bin() {
        let t = build_histogram(&[0.0, 0.1, 0.2, 10.0], 4, false).unwrap();
        assert_eq!(t.bins[3].count, 1);
        assert_eq!(t.bins[3].right, 10.0);
        assert_eq!(t.bins[0].left, 0.0);
    }

    #[test]
    fn counts_sum_and_edges_contiguous() {
        let values: Vec<f64> = (0..997).map(|i| ((i * 7919) % 1013) as f64 * 0.37 - 50.0).collect();
        for bins in [1, 2, 3, 7, 30, 101] {
            let t = build_histogram(&values, bins, false).unwrap();
            assert_eq!(t.len(), bins);
            assert_eq!(t.total(), values.len() as u64);
            for w in t.bins.windows(2) {
                assert_eq!(w[0].right, w[1].left);
                assert!(w[0].left < w[0].right);
            }
        }
    }

    #[test]
    fn same_input_same_output() {
        let values = [3.2, 1.0, 8.5, 8.5, -4.0];
        let a = build_histogram(&values, 4, true).unwrap();
        let b = build_histogram(&values, 4, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_bins_rejected() {
        let err = build_histogram(&[1.0, 2.0], 0, false).unwrap_err();
        assert!(matches!(err, TripLensError::InvalidParameter { name: "bin_count", .. }));
    }

    #[test]
    fn empty_rejected() {
        assert!(matches!(build_histogram(&[], 30, false), Err(TripLensError::EmptyInput(_))));
    }

    #[test]
    fn nan_rejected_with_index() {
        let err = build_histogram(&[1.0, f64::NAN, 2.0], 3, false).unwrap_err();
        assert!(matches!(err, TripLensError::NonFiniteInput { index: 1, .. }));
        let err = build_histogram(&[f64::INFINITY], 3, false).unwrap_err();
        assert!(matches!(err, TripLensError::NonFiniteInput { index: 0, .. }));
    }

    #[test]
    fn log_scale_marks_empty_bins_undefined() {
        let t = build_histogram(&[0.0, 0.0, 0.0, 10.0], 3, true).unwrap();
        assert!(t.log_scale);
        assert_eq!(t.bins[0].log_count, Some(3f64.ln()));
        assert_eq!(t.bins[1].log_count, None);
        assert_eq!(t.bins[2].log_count, Some(0.0));
        assert_eq!(t.height(&t.bins[1]), 0.0);
    }

    #[test]
    fn no_log_without_flag() {
        let t = build_histogram(&[0.0, 1.0], 2, false).unwrap();
        assert!(t.iter().all(|b| b.log_count.is_none()));
        assert_eq!(t.height(&t.bins[0]), 1.0);
    }

    #[test]
    fn explicit_range_drops_outliers() {
        let opts = HistogramOptions::new(2).range(0.0, 4.0);
        let t = build_histogram_with(&[-1.0, 0.0, 1.0, 3.0, 4.0, 9.0], &opts).unwrap();
        assert_eq!(counts(&t), vec![2, 2]);
        assert_eq!(t.edges(), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn explicit_range_must_be_ordered() {
        let opts = HistogramOptions::new(2).range(3.0, 3.0);
        let err = build_histogram_with(&[3.0], &opts).unwrap_err();
        assert!(matches!(err, TripLensError::DegenerateRange { .. }));
        let opts = HistogramOptions::new(2).range(0.0, f64::NAN);
        assert!(matches!(build_histogram_with(&[3.0], &opts), Err(TripLensError::InvalidParameter { .. })));
    }

    #[test]
    fn full_f64_range_is_binned() {
        let t = build_histogram(&[-f64::MAX, 0.0, f64::MAX], 2, false).unwrap();
        assert_eq!(t.edges(), vec![-f64::MAX, 0.0, f64::MAX]);
        assert_eq!(counts(&t), vec![1, 2]);
    }

    #[test]
    fn repeated_large_value_keeps_distinct_edges() {
        let t = build_histogram(&[1e17, 1e17, 1e17], 3, false).unwrap();
        assert_eq!(counts(&t), vec![3, 0, 0]);
        assert_eq!(t.bins[0].left, 1e17);
        assert!(t.iter().all(|b| b.left < b.right));
        let t = build_histogram(&[-1e17; 4], 2, false).unwrap();
        assert_eq!(counts(&t), vec![4, 0]);
    }

    #[test]
    fn too_many_bins_for_narrow_range() {
        let values = [1e16, 1e16 + 2.0, 1e16 + 4.0];
        let err = build_histogram(&values, 30, false).unwrap_err();
        assert!(matches!(err, TripLensError::InvalidParameter { name: "bin_count", .. }));
        let t = build_histogram(&values, 2, false).unwrap();
        assert_eq!(t.edges(), vec![1e16, 1e16 + 2.0, 1e16 + 4.0]);
        assert_eq!(counts(&t), vec![1, 2]);
    }
}
