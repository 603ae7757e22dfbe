//! Small descriptive statistics used by the chart builders.

use serde::Serialize;

/// Linear-interpolation quantile of already sorted data (`q` in `[0, 1]`).
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Box-and-whisker summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiveNumber {
    pub n: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Furthest data points within 1.5·IQR of the box.
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

pub fn five_number(values: &[f64]) -> Option<FiveNumber> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let inside = sorted.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
    let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
    let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Some(FiveNumber {
        n: sorted.len(),
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Equal-width bin edges over the finite range of `values`.
///
/// A zero-width range is widened by half a unit on each side.
pub fn bin_edges(values: &[f64], bins: usize) -> Option<Vec<f64>> {
    let bins = bins.max(1);
    let (mut lo, mut hi) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    if hi - lo < 1e-12 {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);
    Some(edges)
}

/// Index of the bin containing `v`; the last bin is closed on the right.
pub fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    if edges.len() < 2 || !v.is_finite() {
        return None;
    }
    let lo = edges[0];
    let hi = edges[edges.len() - 1];
    if v < lo || v > hi {
        return None;
    }
    let bins = edges.len() - 1;
    let idx = edges.partition_point(|e| *e <= v).saturating_sub(1);
    Some(idx.min(bins - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile_sorted(&v, 0.25).unwrap(), 1.75);
        assert_relative_eq!(quantile_sorted(&v, 0.5).unwrap(), 2.5);
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn five_number_flags_outliers() {
        let s = five_number(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(s.median, 3.0);
        assert_eq!(s.outliers, vec![100.0]);
        assert_eq!(s.upper_whisker, 4.0);
        assert_eq!(s.lower_whisker, 1.0);
        assert_eq!(s.max, 100.0);
    }

    #[test]
    fn bins_cover_range_and_close_last_edge() {
        let edges = bin_edges(&[0.0, 10.0], 5).unwrap();
        assert_eq!(edges.len(), 6);
        assert_eq!(bin_index(&edges, 0.0), Some(0));
        assert_eq!(bin_index(&edges, 2.0), Some(1));
        assert_eq!(bin_index(&edges, 10.0), Some(4));
        assert_eq!(bin_index(&edges, 10.5), None);
    }

    #[test]
    fn constant_values_get_a_unit_wide_range() {
        let edges = bin_edges(&[3.0, 3.0], 2).unwrap();
        assert_eq!(edges, vec![2.5, 3.0, 3.5]);
        assert_eq!(bin_index(&edges, 3.0), Some(1));
    }
}
