//! Ordinary least squares for scatter trend lines.
//!
//! The trend overlay is the simple regression `y = a + b·x`. We build the
//! two-column design matrix `[1, x]` and solve it with SVD so that degenerate
//! inputs (a single distinct x) are reported instead of producing NaNs.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// Fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    pub n: usize,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit a straight line through `(x, y)` pairs. Non-finite pairs are skipped.
///
/// Needs at least two distinct x values.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LineFit> {
    let finite: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    let n = finite.len();
    if n < 2 {
        return None;
    }

    let x0 = finite[0].0;
    if finite.iter().all(|(x, _)| (x - x0).abs() < 1e-12) {
        return None;
    }

    let design = DMatrix::from_fn(n, 2, |r, c| if c == 0 { 1.0 } else { finite[r].0 });
    let y = DVector::from_iterator(n, finite.iter().map(|p| p.1));
    let beta = solve_least_squares(&design, &y)?;
    let (intercept, slope) = (beta[0], beta[1]);

    let mean_y = y.mean();
    let ss_tot: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
    let ss_res: f64 = finite
        .iter()
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();
    // A flat response is explained perfectly by a flat line.
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    Some(LineFit {
        intercept,
        slope,
        r_squared,
        n,
    })
}
