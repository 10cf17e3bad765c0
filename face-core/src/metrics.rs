//! # Similarity Metrics Module
//!
//! The four statistics computed between two aligned power series.
//!
//! ## Metrics
//! - **Spectral Overlap**: area under the lower envelope over area under
//!   the upper envelope, rounded to 4 decimals
//! - **Pearson correlation**: linear correlation, with a repair step for
//!   series that disagree on how many finite values they hold
//! - **Spectral Angle Mapper**: angle between the two series as vectors,
//!   divided by pi
//! - **Spearman correlation**: Pearson correlation of average-tie ranks
//!
//! Spectral Overlap, the angle mapper and Spearman let non-finite results
//! through untouched. Pearson fails loudly instead.

use serde::{Deserialize, Serialize};

use crate::error::CompareError;

/// Both envelope integrals and their rounded ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapAreas {
    /// Integral of the element-wise minimum envelope.
    pub floor: f64,
    /// Integral of the element-wise maximum envelope.
    pub roof: f64,
    /// `floor / roof`, rounded to 4 decimals.
    pub so: f64,
}

/// Trapezoidal integral of `y` over the sample points `x`.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (xw[1] - xw[0]) * (yw[0] + yw[1]) / 2.0)
        .sum()
}

/// Rounds to 4 decimals, sending ties to the even digit.
pub fn round4(value: f64) -> f64 {
    (value * 1e4).round_ties_even() / 1e4
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) }
}

/// Computes the Spectral Overlap of two series sampled on `grid`.
///
/// Both series are taken in absolute value first, so the result lies in
/// [0, 1] for finite input; 1 means identical spectra.
pub fn spectral_overlap(grid: &[f64], first: &[f64], second: &[f64]) -> OverlapAreas {
    let (lower, upper): (Vec<f64>, Vec<f64>) = first
        .iter()
        .zip(second)
        .map(|(a, b)| {
            let (a, b) = (a.abs(), b.abs());
            (nan_min(a, b), nan_max(a, b))
        })
        .unzip();
    let floor = trapezoid(&lower, grid);
    let roof = trapezoid(&upper, grid);
    OverlapAreas {
        floor,
        roof,
        so: round4(floor / roof),
    }
}

/// Replaces problem positions in both series with per-series means.
///
/// The masked positions are the maximum of `first` plus every non-finite
/// entry of `first`. A NaN counts as the maximum, so when `first` holds one
/// the first NaN is picked and the largest finite value stays in place. Each series' mean over the unmasked positions is
/// written into every masked position of that series. The inputs are left
/// untouched.
pub fn repair_non_finite(first: &[f64], second: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut mask: Vec<bool> = first.iter().map(|v| !v.is_finite()).collect();
    let argmax = first.iter().position(|v| v.is_nan()).or_else(|| {
        first
            .iter()
            .enumerate()
            .fold(None::<(usize, f64)>, |best, (i, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i)
    });
    if let Some(i) = argmax {
        mask[i] = true;
    }

    let masked_mean = |series: &[f64]| {
        let (sum, count) = series
            .iter()
            .zip(&mask)
            .filter(|(_, m)| !**m)
            .fold((0.0, 0usize), |(s, c), (v, _)| (s + v, c + 1));
        sum / count as f64
    };
    let fill = |series: &[f64], mean: f64| -> Vec<f64> {
        series
            .iter()
            .zip(&mask)
            .map(|(&v, &m)| if m { mean } else { v })
            .collect()
    };

    let (mean1, mean2) = (masked_mean(first), masked_mean(second));
    (fill(first, mean1), fill(second, mean2))
}

fn finite_count(series: &[f64]) -> usize {
    series.iter().filter(|v| v.is_finite()).count()
}

/// Plain Pearson coefficient; `None` when either series has zero variance.
fn correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Pearson correlation between two aligned series.
///
/// # Arguments
/// * `sid` - Sequence-id of the pair, used in errors
/// * `first`, `second` - Aligned series of equal length
///
/// # Returns
/// * `Ok(r)` - The coefficient. Identical constant series count as
///   perfectly correlated.
/// * `Err(e)` - Non-finite values survive the repair step, or a series
///   has zero variance
pub fn pearson(sid: usize, first: &[f64], second: &[f64]) -> Result<f64, CompareError> {
    let repaired;
    let (x, y) = if finite_count(first) != finite_count(second) {
        repaired = repair_non_finite(first, second);
        if repaired.0.iter().chain(&repaired.1).any(|v| !v.is_finite()) {
            tracing::error!(sid, "non-finite values remain after Pearson repair");
            return Err(CompareError::NonFiniteAfterRepair { index: sid });
        }
        (repaired.0.as_slice(), repaired.1.as_slice())
    } else {
        (first, second)
    };

    match correlation(x, y) {
        Some(r) => Ok(r),
        None if x == y => Ok(1.0),
        None => {
            tracing::error!(
                sid,
                first = x.len(),
                second = y.len(),
                "Pearson correlation undefined for zero-variance input"
            );
            Err(CompareError::ZeroVariance {
                index: sid,
                first: x.len(),
                second: y.len(),
            })
        }
    }
}

/// Spectral Angle Mapper: `acos(<a/|a|, b/|b|>) / pi`.
///
/// A zero-norm series yields NaN.
pub fn spectral_angle(first: &[f64], second: &[f64]) -> f64 {
    let norm = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>().sqrt();
    let (n1, n2) = (norm(first), norm(second));
    let dot: f64 = first
        .iter()
        .zip(second)
        .map(|(a, b)| (a / n1) * (b / n2))
        .sum();
    // rounding can push the dot product of parallel vectors just past 1
    dot.clamp(-1.0, 1.0).acos() / std::f64::consts::PI
}

/// 1-based ranks, ties sharing the average of the positions they span.
pub fn rankdata(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }
    ranks
}

/// Spearman rank correlation. NaN input or a constant series gives NaN,
/// except that identical series count as perfectly correlated.
pub fn spearman(first: &[f64], second: &[f64]) -> f64 {
    if first.iter().chain(second).any(|v| v.is_nan()) {
        return f64::NAN;
    }
    match correlation(&rankdata(first), &rankdata(second)) {
        Some(r) => r,
        None if first == second => 1.0,
        None => f64::NAN,
    }
}
