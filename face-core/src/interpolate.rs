//! Piecewise-linear interpolation with linear extrapolation at both ends.

/// A continuous interpolant over a set of (x, y) points.
///
/// Points are sorted by `x` on construction. Queries outside the observed
/// range extend the first or last segment. Two points sharing an `x` form
/// a zero-width segment whose slope is not finite, so queries that land
/// on it evaluate to NaN or infinity rather than failing.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Builds the interpolant.
    ///
    /// # Returns
    /// * `None` if fewer than two points are given or the lengths differ
    pub fn new(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() < 2 || xs.len() != ys.len() {
            return None;
        }
        let mut order: Vec<usize> = (0..xs.len()).collect();
        order.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));
        Some(Self {
            xs: order.iter().map(|&i| xs[i]).collect(),
            ys: order.iter().map(|&i| ys[i]).collect(),
        })
    }

    /// Evaluates the interpolant at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        // first index with xs[idx] >= x, clamped so a segment always exists
        let idx = self.xs.partition_point(|&v| v < x).clamp(1, n - 1);
        let (x_lo, x_hi) = (self.xs[idx - 1], self.xs[idx]);
        let (y_lo, y_hi) = (self.ys[idx - 1], self.ys[idx]);
        let slope = (y_hi - y_lo) / (x_hi - x_lo);
        slope * (x - x_lo) + y_lo
    }

    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}

/// `n` evenly spaced points from `start` to `stop`, both inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            points[n - 1] = stop;
            points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn interpolates_inside_range() {
        let f = LinearInterpolator::new(&[0.0, 0.1, 0.2], &[1.0, 3.0, 2.0]).unwrap();
        assert_abs_diff_eq!(f.eval(0.05), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.eval(0.15), 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(f.eval(0.1), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn extrapolates_both_ends_linearly() {
        let f = LinearInterpolator::new(&[0.1, 0.2, 0.3], &[1.0, 2.0, 2.5]).unwrap();
        assert_abs_diff_eq!(f.eval(0.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.eval(0.5), 3.5, epsilon = 1e-12);
    }

    #[test]
    fn unsorted_points_are_sorted() {
        let f = LinearInterpolator::new(&[0.2, 0.0, 0.1], &[4.0, 0.0, 2.0]).unwrap();
        assert_abs_diff_eq!(f.eval(0.15), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn duplicate_abscissa_gives_non_finite_values() {
        let f = LinearInterpolator::new(&[0.0, 0.0, 0.1], &[1.0, 2.0, 3.0]).unwrap();
        assert!(!f.eval(0.0).is_finite());
        assert_abs_diff_eq!(f.eval(0.05), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn needs_two_points() {
        assert!(LinearInterpolator::new(&[0.0], &[1.0]).is_none());
        assert!(LinearInterpolator::new(&[0.0, 0.1], &[1.0]).is_none());
    }

    #[test]
    fn linspace_includes_endpoints() {
        let grid = linspace(0.0, 0.5, 1000);
        assert_eq!(grid.len(), 1000);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[999], 0.5);
        assert_abs_diff_eq!(grid[1] - grid[0], 0.5 / 999.0, epsilon = 1e-15);
    }
}
