//! # Alignment Module
//!
//! Resamples pairs of spectra onto one shared frequency grid so they can be
//! compared bin by bin. Each source spectrum gets its own linear
//! interpolant, evaluated at the same evenly spaced frequencies.

use once_cell::sync::Lazy;

use crate::error::CompareError;
use crate::interpolate::{LinearInterpolator, linspace};
use crate::spectrum::{Spectrum, SpectrumCollection};

/// Number of points on the shared comparison grid.
pub const GRID_POINTS: usize = 1000;
/// Highest frequency on the grid, in cycles per sample.
pub const GRID_MAX_FREQ: f64 = 0.5;

/// The shared grid, `GRID_POINTS` frequencies spanning [0, 0.5].
pub static FREQUENCY_GRID: Lazy<Vec<f64>> =
    Lazy::new(|| linspace(0.0, GRID_MAX_FREQ, GRID_POINTS));

/// Two power series resampled onto the shared grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub sid: usize,
    pub grid: Vec<f64>,
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}

fn interpolant(
    sid: usize,
    source_name: &'static str,
    spectrum: &Spectrum,
) -> Result<LinearInterpolator, CompareError> {
    LinearInterpolator::new(spectrum.freq(), spectrum.power()).ok_or_else(|| {
        tracing::error!(sid, source = source_name, len = spectrum.len(), "spectrum too short to interpolate");
        CompareError::TooFewPoints {
            index: sid,
            source_name,
            len: spectrum.len(),
        }
    })
}

/// Resamples one pair of spectra onto the shared grid.
///
/// # Arguments
/// * `sid` - Sequence-id of the pair, used in errors
/// * `first` - Spectrum from the first source
/// * `second` - Spectrum from the second source
///
/// # Returns
/// * `Ok(pair)` - Grid and both resampled series, all of equal length
/// * `Err(e)` - A spectrum has fewer than two points, or the resampled
///   shapes disagree
pub fn align_pair(
    sid: usize,
    first: &Spectrum,
    second: &Spectrum,
) -> Result<AlignedPair, CompareError> {
    let f1 = interpolant(sid, "first", first)?;
    let f2 = interpolant(sid, "second", second)?;

    let grid = FREQUENCY_GRID.clone();
    let y1 = f1.eval_many(&grid);
    let y2 = f2.eval_many(&grid);

    if y1.len() != grid.len() || y2.len() != grid.len() {
        tracing::error!(
            sid,
            grid = grid.len(),
            first = y1.len(),
            second = y2.len(),
            "aligned shapes differ"
        );
        return Err(CompareError::ShapeMismatch {
            index: sid,
            grid: grid.len(),
            first: y1.len(),
            second: y2.len(),
        });
    }

    Ok(AlignedPair {
        sid,
        grid,
        first: y1,
        second: y2,
    })
}

/// Number of pairs two collections yield: the shorter collection's length.
pub fn overlap_len(first: &SpectrumCollection, second: &SpectrumCollection) -> usize {
    let short = first.len().min(second.len());
    if first.len() != second.len() {
        tracing::warn!(
            first = first.len(),
            second = second.len(),
            compared = short,
            "collections differ in size, extra spectra are ignored"
        );
    }
    short
}

/// Aligns every overlapping pair of two collections, in sequence-id order.
pub fn align_points(
    first: &SpectrumCollection,
    second: &SpectrumCollection,
) -> Result<Vec<AlignedPair>, CompareError> {
    let short = overlap_len(first, second);
    first
        .iter()
        .zip(second.iter())
        .take(short)
        .enumerate()
        .map(|(sid, (a, b))| align_pair(sid, a, b))
        .collect()
}
