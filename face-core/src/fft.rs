//! # Fast Fourier Transform (FFT) Module
//!
//! This module provides the FFT building blocks for spectral analysis of
//! score sequences. It handles forward transforms of arbitrary length,
//! DFT frequency axes, frequency shifting and component extraction.
//!
//! ## Features
//! - Forward FFT of any length using RustFFT
//! - Normalized DFT sample frequencies and zero-centred shifting
//! - Constant detrending and Hann windowing for the periodogram
//! - Magnitude, real or imaginary component extraction

use rustfft::{FftPlanner, num_complex::Complex};

use crate::config::PowerValue;

/// Removes the DC offset from a signal by making its average value zero.
///
/// # Arguments
/// * `signal` - Signal to process (modified in-place)
pub(crate) fn remove_dc_offset(signal: &mut [f64]) {
    let len = signal.len();
    if len == 0 {
        return;
    }
    let avg = signal.iter().sum::<f64>() / len as f64;
    for sample in signal.iter_mut() {
        *sample -= avg;
    }
}

/// Applies a periodic Hann window to the buffer and returns the sum of the
/// squared window weights.
///
/// The periodic form divides by `n` rather than `n - 1`, so the window
/// tiles exactly over one DFT frame.
///
/// # Arguments
/// * `buffer` - Signal to window (modified in-place)
pub(crate) fn apply_hann_window(buffer: &mut [f64]) -> f64 {
    let n = buffer.len();
    if n == 0 {
        return 0.0;
    }
    let mut energy = 0.0;
    for (i, sample) in buffer.iter_mut().enumerate() {
        let multiplier =
            0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / n as f64).cos());
        *sample *= multiplier;
        energy += multiplier * multiplier;
    }
    energy
}

/// Performs an unnormalized forward FFT on a real signal.
///
/// # Arguments
/// * `signal` - Input signal of any length
///
/// # Returns
/// * `Vec<Complex<f64>>` - Complex spectrum with `signal.len()` bins
pub fn perform_fft(signal: &[f64]) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .map(|&sample| Complex { re: sample, im: 0.0 })
        .collect();
    if buffer.is_empty() {
        return buffer;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);
    buffer
}

/// Sample frequencies of an `n`-point DFT in cycles per sample.
///
/// Non-negative frequencies come first, followed by the negative ones,
/// matching the bin order of `perform_fft`.
pub fn fftfreq(n: usize) -> Vec<f64> {
    let positive = n.div_ceil(2);
    (0..n)
        .map(|i| {
            let k = if i < positive {
                i as f64
            } else {
                i as f64 - n as f64
            };
            k / n as f64
        })
        .collect()
}

/// Rotates a spectrum so the zero-frequency bin sits in the middle.
pub fn fftshift<T: Copy>(values: &[T]) -> Vec<T> {
    let n = values.len();
    let shift = n / 2;
    (0..n).map(|j| values[(j + n - shift) % n]).collect()
}

/// Extracts the requested component from each complex bin.
///
/// # Arguments
/// * `spectrum` - Complex bins from `perform_fft`
/// * `value` - Which component to report
pub fn spectrum_component(spectrum: &[Complex<f64>], value: PowerValue) -> Vec<f64> {
    spectrum
        .iter()
        .map(|c| match value {
            PowerValue::Norm => c.norm(), // .norm() is sqrt(re^2 + im^2)
            PowerValue::Real => c.re,
            PowerValue::Imag => c.im,
        })
        .collect()
}

/// Computes the non-negative half of a zero-centred DFT spectrum.
///
/// The transform is shifted so frequency 0 is centred, then only the
/// upper half (indices `n/2..n`) is kept. The result has `ceil(n/2)`
/// bins with frequencies in `[0, 0.5)`.
///
/// # Returns
/// * `(freqs, powers)` - Frequency axis and selected component
pub fn fft_half_spectrum(signal: &[f64], value: PowerValue) -> (Vec<f64>, Vec<f64>) {
    let n = signal.len();
    let freqs = fftshift(&fftfreq(n));
    let bins = fftshift(&perform_fft(signal));
    let powers = spectrum_component(&bins, value);
    let mid = n / 2;
    (freqs[mid..].to_vec(), powers[mid..].to_vec())
}
