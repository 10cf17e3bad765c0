//! # Periodogram Module
//!
//! One-sided power spectral density estimate over a whole sequence, with
//! unit sampling frequency so the axis reads in cycles per sample.

use crate::config::Window;
use crate::fft::{apply_hann_window, perform_fft, remove_dc_offset};

/// Estimates the power spectral density of `signal`.
///
/// The signal is detrended by its mean, tapered by `window`, transformed,
/// and scaled to a density. Every bin except DC (and the Nyquist bin for
/// even lengths) is doubled to fold the negative frequencies in.
///
/// # Returns
/// * `(freqs, powers)` - `n/2 + 1` bins at frequencies `k/n`
pub fn periodogram(signal: &[f64], window: Window) -> (Vec<f64>, Vec<f64>) {
    let n = signal.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut buffer = signal.to_vec();
    remove_dc_offset(&mut buffer);
    let window_energy = match window {
        Window::Boxcar => n as f64,
        Window::Hann => apply_hann_window(&mut buffer),
    };

    let bins = n / 2 + 1;
    let spectrum = perform_fft(&buffer);
    let freqs = (0..bins).map(|k| k as f64 / n as f64).collect();
    let mut powers: Vec<f64> = spectrum[..bins]
        .iter()
        .map(|c| c.norm_sqr() / window_energy)
        .collect();

    let last_doubled = if n % 2 == 0 { bins - 1 } else { bins };
    for p in powers.iter_mut().take(last_doubled).skip(1) {
        *p *= 2.0;
    }
    (freqs, powers)
}
