//! # Spectral Transform Module
//!
//! This module turns score sequences into spectra. Each sequence is
//! normalized, transformed with the configured method and appended to a
//! flat frequency/power table in corpus order.
//!
//! ## Features
//! - `fft` and `periodogram` methods behind one entry point
//! - Corpus statistics computed once per batch for `corpus-zscore`
//! - Optional sequence-id tagging of output rows
//! - Malformed sequences abort the batch with the offending index and values

use crate::config::{Method, Preprocess, TransformConfig};
use crate::error::TransformError;
use crate::fft::fft_half_spectrum;
use crate::periodogram::periodogram;
use crate::preprocess::{self, CorpusStats};
use crate::spectrum::{Spectrum, SpectrumTable};

/// Shortest sequence either method can turn into a spectrum.
pub const MIN_SEQUENCE_LEN: usize = 2;

/// The spectral transform engine.
#[derive(Debug, Clone, Default)]
pub struct SpectralTransform {
    config: TransformConfig,
}

impl SpectralTransform {
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transforms a single sequence, reported as sequence 0 on failure.
    pub fn transform(&self, values: &[f64]) -> Result<Spectrum, TransformError> {
        self.transform_sequence(0, values, self.config.corpus.as_ref())
    }

    /// Transforms one sequence of a batch.
    ///
    /// # Arguments
    /// * `index` - Position of the sequence in its corpus, used in errors
    /// * `values` - Raw scores
    /// * `corpus` - Corpus statistics for `corpus-zscore`
    pub fn transform_sequence(
        &self,
        index: usize,
        values: &[f64],
        corpus: Option<&CorpusStats>,
    ) -> Result<Spectrum, TransformError> {
        if values.len() < MIN_SEQUENCE_LEN {
            return Err(malformed(index, values, "needs at least two values"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(malformed(index, values, "contains non-finite values"));
        }

        let normalized = preprocess::apply(values, self.config.preprocess, corpus);
        if normalized.iter().any(|v| !v.is_finite()) {
            return Err(malformed(
                index,
                values,
                "preprocessing produced non-finite values",
            ));
        }

        let (freq, power) = match self.config.method {
            Method::Fft => fft_half_spectrum(&normalized, self.config.value),
            Method::Periodogram => periodogram(&normalized, self.config.window),
        };
        Ok(Spectrum::new(freq, power))
    }

    /// Transforms every sequence into one flat table.
    pub fn process<S: AsRef<[f64]>>(&self, data: &[S]) -> Result<SpectrumTable, TransformError> {
        self.process_with_progress(data, |_| {})
    }

    /// Like [`process`](Self::process), calling `on_sequence` with the index
    /// of each sequence once it has been transformed.
    pub fn process_with_progress<S, F>(
        &self,
        data: &[S],
        mut on_sequence: F,
    ) -> Result<SpectrumTable, TransformError>
    where
        S: AsRef<[f64]>,
        F: FnMut(usize),
    {
        let corpus = self.corpus_stats(data);
        let mut table = SpectrumTable::new(self.config.require_sid);

        for (index, sequence) in data.iter().enumerate() {
            let spectrum = self.transform_sequence(index, sequence.as_ref(), corpus.as_ref())?;
            tracing::debug!(
                sid = index,
                tokens = sequence.as_ref().len(),
                bins = spectrum.len(),
                "transformed sequence"
            );
            table.push_spectrum(index, &spectrum);
            on_sequence(index);
        }

        tracing::info!(
            sequences = data.len(),
            rows = table.len(),
            method = %self.config.method,
            preprocess = %self.config.preprocess,
            "spectral transform finished"
        );
        Ok(table)
    }

    fn corpus_stats<S: AsRef<[f64]>>(&self, data: &[S]) -> Option<CorpusStats> {
        if self.config.preprocess != Preprocess::CorpusZscore {
            return self.config.corpus;
        }
        match self.config.corpus {
            Some(stats) => Some(stats),
            None => {
                let stats = CorpusStats::from_sequences(data);
                if let Some(stats) = &stats {
                    tracing::debug!(mean = stats.mean, std = stats.std, "computed corpus statistics");
                }
                stats
            }
        }
    }
}

fn malformed(index: usize, values: &[f64], reason: &'static str) -> TransformError {
    tracing::error!(sid = index, values = ?values, reason, "error in sample");
    TransformError::MalformedInput {
        index,
        values: values.to_vec(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PowerValue, Window};
    use approx::assert_abs_diff_eq;

    fn fft_config(preprocess: Preprocess, value: PowerValue) -> TransformConfig {
        TransformConfig {
            method: Method::Fft,
            preprocess,
            value,
            ..TransformConfig::default()
        }
    }

    #[test]
    fn alternation_fft_has_four_bins_with_dc_energy() {
        let engine = SpectralTransform::new(fft_config(Preprocess::None, PowerValue::Norm));
        let spectrum = engine
            .transform(&[1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0])
            .unwrap();
        assert_eq!(spectrum.freq(), &[0.0, 0.125, 0.25, 0.375]);
        assert_abs_diff_eq!(spectrum.power()[0], 12.0, epsilon = 1e-12);
        for p in &spectrum.power()[1..] {
            assert_abs_diff_eq!(*p, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn quarter_period_signal_peaks_at_quarter_frequency() {
        let engine = SpectralTransform::new(fft_config(Preprocess::Zscore, PowerValue::Norm));
        let spectrum = engine
            .transform(&[1.0, 2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 0.0])
            .unwrap();
        assert_eq!(spectrum.peak_frequency(), Some(0.25));
    }

    #[test]
    fn periodogram_detects_period_two() {
        let engine = SpectralTransform::new(TransformConfig {
            method: Method::Periodogram,
            window: Window::Boxcar,
            ..TransformConfig::default()
        });
        let spectrum = engine
            .transform(&[1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0])
            .unwrap();
        assert_eq!(spectrum.len(), 5);
        assert_eq!(spectrum.peak_frequency(), Some(0.5));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let engine = SpectralTransform::new(fft_config(Preprocess::Logzs, PowerValue::Real));
        let data = vec![vec![3.2, 0.1, 4.7, 2.2, 0.9], vec![1.1, 6.0, 0.3]];
        let first = engine.process(&data).unwrap();
        let second = engine.process(&data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn batch_tags_rows_with_sequence_ids() {
        let engine = SpectralTransform::new(TransformConfig::default());
        let data = vec![vec![1.0, 2.0, 3.0, 4.0], vec![0.5, 0.25, 0.125]];
        let mut seen = Vec::new();
        let table = engine
            .process_with_progress(&data, |i| seen.push(i))
            .unwrap();
        assert_eq!(seen, vec![0, 1]);
        assert_eq!(table.sid.as_deref(), Some(&[0, 0, 1, 1][..]));
        assert_eq!(table.freq.len(), 4);
    }

    #[test]
    fn batch_without_sid_omits_column() {
        let engine = SpectralTransform::new(TransformConfig {
            require_sid: false,
            ..TransformConfig::default()
        });
        let table = engine.process(&[vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(table.sid.is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn short_sequence_aborts_batch_with_index() {
        let engine = SpectralTransform::new(TransformConfig::default());
        let data = vec![vec![1.0, 2.0], vec![3.0]];
        match engine.process(&data).unwrap_err() {
            TransformError::MalformedInput { index, values, .. } => {
                assert_eq!(index, 1);
                assert_eq!(values, vec![3.0]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let engine = SpectralTransform::new(TransformConfig::default());
        let err = engine.transform(&[1.0, f64::NAN, 2.0]).unwrap_err();
        assert!(matches!(err, TransformError::MalformedInput { index: 0, .. }));
    }

    #[test]
    fn corpus_zscore_uses_batch_statistics() {
        let engine = SpectralTransform::new(fft_config(Preprocess::CorpusZscore, PowerValue::Real));
        let data = vec![vec![1.0, 3.0], vec![5.0, 7.0]];
        let table = engine.process(&data).unwrap();
        // DC bin of the first sequence: (1 - 4)/std + (3 - 4)/std
        let std = 5.0_f64.sqrt() + crate::preprocess::ZSCORE_EPSILON;
        assert_abs_diff_eq!(table.power[0], -4.0 / std, epsilon = 1e-9);
    }
}
