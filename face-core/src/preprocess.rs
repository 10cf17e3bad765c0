//! # Preprocessing Module
//!
//! Per-sequence normalization applied before the spectral transform, and
//! the corpus-wide statistics used by `corpus-zscore`.
//!
//! ## Features
//! - Z-score with an epsilon-stabilized denominator
//! - Min-max rescaling to [0, 1]
//! - `ln(x + 1)` compression, optionally followed by z-score
//! - Corpus statistics computed once and passed around by value

use serde::{Deserialize, Serialize};

use crate::config::Preprocess;

/// Added to every standard deviation before dividing by it.
pub const ZSCORE_EPSILON: f64 = 1e-6;

/// Mean and population standard deviation over every value of a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub mean: f64,
    pub std: f64,
}

impl CorpusStats {
    /// Computes the statistics over all values of all sequences.
    ///
    /// # Returns
    /// * `None` if the corpus holds no values at all
    pub fn from_sequences<S: AsRef<[f64]>>(sequences: &[S]) -> Option<Self> {
        let count: usize = sequences.iter().map(|s| s.as_ref().len()).sum();
        if count == 0 {
            return None;
        }
        let sum: f64 = sequences.iter().flat_map(|s| s.as_ref()).sum();
        let mean = sum / count as f64;
        let sq: f64 = sequences
            .iter()
            .flat_map(|s| s.as_ref())
            .map(|v| (v - mean) * (v - mean))
            .sum();
        Some(Self {
            mean,
            std: (sq / count as f64).sqrt(),
        })
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`).
pub(crate) fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64).sqrt()
}

fn zscore(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let denom = population_std(values) + ZSCORE_EPSILON;
    values.iter().map(|v| (v - m) / denom).collect()
}

fn minmax(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range == 0.0 {
        // Constant sequence: every value sits at the bottom of the range.
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

fn log1p(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| (v + 1.0).ln()).collect()
}

/// Applies `method` to one sequence, returning a new vector.
///
/// # Arguments
/// * `values` - Raw score sequence (left untouched)
/// * `method` - Normalization to apply
/// * `corpus` - Corpus statistics, read only by `Preprocess::CorpusZscore`
///
/// # Returns
/// * The normalized sequence. `CorpusZscore` without statistics falls back
///   to the sequence's own mean and deviation.
pub fn apply(values: &[f64], method: Preprocess, corpus: Option<&CorpusStats>) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    match method {
        Preprocess::None => values.to_vec(),
        Preprocess::Zscore => zscore(values),
        Preprocess::Minmax => minmax(values),
        Preprocess::Log => log1p(values),
        Preprocess::Logzs => zscore(&log1p(values)),
        Preprocess::CorpusZscore => match corpus {
            Some(stats) => {
                let denom = stats.std + ZSCORE_EPSILON;
                values.iter().map(|v| (v - stats.mean) / denom).collect()
            }
            None => zscore(values),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SCORES: [f64; 6] = [2.5, 0.75, 4.0, 1.25, 3.5, 0.0];

    #[test]
    fn zscore_centres_and_scales() {
        let out = apply(&SCORES, Preprocess::Zscore, None);
        assert_abs_diff_eq!(mean(&out), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(population_std(&out), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn minmax_spans_unit_interval() {
        let out = apply(&SCORES, Preprocess::Minmax, None);
        assert_abs_diff_eq!(out[2], 1.0);
        assert_abs_diff_eq!(out[5], 0.0);
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn minmax_of_constant_sequence_is_zero() {
        let out = apply(&[3.0, 3.0, 3.0], Preprocess::Minmax, None);
        assert_eq!(out, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn log_is_natural_log_of_value_plus_one() {
        let out = apply(&[0.0, std::f64::consts::E - 1.0], Preprocess::Log, None);
        assert_abs_diff_eq!(out[0], 0.0);
        assert_abs_diff_eq!(out[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn logzs_is_zscore_of_log() {
        let out = apply(&SCORES, Preprocess::Logzs, None);
        let expected = zscore(&log1p(&SCORES));
        assert_eq!(out, expected);
        assert_abs_diff_eq!(mean(&out), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn none_leaves_values_untouched() {
        assert_eq!(apply(&SCORES, Preprocess::None, None), SCORES.to_vec());
    }

    #[test]
    fn corpus_stats_cover_every_sequence() {
        let corpus = vec![vec![1.0, 3.0], vec![5.0, 7.0]];
        let stats = CorpusStats::from_sequences(&corpus).unwrap();
        assert_abs_diff_eq!(stats.mean, 4.0);
        assert_abs_diff_eq!(stats.std, 5.0_f64.sqrt(), epsilon = 1e-12);

        let out = apply(&corpus[0], Preprocess::CorpusZscore, Some(&stats));
        assert_abs_diff_eq!(out[0], -3.0 / (stats.std + ZSCORE_EPSILON), epsilon = 1e-12);
    }

    #[test]
    fn corpus_stats_of_empty_corpus_is_none() {
        let corpus: Vec<Vec<f64>> = vec![vec![], vec![]];
        assert!(CorpusStats::from_sequences(&corpus).is_none());
    }
}
