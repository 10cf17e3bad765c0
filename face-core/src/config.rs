//! # Transform Configuration Module
//!
//! Closed option sets for the spectral transform stage and the
//! configuration value that carries them. Every option is parsed from the
//! lowercase tag used on the command line and in JSON config files.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TableError, TransformError};
use crate::preprocess::CorpusStats;

/// Which spectral estimator turns a sequence into a spectrum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Direct discrete Fourier transform, non-negative half.
    #[default]
    Fft,
    /// Single-segment power spectral density estimate.
    Periodogram,
}

/// Normalization applied to each sequence before the transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preprocess {
    #[default]
    None,
    Zscore,
    Minmax,
    Log,
    Logzs,
    /// Z-score against mean/std of the whole corpus.
    CorpusZscore,
}

/// Component of the complex FFT output reported as power.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerValue {
    /// Magnitude, sqrt(re^2 + im^2).
    #[default]
    Norm,
    Real,
    Imag,
}

/// Taper applied before the periodogram transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    #[default]
    Boxcar,
    Hann,
}

macro_rules! tagged_option {
    ($ty:ident, $kind:literal, [$($variant:ident => $tag:literal),+ $(,)?]) => {
        impl $ty {
            pub const TAGS: &'static str = concat!($($tag, " "),+);

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = TransformError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($tag => Ok(Self::$variant),)+
                    other => Err(TransformError::UnknownOption {
                        kind: $kind,
                        value: other.to_string(),
                        expected: Self::TAGS,
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tagged_option!(Method, "method", [Fft => "fft", Periodogram => "periodogram"]);
tagged_option!(Preprocess, "preprocess", [
    None => "none",
    Zscore => "zscore",
    Minmax => "minmax",
    Log => "log",
    Logzs => "logzs",
    CorpusZscore => "corpus-zscore",
]);
tagged_option!(PowerValue, "value", [Norm => "norm", Real => "real", Imag => "imag"]);
tagged_option!(Window, "window", [Boxcar => "boxcar", Hann => "hann"]);

/// Options for the spectral transform stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub method: Method,
    pub preprocess: Preprocess,
    /// Only read by the `fft` method.
    pub value: PowerValue,
    /// Only read by the `periodogram` method.
    pub window: Window,
    /// Tag every output row with the index of its source sequence.
    pub require_sid: bool,
    /// Precomputed corpus statistics for `corpus-zscore`. When absent the
    /// batch computes them once before transforming.
    pub corpus: Option<CorpusStats>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            preprocess: Preprocess::default(),
            value: PowerValue::default(),
            window: Window::default(),
            require_sid: true,
            corpus: None,
        }
    }
}

impl TransformConfig {
    /// Loads a config from a JSON object; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| TableError::io("read transform config", e))?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, TableError> {
        serde_json::from_str(data).map_err(|e| TableError::json("parse transform config", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_cli_defaults() {
        let config = TransformConfig::default();
        assert_eq!(config.method, Method::Fft);
        assert_eq!(config.preprocess, Preprocess::None);
        assert_eq!(config.value, PowerValue::Norm);
        assert_eq!(config.window, Window::Boxcar);
        assert!(config.require_sid);
        assert!(config.corpus.is_none());
    }

    #[test]
    fn tags_parse_case_insensitively() {
        assert_eq!("FFT".parse::<Method>().unwrap(), Method::Fft);
        assert_eq!("logzs".parse::<Preprocess>().unwrap(), Preprocess::Logzs);
        assert_eq!(
            "corpus-zscore".parse::<Preprocess>().unwrap(),
            Preprocess::CorpusZscore
        );
        assert_eq!(" imag ".parse::<PowerValue>().unwrap(), PowerValue::Imag);
        assert_eq!(Window::Hann.to_string(), "hann");
    }

    #[test]
    fn unknown_tag_lists_expected_values() {
        let err = "wavelet".parse::<Method>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("wavelet"));
        assert!(message.contains("periodogram"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            TransformConfig::from_json(r#"{"method": "periodogram", "preprocess": "zscore"}"#)
                .unwrap();
        assert_eq!(config.method, Method::Periodogram);
        assert_eq!(config.preprocess, Preprocess::Zscore);
        assert_eq!(config.value, PowerValue::Norm);
        assert!(config.require_sid);
    }

    #[test]
    fn json_accepts_corpus_stats() {
        let config = TransformConfig::from_json(
            r#"{"preprocess": "corpus-zscore", "corpus": {"mean": 2.5, "std": 0.5}}"#,
        )
        .unwrap();
        let corpus = config.corpus.unwrap();
        assert_eq!(corpus.mean, 2.5);
        assert_eq!(corpus.std, 0.5);
    }

    #[test]
    fn load_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transform.json");
        std::fs::write(
            &path,
            r#"{"method": "periodogram", "window": "hann", "require_sid": false}"#,
        )
        .unwrap();

        let config = TransformConfig::load(&path).unwrap();
        assert_eq!(config.method, Method::Periodogram);
        assert_eq!(config.window, Window::Hann);
        assert_eq!(config.preprocess, Preprocess::None);
        assert!(!config.require_sid);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TransformConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }
}
