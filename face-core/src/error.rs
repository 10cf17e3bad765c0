//! # Error Module
//!
//! Typed failures for the transform and comparison stages, plus the file
//! plumbing around them. Every variant that aborts a batch carries the
//! sequence index that caused it.

use thiserror::Error;

/// Failures raised while turning score sequences into spectra.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("sequence {index} cannot be transformed ({reason}): {values:?}")]
    MalformedInput {
        index: usize,
        values: Vec<f64>,
        reason: &'static str,
    },
    #[error("unknown {kind} `{value}`, expected one of: {expected}")]
    UnknownOption {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Failures raised while aligning and scoring two spectrum collections.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("sequence {index}: {source_name} spectrum has {len} point(s), interpolation needs at least 2")]
    TooFewPoints {
        index: usize,
        source_name: &'static str,
        len: usize,
    },
    #[error("sequence {index}: aligned shapes differ (grid {grid}, first {first}, second {second})")]
    ShapeMismatch {
        index: usize,
        grid: usize,
        first: usize,
        second: usize,
    },
    #[error("sequence {index}: non-finite power values remain after Pearson repair")]
    NonFiniteAfterRepair { index: usize },
    #[error("sequence {index}: Pearson correlation undefined for zero-variance input (shapes {first} and {second})")]
    ZeroVariance {
        index: usize,
        first: usize,
        second: usize,
    },
}

/// Failures in reading or writing the on-disk formats.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error while {context}: {source}")]
    Csv {
        context: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: cannot parse `{token}` as a number")]
    Parse { line: usize, token: String },
    #[error("table is missing required column `{0}`")]
    MissingColumn(&'static str),
}

impl TableError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn csv(context: &'static str, source: csv::Error) -> Self {
        Self::Csv { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }
}
