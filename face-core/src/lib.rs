// face-core/src/lib.rs

//! The core logic for spectral comparison of token score sequences.
//! This crate turns per-token surprise values into spectra, aligns pairs
//! of spectra onto a shared frequency grid and scores their similarity.
//! It is completely headless and contains no terminal UI code.

pub mod align;
pub mod compare;
pub mod config;
pub mod error;
pub mod fft;
pub mod interpolate;
pub mod metrics;
pub mod periodogram;
pub mod preprocess;
pub mod scores;
pub mod spectrum;
pub mod summary;
pub mod transform;

pub use align::{AlignedPair, FREQUENCY_GRID, GRID_POINTS, align_pair, align_points};
pub use compare::{ScorePair, ScoreTable, compare, compare_with_progress};
pub use config::{Method, PowerValue, Preprocess, TransformConfig, Window};
pub use error::{CompareError, TableError, TransformError};
pub use preprocess::CorpusStats;
pub use scores::{ScoreSequence, load_score_sequences, read_score_sequences};
pub use spectrum::{Spectrum, SpectrumCollection, SpectrumTable};
pub use summary::{ColumnSummary, TableSummary};
pub use transform::SpectralTransform;
