//! # Spectral Comparison Module
//!
//! Pairs two spectrum collections by sequence-id, aligns each pair onto the
//! shared grid and scores it with the four similarity metrics.
//!
//! ## Features
//! - Positional pairing, truncated to the shorter collection
//! - One `ScorePair` per sequence-id, in ascending id order
//! - CSV persistence of the score table with `SO,CORR,SAM,SPEAR` columns

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::align::{AlignedPair, align_pair, overlap_len};
use crate::error::{CompareError, TableError};
use crate::metrics::{OverlapAreas, pearson, spearman, spectral_angle, spectral_overlap};
use crate::spectrum::SpectrumCollection;

/// The four similarity scores of one sequence-id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    /// Spectral Overlap.
    #[serde(rename = "SO")]
    pub so: f64,
    /// Pearson correlation.
    #[serde(rename = "CORR")]
    pub corr: f64,
    /// Spectral Angle Mapper.
    #[serde(rename = "SAM")]
    pub sam: f64,
    /// Spearman rank correlation.
    #[serde(rename = "SPEAR")]
    pub spear: f64,
}

impl ScorePair {
    pub const COLUMNS: [&'static str; 4] = ["SO", "CORR", "SAM", "SPEAR"];

    /// Scores one aligned pair.
    pub fn from_aligned(pair: &AlignedPair) -> Result<Self, CompareError> {
        let OverlapAreas { so, .. } = spectral_overlap(&pair.grid, &pair.first, &pair.second);
        let corr = pearson(pair.sid, &pair.first, &pair.second)?;
        Ok(Self {
            so,
            corr,
            sam: spectral_angle(&pair.first, &pair.second),
            spear: spearman(&pair.first, &pair.second),
        })
    }

    pub fn values(&self) -> [f64; 4] {
        [self.so, self.corr, self.sam, self.spear]
    }
}

/// Score rows ordered by sequence-id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    rows: Vec<ScorePair>,
}

impl ScoreTable {
    pub fn rows(&self) -> &[ScorePair] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, `column` indexing `ScorePair::COLUMNS`.
    pub fn column(&self, column: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r.values()[column]).collect()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let context = "write score table";
        let mut out = csv::Writer::from_writer(writer);
        if self.rows.is_empty() {
            out.write_record(ScorePair::COLUMNS)
                .map_err(|e| TableError::csv(context, e))?;
        }
        for row in &self.rows {
            out.serialize(row).map_err(|e| TableError::csv(context, e))?;
        }
        out.flush().map_err(|e| TableError::io(context, e))
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Self, TableError> {
        let rows = csv::Reader::from_reader(reader)
            .deserialize()
            .collect::<Result<Vec<ScorePair>, _>>()
            .map_err(|e| TableError::csv("read score table", e))?;
        Ok(Self { rows })
    }

    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        let file = File::create(path).map_err(|e| TableError::io("create score table", e))?;
        self.write_csv(BufWriter::new(file))
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|e| TableError::io("open score table", e))?;
        Self::read_csv(BufReader::new(file))
    }
}

impl From<Vec<ScorePair>> for ScoreTable {
    fn from(rows: Vec<ScorePair>) -> Self {
        Self { rows }
    }
}

/// Scores every overlapping pair of two spectrum collections.
pub fn compare(
    first: &SpectrumCollection,
    second: &SpectrumCollection,
) -> Result<ScoreTable, CompareError> {
    compare_with_progress(first, second, |_| {})
}

/// Like [`compare`], calling `on_pair` with each sequence-id once scored.
pub fn compare_with_progress<F: FnMut(usize)>(
    first: &SpectrumCollection,
    second: &SpectrumCollection,
    mut on_pair: F,
) -> Result<ScoreTable, CompareError> {
    let short = overlap_len(first, second);
    let mut rows = Vec::with_capacity(short);

    for (sid, (a, b)) in first.iter().zip(second.iter()).take(short).enumerate() {
        let pair = align_pair(sid, a, b)?;
        let scores = ScorePair::from_aligned(&pair)?;
        tracing::debug!(
            sid,
            so = scores.so,
            corr = scores.corr,
            sam = scores.sam,
            spear = scores.spear,
            "scored pair"
        );
        rows.push(scores);
        on_pair(sid);
    }

    tracing::info!(pairs = rows.len(), "spectral comparison finished");
    Ok(ScoreTable { rows })
}

/// Floor and roof areas plus Spectral Overlap for every overlapping pair.
pub fn overlap_areas(
    first: &SpectrumCollection,
    second: &SpectrumCollection,
) -> Result<Vec<OverlapAreas>, CompareError> {
    let short = overlap_len(first, second);
    first
        .iter()
        .zip(second.iter())
        .take(short)
        .enumerate()
        .map(|(sid, (a, b))| {
            let pair = align_pair(sid, a, b)?;
            Ok(spectral_overlap(&pair.grid, &pair.first, &pair.second))
        })
        .collect()
}
