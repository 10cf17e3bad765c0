//! Per-column summary statistics of a score table: count, mean, sample
//! standard deviation, min, quartiles and max. NaN entries are excluded.

use std::fmt;

use serde::Serialize;

use crate::compare::{ScorePair, ScoreTable};

/// Summary of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub q50: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

/// Quantile of sorted data, interpolating linearly between neighbours.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl ColumnSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let mut data: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        data.sort_by(f64::total_cmp);
        let count = data.len();
        let mean = if count == 0 {
            f64::NAN
        } else {
            data.iter().sum::<f64>() / count as f64
        };
        let std = if count < 2 {
            f64::NAN
        } else {
            (data.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (count - 1) as f64).sqrt()
        };
        Self {
            count,
            mean,
            std,
            min: data.first().copied().unwrap_or(f64::NAN),
            q25: quantile(&data, 0.25),
            q50: quantile(&data, 0.5),
            q75: quantile(&data, 0.75),
            max: data.last().copied().unwrap_or(f64::NAN),
        }
    }

    fn stats(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// Summaries of every column of a score table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub columns: Vec<(String, ColumnSummary)>,
}

impl TableSummary {
    const ROWS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    pub fn of_scores(table: &ScoreTable) -> Self {
        let columns = ScorePair::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), ColumnSummary::from_values(&table.column(i))))
            .collect();
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, summary)| summary)
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6}", "")?;
        for (name, _) in &self.columns {
            write!(f, "{name:>12}")?;
        }
        writeln!(f)?;
        for (row, label) in Self::ROWS.iter().enumerate() {
            write!(f, "{label:<6}")?;
            for (_, summary) in &self.columns {
                write!(f, "{:>12.6}", summary.stats()[row])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
