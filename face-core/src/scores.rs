//! Reader for per-token score files: one sequence per line, scores as
//! whitespace-separated decimals. Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::TableError;

/// Per-position surprise values of one text sample.
pub type ScoreSequence = Vec<f64>;

/// Parses score sequences from a reader, stopping after `limit` sequences
/// when one is given.
pub fn read_score_sequences<R: BufRead>(
    reader: R,
    limit: Option<usize>,
) -> Result<Vec<ScoreSequence>, TableError> {
    let mut data = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        if limit.is_some_and(|n| data.len() >= n) {
            break;
        }
        let line = line.map_err(|e| TableError::io("read score sequences", e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let sequence = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| TableError::Parse {
                    line: index + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<ScoreSequence, _>>()?;
        data.push(sequence);
    }
    Ok(data)
}

pub fn load_score_sequences(
    path: &Path,
    limit: Option<usize>,
) -> Result<Vec<ScoreSequence>, TableError> {
    let file = File::open(path).map_err(|e| TableError::io("open score file", e))?;
    read_score_sequences(BufReader::new(file), limit)
}
