//! # Command Handlers
//!
//! Glue between the parsed arguments and the `face-core` pipeline: file
//! loading, progress display, output writing and summary printing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use face_core::{
    Method, PowerValue, Preprocess, ScoreTable, SpectralTransform, SpectrumCollection,
    TableSummary, TransformConfig, compare_with_progress, load_score_sequences,
};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{CompareArgs, DemoArgs, TransformArgs};

/// Sample score files shipped for the demo scenario.
pub const DEMO_INPUTS: [&str; 2] = ["demo_human.nll.txt", "demo_model.nll.txt"];

/// Builds a progress bar that only draws when `enabled`.
fn progress_bar(len: usize, enabled: bool, message: &str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message(message.to_string());
    progress
}

/// Reads `input`, transforms every sequence and writes the table to `output`.
fn transform_file(
    engine: &SpectralTransform,
    input: &Path,
    output: &Path,
    limit: Option<usize>,
    show_progress: bool,
) -> Result<()> {
    let data = load_score_sequences(input, limit)
        .with_context(|| format!("failed to read score file {}", input.display()))?;
    tracing::info!(input = %input.display(), sequences = data.len(), "loaded score sequences");

    let progress = progress_bar(data.len(), show_progress, "transforming");
    let table = engine
        .process_with_progress(&data, |_| progress.inc(1))
        .with_context(|| format!("spectral transform failed for {}", input.display()))?;
    progress.finish_and_clear();

    table
        .save(output)
        .with_context(|| format!("failed to write spectrum table {}", output.display()))?;
    tracing::info!(output = %output.display(), rows = table.len(), "wrote spectrum table");
    Ok(())
}

pub fn run_transform(args: &TransformArgs, verbosity: u8) -> Result<()> {
    let base = match &args.config {
        Some(path) => TransformConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TransformConfig::default(),
    };
    let engine = SpectralTransform::new(args.merge_into(base));
    transform_file(&engine, &args.input, &args.output, args.limit, verbosity >= 1)
}

/// Loads both tables and scores every overlapping sequence-id.
fn compare_files(first: &Path, second: &Path, show_progress: bool) -> Result<ScoreTable> {
    let a = SpectrumCollection::load(first)
        .with_context(|| format!("failed to read spectrum table {}", first.display()))?;
    let b = SpectrumCollection::load(second)
        .with_context(|| format!("failed to read spectrum table {}", second.display()))?;

    let progress = progress_bar(a.len().min(b.len()), show_progress, "comparing");
    let scores = compare_with_progress(&a, &b, |_| progress.inc(1))
        .context("spectral comparison failed")?;
    progress.finish_and_clear();
    Ok(scores)
}

fn print_summary(scores: &ScoreTable, json: bool) -> Result<()> {
    let summary = TableSummary::of_scores(scores);
    if json {
        let rendered =
            serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
        println!("{rendered}");
    } else {
        print!("{summary}");
    }
    Ok(())
}

pub fn run_compare(args: &CompareArgs, verbosity: u8) -> Result<()> {
    let scores = compare_files(&args.first, &args.second, verbosity >= 1)?;
    match &args.output {
        Some(path) => {
            scores
                .save(path)
                .with_context(|| format!("failed to write score table {}", path.display()))?;
            tracing::info!(output = %path.display(), rows = scores.len(), "wrote score table");
            Ok(())
        }
        None => print_summary(&scores, args.json),
    }
}

/// Output path of the demo table for `input`: `x.nll.txt` becomes
/// `x.nll.fft.txt` in the same directory.
pub fn demo_output_path(data_dir: &Path, input: &str) -> PathBuf {
    let stem = input.strip_suffix(".txt").unwrap_or(input);
    data_dir.join(format!("{stem}.fft.txt"))
}

/// Transforms both demo score files with the real FFT component and no
/// sequence-ids, then compares the two resulting tables.
pub fn run_demo(args: &DemoArgs, verbosity: u8) -> Result<ScoreTable> {
    let engine = SpectralTransform::new(TransformConfig {
        method: Method::Fft,
        preprocess: Preprocess::None,
        value: PowerValue::Real,
        require_sid: false,
        ..TransformConfig::default()
    });

    let mut outputs = Vec::with_capacity(DEMO_INPUTS.len());
    for input in DEMO_INPUTS {
        let output = demo_output_path(&args.data_dir, input);
        transform_file(
            &engine,
            &args.data_dir.join(input),
            &output,
            None,
            verbosity >= 1,
        )?;
        outputs.push(output);
    }

    let scores = compare_files(&outputs[0], &outputs[1], verbosity >= 1)?;
    print_summary(&scores, false)?;
    Ok(scores)
}
