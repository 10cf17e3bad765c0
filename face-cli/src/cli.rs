//! Command-line surface of the `face` binary.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use face_core::{Method, PowerValue, Preprocess, TransformConfig, Window};

#[derive(Debug, Parser)]
#[command(
    name = "face",
    version,
    about = "Compare the frequency spectra of per-token score sequences"
)]
pub struct Cli {
    /// Show progress bars (-v) and per-sequence debug logs (-vv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Turn a score file into a frequency/power table.
    Transform(TransformArgs),
    /// Score the similarity of two frequency/power tables.
    Compare(CompareArgs),
    /// Run the built-in scenario on the sample files in the data directory.
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Score file, one whitespace-separated sequence per line.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV with columns `sid,freq,power`.
    #[arg(short, long)]
    pub output: PathBuf,

    /// JSON file with transform options; explicit flags override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// fft | periodogram
    #[arg(long)]
    pub method: Option<Method>,

    /// none | zscore | minmax | log | logzs | corpus-zscore
    #[arg(short, long)]
    pub preprocess: Option<Preprocess>,

    /// norm | real | imag (fft only)
    #[arg(long)]
    pub value: Option<PowerValue>,

    /// boxcar | hann (periodogram only)
    #[arg(long)]
    pub window: Option<Window>,

    /// Write the `sid` column even when the config file turns it off.
    #[arg(long, conflicts_with = "no_sid")]
    pub sid: bool,

    /// Leave the `sid` column out of the output.
    #[arg(long)]
    pub no_sid: bool,

    /// Read at most this many sequences.
    #[arg(long)]
    pub limit: Option<usize>,
}

impl TransformArgs {
    /// Applies the explicit flags on top of `base`.
    pub fn merge_into(&self, base: TransformConfig) -> TransformConfig {
        TransformConfig {
            method: self.method.unwrap_or(base.method),
            preprocess: self.preprocess.unwrap_or(base.preprocess),
            value: self.value.unwrap_or(base.value),
            window: self.window.unwrap_or(base.window),
            require_sid: match (self.sid, self.no_sid) {
                (true, _) => true,
                (_, true) => false,
                _ => base.require_sid,
            },
            corpus: base.corpus,
        }
    }
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Frequency/power table of the first source.
    pub first: PathBuf,

    /// Frequency/power table of the second source.
    pub second: PathBuf,

    /// Output CSV with columns `SO,CORR,SAM,SPEAR`. Prints a summary when
    /// omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the summary as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Directory holding `demo_human.nll.txt` and `demo_model.nll.txt`.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform_args(argv: &[&str]) -> TransformArgs {
        let mut full = vec!["face", "transform", "-i", "in.txt", "-o", "out.csv"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Transform(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn transform_flags_parse_into_enums() {
        let args = transform_args(&["--method", "periodogram", "-p", "logzs", "--window", "hann"]);
        assert_eq!(args.method, Some(Method::Periodogram));
        assert_eq!(args.preprocess, Some(Preprocess::Logzs));
        assert_eq!(args.window, Some(Window::Hann));
        assert!(args.value.is_none());
    }

    #[test]
    fn unknown_method_is_rejected() {
        let result = Cli::try_parse_from([
            "face", "transform", "-i", "a", "-o", "b", "--method", "wavelet",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn explicit_flags_override_config_file() {
        let base = TransformConfig {
            method: Method::Periodogram,
            preprocess: Preprocess::Zscore,
            ..TransformConfig::default()
        };
        let merged = transform_args(&["-p", "minmax", "--no-sid"]).merge_into(base);
        assert_eq!(merged.method, Method::Periodogram);
        assert_eq!(merged.preprocess, Preprocess::Minmax);
        assert!(!merged.require_sid);
    }

    #[test]
    fn sid_flag_overrides_config_file() {
        let base = TransformConfig {
            require_sid: false,
            ..TransformConfig::default()
        };
        assert!(transform_args(&["--sid"]).merge_into(base.clone()).require_sid);
        assert!(!transform_args(&[]).merge_into(base).require_sid);
        assert!(transform_args(&[]).merge_into(TransformConfig::default()).require_sid);
    }

    #[test]
    fn sid_and_no_sid_conflict() {
        let result = Cli::try_parse_from([
            "face", "transform", "-i", "a", "-o", "b", "--sid", "--no-sid",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_counts_flags() {
        let cli = Cli::try_parse_from(["face", "-vv", "compare", "a.csv", "b.csv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Compare(args) => {
                assert!(args.output.is_none());
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
