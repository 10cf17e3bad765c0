//! # FACE - Spectral Comparison of Token Score Sequences
//!
//! Command-line front-end for `face-core`. It turns per-token score files
//! into frequency/power tables and scores how similar the spectra of two
//! sources are.
//!
//! ## Commands
//! - **transform**: score file → frequency/power CSV
//! - **compare**: two frequency/power CSVs → score CSV or printed summary
//! - **demo**: both steps on the sample files in `data/`

mod cli;
mod commands;
mod logging;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Transform(args) => commands::run_transform(args, cli.verbose),
        Command::Compare(args) => commands::run_compare(args, cli.verbose),
        Command::Demo(args) => commands::run_demo(args, cli.verbose).map(|_| ()),
    };

    if let Err(err) = result {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}
