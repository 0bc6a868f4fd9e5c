//! `frn-prep` command-line entry point.
//!
//! ```bash
//! frn-prep raw --input frns.csv --output features.parquet --verbose
//! frn-prep predict --input new_frns.csv --output to_score.csv
//! frn-prep catalog > catalog.json
//! ```

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    frn_prep::logging::init(cli.verbose, cli.log_dir.as_deref())?;
    cli::run_command(cli.command, cli.verbose)
}
