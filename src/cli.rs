use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use frn_prep::config::{ColumnCatalog, PrepConfig};
use frn_prep::prep::io::{load_df, save_df};
use frn_prep::prep::{Mode, Preprocessor, filtering};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "frn-prep",
    about = "Clean funding-request records into a model-ready feature matrix"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log every step's diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write daily rotating log files to this directory
    #[arg(long, global = true, env = "FRN_PREP_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Input file (CSV or Parquet)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file; Parquet if it ends in .parquet, CSV otherwise
    #[arg(short, long)]
    output: PathBuf,

    /// JSON column catalog; defaults to the funding-request schema
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Largest cardinality a categorical column may have to be dummy-encoded
    #[arg(long, default_value_t = PrepConfig::default().max_categories)]
    max_categories: usize,

    /// Drop columns whose null fraction is at least this
    #[arg(long, default_value_t = PrepConfig::default().null_threshold)]
    null_threshold: f64,

    /// Prune float pairs whose absolute correlation is at least this
    #[arg(long, default_value_t = PrepConfig::default().corr_threshold)]
    corr_threshold: f64,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    report: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full training-time pipeline
    Raw(RunArgs),
    /// Prediction-time pipeline (keeps the trained column schema)
    Predict(RunArgs),
    /// Print the default column catalog as JSON
    Catalog,
    /// Print per-column summary statistics of a file as JSON
    Summary {
        /// Input file (CSV or Parquet)
        #[arg(short, long)]
        input: PathBuf,
    },
}

pub fn run_command(command: Commands, verbose: bool) -> Result<()> {
    match command {
        Commands::Raw(args) => handle_run(Mode::Raw, args, verbose),
        Commands::Predict(args) => handle_run(Mode::Predict, args, verbose),
        Commands::Catalog => print_json(&ColumnCatalog::default()),
        Commands::Summary { input } => {
            let df = load_df(&input)
                .with_context(|| format!("Failed to load {}", input.display()))?;
            print_json(&filtering::summary(&df)?)
        }
    }
}

fn handle_run(mode: Mode, args: RunArgs, verbose: bool) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => ColumnCatalog::from_file(path)?,
        None => ColumnCatalog::default(),
    };
    let config = PrepConfig {
        verbose,
        max_categories: args.max_categories,
        null_threshold: args.null_threshold,
        corr_threshold: args.corr_threshold,
    };

    let df = load_df(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    tracing::info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        args.input.display()
    );

    let mut prep = Preprocessor::with_catalog(df, config, catalog)?;
    let report = prep.apply(mode)?;
    tracing::info!("{}", report.summary());

    let mut features = prep.into_data();
    save_df(&mut features, &args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    if args.report {
        print_json(&report)?;
    }
    Ok(())
}

#[expect(clippy::print_stdout)]
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
