//! Logging setup for the `frn-prep` binary.
//!
//! Pipeline steps log through `tracing` macros. Verbose runs emit step
//! diagnostics (rows and columns removed, conversions) at `info`; quiet runs
//! keep them at `debug`, so only warnings (for example a column that failed
//! float conversion) reach the console by default.
//!
//! ```no_run
//! frn_prep::logging::init(true, None).expect("Failed to initialize logging");
//! tracing::info!("pipeline starting");
//! ```

use anyhow::{Context as _, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Default filter directive for the requested verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

/// Initializes console logging and, when `log_dir` is given, a daily rolling
/// log file `frn-prep.<date>.log` inside it.
///
/// `RUST_LOG` overrides the verbosity-derived default.
///
/// # Errors
///
/// Returns error if the log directory cannot be created, the file appender
/// fails, or a global subscriber is already installed.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))
        .context("Failed to create env filter")?;

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(10)
                .filename_prefix("frn-prep")
                .filename_suffix("log")
                .build(dir)
                .context("Failed to create file appender")?;
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(appender)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = log_dir {
        tracing::debug!("Logging initialized, log directory: {}", dir.display());
    }

    Ok(())
}
