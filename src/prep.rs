//! Feature-engineering pipeline for funding-request records.
//!
//! A [`Preprocessor`] owns one Polars `DataFrame` and applies an ordered set
//! of transformations to it. Each transformation replaces the frame with a
//! transformed copy and returns a [`StepOutcome`] describing what changed.
//!
//! # Steps
//!
//! - **Row/column hygiene** ([`hygiene`]): drop ambiguous identifier groups,
//!   all-null columns, duplicated columns, zero-variance columns, the catalog
//!   drop list; rename columns.
//! - **Type normalisation** ([`coercion`]): float conversion, yes/no flags,
//!   dummy encoding of low-cardinality categoricals.
//! - **Statistical filtering** ([`filtering`]): per-column summary,
//!   mostly-null removal, correlated-column pruning.
//!
//! # Modes
//!
//! [`Mode::Raw`] runs every step and is meant for training data.
//! [`Mode::Predict`] skips the three data-dependent filters (zero variance,
//! mostly null, correlation) so that new data keeps the column schema a
//! trained model expects.
//!
//! ```no_run
//! use frn_prep::config::PrepConfig;
//! use frn_prep::prep::{Preprocessor, io::load_df};
//!
//! let df = load_df("frns.csv".as_ref())?;
//! let mut prep = Preprocessor::new(df, PrepConfig::default())?;
//! let report = prep.apply_all_raw()?;
//! println!("{}", report.summary());
//! let features = prep.into_data();
//! # Ok::<(), frn_prep::error::PrepError>(())
//! ```

/// Log a step diagnostic at `info` when verbose, `debug` otherwise.
macro_rules! step_log {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

pub mod coercion;
pub mod filtering;
pub mod hygiene;
pub mod io;
pub mod preprocessor;
pub mod types;

pub use filtering::{CorrelationDrop, pearson_correlation};
pub use preprocessor::Preprocessor;
pub use types::{
    CentralValue, ColumnKind, ColumnSummary, Mode, RunReport, Step, StepOutcome,
};

use crate::error::Result;
use polars::prelude::*;

/// Copy of `df` without the named columns; names not present are ignored.
pub(crate) fn without_columns(df: &DataFrame, drop: &[String]) -> Result<DataFrame> {
    if drop.is_empty() {
        return Ok(df.clone());
    }
    let keep: Vec<PlSmallStr> = df
        .get_column_names()
        .into_iter()
        .filter(|name| !drop.iter().any(|d| d == name.as_str()))
        .cloned()
        .collect();
    Ok(df.select(keep)?)
}

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// The values of `series` that are neither null nor, for float columns, NaN.
pub(crate) fn present_values(series: &Series) -> Result<Series> {
    let values = series.drop_nulls();
    if !values.dtype().is_float() {
        return Ok(values);
    }
    let mask = !values.is_nan()?;
    Ok(values.filter(&mask)?)
}

/// Null count of `series`, with NaN counted as missing in float columns.
pub(crate) fn missing_count(series: &Series) -> Result<usize> {
    Ok(series.len() - present_values(series)?.len())
}
