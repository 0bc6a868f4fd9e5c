//! # frn-prep - feature engineering for funding-request records
//!
//! Turns a raw table of funding requests (one row per request line, mixed
//! numeric, yes/no and categorical columns) into a numeric feature matrix for
//! statistical modelling.
//!
//! ```no_run
//! use frn_prep::config::PrepConfig;
//! use frn_prep::prep::{Preprocessor, io::load_df};
//!
//! let df = load_df("frns.csv".as_ref())?;
//! let config = PrepConfig { verbose: true, ..Default::default() };
//! let mut prep = Preprocessor::new(df, config)?;
//! prep.apply_all_raw()?;
//! println!("{} feature columns", prep.data().width());
//! # Ok::<(), frn_prep::error::PrepError>(())
//! ```
//!
//! ## Modules
//!
//! - [`prep`]: the pipeline steps and the [`prep::Preprocessor`] that runs them
//! - [`config`]: tuning parameters and the column catalog
//! - [`error`]: error type and `Result` alias
//! - [`logging`]: `tracing` subscriber setup for the binary

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod logging;
pub mod prep;
