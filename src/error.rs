//! Centralized error handling for the preprocessing pipeline.
//!
//! Every pipeline step returns [`Result`], so a caller can tell a fatal
//! failure apart from a step that ran and simply changed nothing. Conditions
//! the pipeline tolerates (a column that will not convert to float, a
//! configured column that is absent from the dataset) are *not* errors: they
//! are reported in the step's [`StepOutcome`](crate::prep::StepOutcome).
//!
//! ```
//! use frn_prep::error::PrepError;
//!
//! fn describe(err: &PrepError) -> &'static str {
//!     match err {
//!         PrepError::MissingColumn(_) => "dataset has no identifier column",
//!         PrepError::Config(_) => "bad parameters",
//!         _ => "other failure",
//!     }
//! }
//! ```
//!
//! The `ResultExt` trait adds `.context()` to any result whose error converts
//! into [`PrepError`]:
//!
//! ```no_run
//! use frn_prep::error::ResultExt as _;
//!
//! fn read_catalog() -> frn_prep::error::Result<String> {
//!     std::fs::read_to_string("catalog.json").context("Failed to read catalog")
//! }
//! ```

use std::fmt;

/// Main error type for preprocessing operations.
#[derive(Debug)]
pub enum PrepError {
    /// I/O errors (reading inputs, writing outputs, log directories)
    Io(std::io::Error),

    /// Dataframe errors raised by Polars
    DataProcessing(String),

    /// Invalid parameters or an unreadable column catalog
    Config(String),

    /// A column the step cannot work without is absent
    MissingColumn(String),

    /// An operation would produce two columns with the same name
    DuplicateColumn(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::MissingColumn(name) => write!(f, "Missing column: {name}"),
            Self::DuplicateColumn(name) => write!(f, "Column already exists: {name}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PrepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PrepError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<anyhow::Error> for PrepError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Result type alias for preprocessing operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PrepError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {}", f(), err))
        })
    }
}
