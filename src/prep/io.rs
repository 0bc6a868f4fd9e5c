//! Reading and writing datasets for the command-line front end.
//!
//! Where the records come from is up to the caller; these helpers cover the
//! common case of a CSV or Parquet extract on disk.

use crate::error::{PrepError, Result, ResultExt as _};
use polars::prelude::*;
use std::path::Path;

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a CSV (header row required) or Parquet file.
///
/// # Errors
///
/// Returns error for unsupported extensions or unreadable files.
pub fn load_df(path: &Path) -> Result<DataFrame> {
    match extension(path).as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_has_header(true)
            .finish()?
            .collect()
            .context("Failed to read CSV"),
        "parquet" => ParquetReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read Parquet"),
        ext => Err(PrepError::Config(format!(
            "Unsupported file extension: {ext}"
        ))),
    }
}

/// Write `df` as Parquet when the path ends in `.parquet`, CSV otherwise.
///
/// # Errors
///
/// Returns error if the file cannot be created or written.
pub fn save_df(df: &mut DataFrame, path: &Path) -> Result<()> {
    if extension(path) == "parquet" {
        let file = std::fs::File::create(path).context("Failed to create Parquet file")?;
        ParquetWriter::new(file)
            .finish(df)
            .context("Failed to write Parquet file")?;
    } else {
        let file = std::fs::File::create(path).context("Failed to create CSV file")?;
        CsvWriter::new(file)
            .include_header(true)
            .finish(df)
            .context("Failed to write CSV file")?;
    }
    Ok(())
}
