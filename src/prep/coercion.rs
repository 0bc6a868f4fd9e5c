//! Type and value normalisation.

use super::has_column;
use super::types::{Step, StepOutcome};
use super::without_columns;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::collections::BTreeSet;

/// Convert every column not listed in `exclude` to `Float64`.
///
/// Numeric and boolean columns always convert. A string column converts only
/// if every non-null value parses as a number; otherwise it is left as it was
/// and reported in `columns_failed`. Columns already `Float64` are untouched.
///
/// # Errors
///
/// Returns error if a cast or replacing a converted column fails.
pub fn convert_floats(df: &DataFrame, exclude: &[String]) -> Result<(DataFrame, StepOutcome)> {
    let mut out = df.clone();
    let mut outcome = StepOutcome::new(Step::ConvertFloats);

    for column in df.get_columns() {
        let name = column.name().as_str();
        if exclude.iter().any(|c| c == name) {
            continue;
        }

        let series = column.as_materialized_series();
        let dtype = series.dtype();
        let converted = match dtype {
            DataType::Float64 => continue,
            DataType::String => {
                // Unparsable text turns into null, so any new null means a failed value
                let floats = series.cast(&DataType::Float64)?;
                (floats.null_count() == series.null_count()).then_some(floats)
            }
            DataType::Null => Some(series.cast(&DataType::Float64)?),
            dt if dt.is_primitive_numeric() || dt.is_bool() => {
                Some(series.cast(&DataType::Float64)?)
            }
            _ => None,
        };

        match converted {
            Some(floats) => {
                out.with_column(floats)?;
                outcome.columns_converted.push(name.to_owned());
            }
            None => outcome.columns_failed.push(name.to_owned()),
        }
    }

    Ok((out, outcome))
}

/// Map a column to 1.0 / 0.0 / null.
///
/// `"Yes"` and `"No"` (exact case), numeric 1 and 0 and boolean true/false
/// are recognised. Anything else, including unexpected text, becomes null
/// rather than an error: a garbled flag is treated as unknown.
///
/// # Errors
///
/// Returns error if the column's values cannot be read.
pub fn yes_no_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let values = match series.dtype() {
        DataType::String => series
            .str()?
            .into_iter()
            .map(|v| match v {
                Some("Yes") => Some(1.0),
                Some("No") => Some(0.0),
                _ => None,
            })
            .collect(),
        DataType::Boolean => series
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| if b { 1.0 } else { 0.0 }))
            .collect(),
        dt if dt.is_primitive_numeric() => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| match v {
                Some(x) if x == 1.0 => Some(1.0),
                Some(x) if x == 0.0 => Some(0.0),
                _ => None,
            })
            .collect(),
        _ => vec![None; series.len()],
    };
    Ok(values)
}

/// Replace each listed column that is present by its yes/no encoding.
pub fn convert_yes_no(df: &DataFrame, columns: &[String]) -> Result<(DataFrame, StepOutcome)> {
    let mut out = df.clone();
    let mut outcome = StepOutcome::new(Step::ConvertYesNo);

    for name in columns {
        if !has_column(df, name) {
            continue;
        }
        let series = df.column(name)?.as_materialized_series();
        let flags = Series::new(series.name().clone(), yes_no_values(series)?);
        out.with_column(flags)?;
        outcome.columns_converted.push(name.clone());
    }

    Ok((out, outcome))
}

/// Lower-case a label and replace whitespace runs and slashes with `_`.
fn normalize_label(name: &str) -> Expr {
    col(name)
        .cast(DataType::String)
        .str()
        .to_lowercase()
        .str()
        .replace_all(lit(r"\s+"), lit("_"), false)
        .str()
        .replace_all(lit("/"), lit("_"), true)
}

/// Indicator prefix: the column name up to its first underscore.
pub fn dummy_prefix(column: &str) -> &str {
    column.split('_').next().unwrap_or(column)
}

/// Parameters for [`convert_dummies`].
#[derive(Debug, Clone, Copy)]
pub struct DummyOptions<'a> {
    pub max_categories: usize,
    /// Encoded whatever their cardinality
    pub always_encode: &'a [String],
}

fn indicator_names(prefix: &str, labels: &BTreeSet<String>) -> Vec<String> {
    labels.iter().map(|l| format!("{prefix}_{l}")).collect()
}

/// Dummy-encode categorical columns.
///
/// Every listed column that is present has its labels normalised (lower case,
/// whitespace runs and `/` replaced by `_`); the normalised labels stay in
/// the frame even for columns that are not encoded. A column is encoded when
/// its number of distinct non-null labels is at most `max_categories`, or it
/// is named in `always_encode`. Encoding replaces the column by one `UInt8`
/// indicator per label, named `<prefix>_<label>` where the prefix is the
/// column name up to its first underscore (`fiber_type` + `single` gives
/// `fiber_single`). Indicators are appended after the remaining columns.
///
/// If a short-prefixed indicator would clash with an existing column (two
/// sources sharing a prefix, e.g. `fiber_type` and `fiber_sub_type`), that
/// source column uses its full name as prefix instead.
///
/// # Errors
///
/// Returns [`PrepError::DuplicateColumn`] if even the full-name indicator
/// clashes, or a Polars error if normalisation fails.
pub fn convert_dummies(
    df: &DataFrame,
    columns: &[String],
    options: DummyOptions<'_>,
) -> Result<(DataFrame, StepOutcome)> {
    let mut outcome = StepOutcome::new(Step::ConvertDummies);
    let present: Vec<&String> = columns.iter().filter(|c| has_column(df, c)).collect();
    if present.is_empty() {
        return Ok((df.clone(), outcome));
    }

    let normalized = df
        .clone()
        .lazy()
        .with_columns(present.iter().map(|c| normalize_label(c)).collect::<Vec<_>>())
        .collect()?;

    let mut selected: Vec<(String, BTreeSet<String>)> = Vec::new();
    for name in present {
        let labels: BTreeSet<String> = normalized
            .column(name)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_owned)
            .collect();
        let always = options.always_encode.iter().any(|c| c == name);
        if labels.len() <= options.max_categories || always {
            selected.push((name.clone(), labels));
        }
    }

    let originals: Vec<String> = selected.iter().map(|(name, _)| name.clone()).collect();
    let mut out = without_columns(&normalized, &originals)?;

    for (name, labels) in &selected {
        let mut names = indicator_names(dummy_prefix(name), labels);
        if names.iter().any(|n| has_column(&out, n)) {
            names = indicator_names(name, labels);
            if let Some(clash) = names.iter().find(|n| has_column(&out, n)) {
                return Err(PrepError::DuplicateColumn(clash.clone()));
            }
        }

        let source = normalized.column(name)?.as_materialized_series().str()?;
        for (indicator, label) in names.iter().zip(labels) {
            let values: Vec<u8> = source
                .into_iter()
                .map(|v| u8::from(v == Some(label.as_str())))
                .collect();
            out.with_column(Series::new(indicator.as_str().into(), values))?;
            outcome.columns_added.push(indicator.clone());
        }
        outcome.columns_removed.push(name.clone());
    }

    Ok((out, outcome))
}
