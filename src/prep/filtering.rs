//! Column statistics and the statistical filters built on them.

use super::types::{CentralValue, ColumnKind, ColumnSummary, Step, StepOutcome};
use super::{missing_count, present_values, without_columns};
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Most frequent value of a null-free string series; ties go to the value
/// seen first.
fn most_common(values: &Series) -> Result<Option<String>> {
    if values.is_empty() {
        return Ok(None);
    }
    let counts = values.value_counts(true, false, "counts".into(), false)?;
    let labels = counts.column(values.name().as_str())?.as_materialized_series().str()?;
    let tally = counts
        .column("counts")?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    let tally = tally.u64()?;
    let Some(top) = tally.get(0) else {
        return Ok(None);
    };

    let leaders: Vec<&str> = labels
        .into_iter()
        .zip(tally)
        .filter(|(_, count)| *count == Some(top))
        .filter_map(|(label, _)| label)
        .collect();
    let first_seen = values.take(&values.arg_unique()?)?;
    Ok(first_seen
        .str()?
        .into_iter()
        .flatten()
        .find(|v| leaders.contains(v))
        .map(str::to_owned))
}

/// Summarise one column. NaN in a float column counts as missing.
///
/// # Errors
///
/// Returns error if the column cannot be cast for inspection.
pub fn summarize_column(series: &Series, row_count: usize) -> Result<ColumnSummary> {
    let kind = ColumnKind::of(series.dtype());
    let null_count = missing_count(series)?;
    let null_fraction = if row_count == 0 {
        0.0
    } else {
        null_count as f64 / row_count as f64
    };
    let present = present_values(series)?;
    let num_unique = present.n_unique()?;

    let (min, max, central) = if kind.is_numeric_like() {
        let floats = present.cast(&DataType::Float64)?;
        let ca = floats.f64()?;
        (ca.min(), ca.max(), ca.mean().map(CentralValue::Mean))
    } else {
        let strings = present.cast(&DataType::String)?;
        (None, None, most_common(&strings)?.map(CentralValue::MostCommon))
    };

    Ok(ColumnSummary {
        name: series.name().to_string(),
        dtype: series.dtype().to_string(),
        kind,
        min,
        max,
        central,
        num_unique,
        null_count,
        null_fraction,
    })
}

/// One summary per column, in column order.
///
/// # Errors
///
/// Returns error if any column fails to summarise.
pub fn summary(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
    let row_count = df.height();
    df.get_columns()
        .iter()
        .map(|c| summarize_column(c.as_materialized_series(), row_count))
        .collect()
}

/// Keep only columns whose null fraction is strictly below `null_threshold`.
///
/// # Errors
///
/// Returns error if the summary cannot be computed.
pub fn remove_mostly_nulls(
    df: &DataFrame,
    null_threshold: f64,
) -> Result<(DataFrame, StepOutcome)> {
    let mostly_null: Vec<String> = summary(df)?
        .into_iter()
        .filter(|s| s.null_fraction >= null_threshold)
        .map(|s| s.name)
        .collect();
    let out = without_columns(df, &mostly_null)?;
    Ok((
        out,
        StepOutcome::with_removed_columns(Step::RemoveMostlyNulls, mostly_null),
    ))
}

/// Pearson correlation over the rows where both values are present.
///
/// `None` when fewer than two such rows exist or either side is constant.
pub fn pearson_correlation(x: &Float64Chunked, y: &Float64Chunked) -> Option<f64> {
    let complete = x.is_not_null() & y.is_not_null() & x.is_not_nan() & y.is_not_nan();
    let x = x.filter(&complete).ok()?;
    let y = y.filter(&complete).ok()?;
    if x.len() < 2 {
        return None;
    }
    cov::pearson_corr(&x, &y).filter(|r| r.is_finite())
}

/// Pairwise correlations between float columns.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `data[i][j]`, `None` where the correlation is undefined
    pub data: Vec<Vec<Option<f64>>>,
    /// Missing (null or NaN) values per column
    pub missing: Vec<usize>,
}

/// Correlation matrix of the `Float32`/`Float64` columns, in column order.
///
/// # Errors
///
/// Returns error if a float column cannot be read.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let mut columns = Vec::new();
    let mut missing = Vec::new();
    let mut values: Vec<Float64Chunked> = Vec::new();
    for column in df.get_columns() {
        if !column.dtype().is_float() {
            continue;
        }
        let series = column.as_materialized_series();
        let floats = series.cast(&DataType::Float64)?;
        columns.push(column.name().to_string());
        missing.push(missing_count(series)?);
        values.push(floats.f64()?.clone());
    }

    let data = values
        .iter()
        .enumerate()
        .map(|(i, x)| {
            values
                .iter()
                .enumerate()
                .map(|(j, y)| if i == j { Some(1.0) } else { pearson_correlation(x, y) })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix {
        columns,
        data,
        missing,
    })
}

/// A column removed for being correlated with one that stayed.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CorrelationDrop {
    pub dropped: String,
    pub kept: String,
    pub correlation: f64,
}

/// Drop one column of every float pair with |r| >= `corr_threshold`.
///
/// The frame is first reordered by descending column name, which fixes the
/// order pairs are visited in: for `i` over the float columns and `j < i`,
/// the column with more missing values is dropped; on a tie the `i` column
/// (the alphabetically smaller name) goes. The matrix is computed once, so a
/// column dropped by an earlier pair still takes part in later comparisons,
/// but is only removed once.
///
/// # Errors
///
/// Returns error if the frame cannot be reordered or read.
#[expect(clippy::indexing_slicing)]
pub fn remove_correlated(
    df: &DataFrame,
    corr_threshold: f64,
) -> Result<(DataFrame, StepOutcome, Vec<CorrelationDrop>)> {
    let mut names: Vec<PlSmallStr> = df.get_column_names().into_iter().cloned().collect();
    names.sort_by(|a, b| b.as_str().cmp(a.as_str()));
    let sorted = df.select(names)?;

    let matrix = correlation_matrix(&sorted)?;
    let mut drops: Vec<CorrelationDrop> = Vec::new();
    for (i, row) in matrix.data.iter().enumerate() {
        for (j, r) in row.iter().enumerate().take(i) {
            let Some(r) = *r else { continue };
            if r.abs() < corr_threshold {
                continue;
            }
            let (drop, keep) = if matrix.missing[j] > matrix.missing[i] {
                (j, i)
            } else {
                (i, j)
            };
            let dropped = &matrix.columns[drop];
            if drops.iter().any(|d| d.dropped == *dropped) {
                continue;
            }
            drops.push(CorrelationDrop {
                dropped: dropped.clone(),
                kept: matrix.columns[keep].clone(),
                correlation: r,
            });
        }
    }

    let removed: Vec<String> = drops.iter().map(|d| d.dropped.clone()).collect();
    let out = without_columns(&sorted, &removed)?;
    Ok((
        out,
        StepOutcome::with_removed_columns(Step::RemoveCorrelated, removed),
        drops,
    ))
}
