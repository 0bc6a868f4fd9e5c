//! Row and column hygiene: steps that only remove or rename, never rewrite values.

use super::types::{Step, StepOutcome};
use super::{has_column, missing_count, present_values, without_columns};
use crate::error::{PrepError, Result};
use polars::prelude::*;

/// Remove every row whose identifier occurs more than once.
///
/// The whole ambiguous group goes, not just the extra copies: with two
/// records for the same request there is no telling which one is right.
/// Rows with a missing identifier never form a group and are kept.
///
/// # Errors
///
/// Returns [`PrepError::MissingColumn`] if `id_column` is absent.
pub fn remove_row_duplicates(df: &DataFrame, id_column: &str) -> Result<(DataFrame, StepOutcome)> {
    if !has_column(df, id_column) {
        return Err(PrepError::MissingColumn(id_column.to_owned()));
    }

    let ambiguous = col(id_column)
        .is_not_null()
        .and(col(id_column).is_duplicated());
    let out = df.clone().lazy().filter(ambiguous.not()).collect()?;

    let mut outcome = StepOutcome::new(Step::RemoveRowDuplicates);
    outcome.rows_removed = df.height() - out.height();
    Ok((out, outcome))
}

/// Names of columns in which every value is missing (null, or NaN in a
/// float column).
///
/// A frame with no rows has nothing to judge, so no column qualifies.
///
/// # Errors
///
/// Returns error if a float column cannot be checked for NaN.
pub fn all_null_columns(df: &DataFrame) -> Result<Vec<String>> {
    let mut nulls = Vec::new();
    if df.height() == 0 {
        return Ok(nulls);
    }
    for column in df.get_columns() {
        if missing_count(column.as_materialized_series())? == column.len() {
            nulls.push(column.name().to_string());
        }
    }
    Ok(nulls)
}

pub fn remove_column_nulls(df: &DataFrame) -> Result<(DataFrame, StepOutcome)> {
    let nulls = all_null_columns(df)?;
    let out = without_columns(df, &nulls)?;
    Ok((
        out,
        StepOutcome::with_removed_columns(Step::RemoveColumnNulls, nulls),
    ))
}

fn same_values(a: &Series, b: &Series) -> bool {
    a.len() == b.len() && a.equal_missing(b).map(|mask| mask.all()).unwrap_or(false)
}

/// Names of columns whose values repeat, row for row, in a later column of
/// the same dtype. Of each identical pair the earlier column is reported, so
/// the last copy survives removal.
///
/// Nulls at the same position count as equal.
pub fn duplicate_columns(df: &DataFrame) -> Vec<String> {
    let mut groups: Vec<(DataType, Vec<&Series>)> = Vec::new();
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        match groups.iter_mut().find(|(dtype, _)| *dtype == *series.dtype()) {
            Some((_, members)) => members.push(series),
            None => groups.push((series.dtype().clone(), vec![series])),
        }
    }

    let mut dups = Vec::new();
    for (_, members) in &groups {
        for (i, earlier) in members.iter().enumerate() {
            if members
                .iter()
                .skip(i + 1)
                .any(|later| same_values(earlier, later))
            {
                dups.push(earlier.name().to_string());
            }
        }
    }
    dups
}

/// Remove the columns reported by [`duplicate_columns`].
///
/// Columns sharing a *name* cannot occur: a Polars frame rejects duplicate
/// names when it is built.
pub fn remove_column_duplicates(df: &DataFrame) -> Result<(DataFrame, StepOutcome)> {
    let dups = duplicate_columns(df);
    let out = without_columns(df, &dups)?;
    Ok((
        out,
        StepOutcome::with_removed_columns(Step::RemoveColumnDuplicates, dups),
    ))
}

/// Names of columns holding exactly one distinct non-null, non-NaN value.
///
/// Variance is undefined for fewer than two rows; no column is reported then.
///
/// # Errors
///
/// Returns error if a column's distinct values cannot be counted.
pub fn no_variance_columns(df: &DataFrame) -> Result<Vec<String>> {
    if df.height() < 2 {
        return Ok(Vec::new());
    }
    let mut constant = Vec::new();
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        if present_values(series)?.n_unique()? == 1 {
            constant.push(series.name().to_string());
        }
    }
    Ok(constant)
}

pub fn remove_no_variance(df: &DataFrame) -> Result<(DataFrame, StepOutcome)> {
    let constant = no_variance_columns(df)?;
    let out = without_columns(df, &constant)?;
    Ok((
        out,
        StepOutcome::with_removed_columns(Step::RemoveNoVariance, constant),
    ))
}

/// Remove every listed column that is present; absent names are skipped.
pub fn remove_drops(df: &DataFrame, drop_cols: &[String]) -> Result<(DataFrame, StepOutcome)> {
    let present: Vec<String> = drop_cols
        .iter()
        .filter(|name| has_column(df, name))
        .cloned()
        .collect();
    let out = without_columns(df, &present)?;
    Ok((
        out,
        StepOutcome::with_removed_columns(Step::RemoveDrops, present),
    ))
}

/// Rename `from` to `to` if `from` is present.
///
/// # Errors
///
/// Returns [`PrepError::DuplicateColumn`] if another column is already named `to`.
pub fn rename_column(df: &DataFrame, from: &str, to: &str) -> Result<(DataFrame, StepOutcome)> {
    let mut outcome = StepOutcome::new(Step::RenameColumns);
    if !has_column(df, from) || from == to {
        return Ok((df.clone(), outcome));
    }
    if has_column(df, to) {
        return Err(PrepError::DuplicateColumn(to.to_owned()));
    }

    let mut out = df.clone();
    out.rename(from, to.into())?;
    outcome
        .columns_renamed
        .push((from.to_owned(), to.to_owned()));
    Ok((out, outcome))
}
