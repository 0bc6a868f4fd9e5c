use super::{names, owned};
use crate::prep::filtering::*;
use crate::prep::types::{CentralValue, ColumnKind};
use anyhow::Result;
use polars::prelude::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_summary_numeric_column() -> Result<()> {
    let df = df!("cost" => [Some(1.0), Some(3.0), None, Some(2.0)])?;

    let summaries = summary(&df)?;
    let cost = &summaries[0];

    assert_eq!(cost.kind, ColumnKind::Numeric);
    assert_eq!(cost.min, Some(1.0));
    assert_eq!(cost.max, Some(3.0));
    assert_eq!(cost.central, Some(CentralValue::Mean(2.0)));
    assert_eq!(cost.num_unique, 3);
    assert_eq!(cost.null_count, 1);
    assert!(approx(cost.null_fraction, 0.25));
    Ok(())
}

#[test]
fn test_summary_categorical_column() -> Result<()> {
    let df = df!(
        "unit" => [Some("each"), Some("month"), Some("each"), None],
        "tie" => [Some("b"), Some("a"), Some("a"), Some("b")]
    )?;

    let summaries = summary(&df)?;

    let unit = &summaries[0];
    assert_eq!(unit.kind, ColumnKind::Categorical);
    assert_eq!(unit.min, None);
    assert_eq!(unit.max, None);
    assert_eq!(unit.central, Some(CentralValue::MostCommon("each".to_owned())));
    assert_eq!(unit.num_unique, 2);
    assert_eq!(unit.null_count, 1);

    // Equal counts: the value seen first wins
    assert_eq!(
        summaries[1].central,
        Some(CentralValue::MostCommon("b".to_owned()))
    );
    Ok(())
}

#[test]
fn test_mostly_nulls_threshold_is_exclusive() -> Result<()> {
    let df = df!(
        "half" => [Some(1.0), None, Some(3.0), None],
        "quarter" => [Some(1.0), None, Some(3.0), Some(4.0)],
        "full" => [1.0, 2.0, 3.0, 4.0]
    )?;

    let (out, outcome) = remove_mostly_nulls(&df, 0.5)?;

    assert_eq!(outcome.columns_removed, owned(&["half"]));
    assert_eq!(names(&out), owned(&["quarter", "full"]));
    Ok(())
}

fn chunked(values: &[Option<f64>]) -> Float64Chunked {
    Float64Chunked::new("values".into(), values)
}

#[test]
fn test_pearson_correlation() {
    let x = chunked(&[Some(1.0), Some(2.0), Some(3.0), None]);
    let y = chunked(&[Some(2.0), Some(4.0), Some(6.0), Some(100.0)]);
    assert!(approx(pearson_correlation(&x, &y).unwrap(), 1.0));

    let reversed = chunked(&[Some(3.0), Some(2.0), Some(1.0), None]);
    assert!(approx(pearson_correlation(&x, &reversed).unwrap(), -1.0));

    let with_nan = chunked(&[Some(2.0), Some(f64::NAN), Some(6.0), Some(8.0)]);
    assert!(approx(pearson_correlation(&x, &with_nan).unwrap(), 1.0));

    let constant = chunked(&[Some(5.0), Some(5.0), Some(5.0), Some(5.0)]);
    assert_eq!(pearson_correlation(&x, &constant), None);

    let sparse = chunked(&[None, None, Some(1.0), Some(2.0)]);
    assert_eq!(pearson_correlation(&x, &sparse), None, "one complete pair");
}

#[test]
fn test_nan_counts_as_missing_in_summary() -> Result<()> {
    let df = df!(
        "frn_adjusted" => [1.0, 2.0, 3.0, 4.0],
        "mostly_nan" => [Some(1.0), Some(f64::NAN), Some(f64::NAN), None]
    )?;

    let summaries = summary(&df)?;
    let mostly_nan = &summaries[1];
    assert_eq!(mostly_nan.null_count, 3);
    assert!(approx(mostly_nan.null_fraction, 0.75));
    assert_eq!(mostly_nan.num_unique, 1);
    assert_eq!(mostly_nan.central, Some(CentralValue::Mean(1.0)));

    let (out, outcome) = remove_mostly_nulls(&df, 0.74)?;
    assert_eq!(outcome.columns_removed, owned(&["mostly_nan"]));
    assert_eq!(names(&out), owned(&["frn_adjusted"]));
    Ok(())
}

#[test]
fn test_correlated_drops_column_with_more_nulls() -> Result<()> {
    let df = df!(
        "alpha" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        "beta" => [Some(2.0), Some(4.0), Some(6.0), Some(8.0), None],
        "gamma" => [Some(5.0), Some(3.0), Some(4.0), Some(1.0), Some(2.0)]
    )?;

    let (out, outcome, drops) = remove_correlated(&df, 0.9)?;

    assert_eq!(outcome.columns_removed, owned(&["beta"]));
    assert_eq!(drops[0].kept, "alpha");
    assert!(approx(drops[0].correlation, 1.0));
    assert_eq!(names(&out), owned(&["gamma", "alpha"]));
    Ok(())
}

#[test]
fn test_correlated_tie_drops_alphabetically_smaller() -> Result<()> {
    let df = df!(
        "x" => [1.0, 2.0, 3.0],
        "y" => [2.0, 4.0, 6.0],
        "n" => [1, 2, 3]
    )?;

    let (out, outcome, _) = remove_correlated(&df, 0.9)?;

    assert_eq!(outcome.columns_removed, owned(&["x"]));
    // Integer columns take no part and the frame comes back in descending name order
    assert_eq!(names(&out), owned(&["y", "n"]));
    Ok(())
}

#[test]
fn test_correlated_below_threshold_keeps_all() -> Result<()> {
    let df = df!(
        "a" => [1.0, 2.0, 3.0, 4.0],
        "b" => [1.0, 3.0, 2.0, 4.0]
    )?;

    let (out, outcome, drops) = remove_correlated(&df, 0.9)?;

    assert!(outcome.columns_removed.is_empty());
    assert!(drops.is_empty());
    assert_eq!(names(&out), owned(&["b", "a"]));
    Ok(())
}

#[test]
fn test_correlation_matrix_counts_missing() -> Result<()> {
    let df = df!(
        "a" => [Some(1.0), None, Some(f64::NAN)],
        "label" => ["x", "y", "z"]
    )?;
    let matrix = correlation_matrix(&df)?;
    assert_eq!(matrix.columns, owned(&["a"]));
    assert_eq!(matrix.missing, vec![2]);
    Ok(())
}
