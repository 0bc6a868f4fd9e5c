use super::{names, owned};
use crate::error::PrepError;
use crate::prep::hygiene::*;
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_row_duplicates_drop_whole_group() -> Result<()> {
    let df = df!(
        "frn_adjusted" => [1, 1, 2, 3, 3, 3, 4],
        "cost" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]
    )?;

    let (out, outcome) = remove_row_duplicates(&df, "frn_adjusted")?;

    assert_eq!(outcome.rows_removed, 5, "groups of 2 and 3 are removed entirely");
    let ids: Vec<Option<i32>> = out
        .column("frn_adjusted")?
        .as_materialized_series()
        .i32()?
        .into_iter()
        .collect();
    assert_eq!(ids, vec![Some(2), Some(4)]);
    Ok(())
}

#[test]
fn test_row_duplicates_keep_missing_ids() -> Result<()> {
    let df = df!("frn_adjusted" => [Some(1), None, None, Some(2)])?;

    let (out, outcome) = remove_row_duplicates(&df, "frn_adjusted")?;

    assert_eq!(outcome.rows_removed, 0);
    assert_eq!(out.height(), 4);
    Ok(())
}

#[test]
fn test_row_duplicates_require_id_column() -> Result<()> {
    let df = df!("cost" => [1.0])?;
    let err = remove_row_duplicates(&df, "frn_adjusted").unwrap_err();
    assert!(matches!(err, PrepError::MissingColumn(name) if name == "frn_adjusted"));
    Ok(())
}

#[test]
fn test_nan_counts_as_missing_for_null_columns() -> Result<()> {
    let df = df!(
        "all_nan" => [f64::NAN, f64::NAN, f64::NAN],
        "nan_and_null" => [Some(f64::NAN), None, Some(f64::NAN)],
        "one_value" => [Some(f64::NAN), Some(2.0), None]
    )?;

    assert_eq!(all_null_columns(&df)?, owned(&["all_nan", "nan_and_null"]));
    let (out, _) = remove_column_nulls(&df)?;
    assert_eq!(names(&out), owned(&["one_value"]));
    Ok(())
}

#[test]
fn test_all_null_columns_removed() -> Result<()> {
    let df = df!(
        "empty" => [None::<f64>, None, None],
        "sparse" => [None, Some(2.0), None]
    )?;

    let (out, outcome) = remove_column_nulls(&df)?;

    assert_eq!(outcome.columns_removed, owned(&["empty"]));
    assert_eq!(names(&out), owned(&["sparse"]));
    assert!(
        out.column("sparse")?
            .as_materialized_series()
            .equals_missing(df.column("sparse")?.as_materialized_series())
    );
    Ok(())
}

#[test]
fn test_duplicate_columns_keep_later_copy() -> Result<()> {
    let df = df!(
        "first" => [1, 2, 3],
        "second" => [1, 2, 3],
        "as_float" => [1.0, 2.0, 3.0],
        "other" => [3, 2, 1]
    )?;

    assert_eq!(duplicate_columns(&df), owned(&["first"]));

    let (out, outcome) = remove_column_duplicates(&df)?;
    assert_eq!(outcome.columns_removed, owned(&["first"]));
    assert_eq!(names(&out), owned(&["second", "as_float", "other"]));
    Ok(())
}

#[test]
fn test_duplicate_columns_treat_nulls_as_equal() -> Result<()> {
    let df = df!(
        "x" => [Some("a"), None, Some("b")],
        "y" => [Some("a"), None, Some("b")],
        "z" => [Some("a"), Some("c"), Some("b")]
    )?;
    assert_eq!(duplicate_columns(&df), owned(&["x"]));
    Ok(())
}

#[test]
fn test_no_variance_columns() -> Result<()> {
    let df = df!(
        "constant" => [5, 5, 5],
        "two_values" => [1, 2, 1],
        "constant_with_nulls" => [Some(7.0), None, Some(7.0)]
    )?;

    let (out, outcome) = remove_no_variance(&df)?;

    assert_eq!(
        outcome.columns_removed,
        owned(&["constant", "constant_with_nulls"])
    );
    assert_eq!(names(&out), owned(&["two_values"]));
    Ok(())
}

#[test]
fn test_no_variance_needs_two_rows() -> Result<()> {
    let df = df!("a" => [1], "b" => ["x"])?;
    let (out, outcome) = remove_no_variance(&df)?;
    assert!(outcome.is_noop());
    assert_eq!(out.width(), 2);
    Ok(())
}

#[test]
fn test_remove_drops_tolerates_absent_columns() -> Result<()> {
    let df = df!("id" => [1, 2], "cost" => [1.0, 2.0])?;

    let (out, outcome) = remove_drops(&df, &owned(&["id", "not_there"]))?;

    assert_eq!(outcome.columns_removed, owned(&["id"]));
    assert_eq!(names(&out), owned(&["cost"]));
    Ok(())
}

#[test]
fn test_rename_column() -> Result<()> {
    let df = df!("purpose_adj" => ["a"], "cost" => [1.0])?;

    let (out, outcome) = rename_column(&df, "purpose_adj", "purpose")?;
    assert_eq!(names(&out), owned(&["purpose", "cost"]));
    assert_eq!(
        outcome.columns_renamed,
        vec![("purpose_adj".to_owned(), "purpose".to_owned())]
    );

    let (same, outcome) = rename_column(&out, "missing", "other")?;
    assert!(outcome.is_noop());
    assert_eq!(names(&same), owned(&["purpose", "cost"]));
    Ok(())
}

#[test]
fn test_rename_onto_existing_column_fails() -> Result<()> {
    let df = df!("purpose_adj" => ["a"], "purpose" => ["b"])?;
    let err = rename_column(&df, "purpose_adj", "purpose").unwrap_err();
    assert!(matches!(err, PrepError::DuplicateColumn(name) if name == "purpose"));
    Ok(())
}
