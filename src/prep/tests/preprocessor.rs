use super::{floats, names, owned};
use crate::config::{ColumnCatalog, PrepConfig};
use crate::error::PrepError;
use crate::prep::{Mode, Preprocessor, Step};
use anyhow::Result;
use polars::prelude::*;

fn example_frame() -> PolarsResult<DataFrame> {
    df!(
        "frn_adjusted" => [1, 1, 2],
        "basic_firewall_protection" => ["Yes", "No", "Yes"],
        "fiber_type" => ["Single", "Single", "Multi"],
        "cost" => [100.0, 100.0, 200.0]
    )
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let config = PrepConfig {
        corr_threshold: -0.1,
        ..Default::default()
    };
    let err = Preprocessor::new(example_frame()?, config).unwrap_err();
    assert!(matches!(err, PrepError::Config(_)));
    Ok(())
}

#[test]
fn test_raw_pipeline_on_example() -> Result<()> {
    let mut prep = Preprocessor::new(example_frame()?, PrepConfig::default())?;

    let report = prep.apply_all_raw()?;

    let df = prep.data();
    assert_eq!(report.rows_before, 3);
    assert_eq!(df.height(), 1, "both rows with frn_adjusted=1 are removed");
    assert_eq!(floats(df, "frn_adjusted"), vec![Some(2.0)]);
    assert_eq!(floats(df, "basic_firewall_protection"), vec![Some(1.0)]);
    assert_eq!(floats(df, "cost"), vec![Some(200.0)]);
    let fiber: Vec<Option<u8>> = df
        .column("fiber_multi")?
        .as_materialized_series()
        .u8()?
        .into_iter()
        .collect();
    assert_eq!(fiber, vec![Some(1)]);
    assert!(df.column("fiber_type").is_err());
    Ok(())
}

#[test]
fn test_report_follows_mode_order() -> Result<()> {
    let mut prep = Preprocessor::new(example_frame()?, PrepConfig::default())?;
    let report = prep.apply(Mode::Raw)?;

    let steps: Vec<Step> = report.steps.iter().map(|o| o.step).collect();
    assert_eq!(steps, Mode::Raw.steps());
    assert_eq!(
        report.outcome(Step::RemoveRowDuplicates).unwrap().rows_removed,
        2
    );
    Ok(())
}

#[test]
fn test_predict_skips_statistical_filters() -> Result<()> {
    let frame = || {
        df!(
            "frn_adjusted" => [1, 2, 3, 4],
            "constant" => [7.0, 7.0, 7.0, 7.0],
            "cost" => [1.0, 2.0, 3.0, 4.0],
            "cost_copy_scaled" => [2.0, 4.0, 6.0, 8.0],
            "mostly_missing" => [Some(1.0), None, None, None]
        )
    };

    let mut predict = Preprocessor::new(frame()?, PrepConfig::default())?;
    let report = predict.apply_all_predict()?;
    assert_eq!(report.steps.len(), Mode::Predict.steps().len());
    assert_eq!(
        names(predict.data()),
        owned(&[
            "frn_adjusted",
            "constant",
            "cost",
            "cost_copy_scaled",
            "mostly_missing"
        ])
    );

    let mut raw = Preprocessor::new(frame()?, PrepConfig::default())?;
    raw.apply_all_raw()?;
    let kept = names(raw.data());
    assert!(!kept.contains(&"constant".to_owned()));
    assert!(!kept.contains(&"mostly_missing".to_owned()));
    // cost, cost_copy_scaled and frn_adjusted are perfectly correlated; one survives
    assert_eq!(kept, owned(&["frn_adjusted"]));
    Ok(())
}

#[test]
fn test_purpose_adj_replaces_purpose() -> Result<()> {
    let df = df!(
        "frn_adjusted" => [1, 2],
        "purpose" => ["Internet", "Data"],
        "purpose_adj" => ["Internet Access", "Data Transmission"]
    )?;

    let mut prep = Preprocessor::new(df, PrepConfig::default())?;
    prep.apply_all_predict()?;

    assert_eq!(
        names(prep.data()),
        owned(&[
            "frn_adjusted",
            "purpose_data_transmission",
            "purpose_internet_access"
        ])
    );
    Ok(())
}

#[test]
fn test_custom_catalog() -> Result<()> {
    let df = df!(
        "row_id" => [1, 1, 2, 3],
        "kind" => ["a", "a", "b", "c"],
        "ok" => ["Yes", "Yes", "No", "Yes"]
    )?;
    let catalog = ColumnCatalog {
        id_column: "row_id".to_owned(),
        drop_cols: Vec::new(),
        yn_cols: owned(&["ok"]),
        cat_cols: owned(&["kind", "ok"]),
        always_encode: Vec::new(),
        renames: Vec::new(),
    };

    let mut prep = Preprocessor::with_catalog(df, PrepConfig::default(), catalog)?;
    prep.apply_all_predict()?;

    let df = prep.into_data();
    assert_eq!(names(&df), owned(&["row_id", "ok", "kind_b", "kind_c"]));
    assert_eq!(floats(&df, "ok"), vec![Some(0.0), Some(1.0)]);
    Ok(())
}

#[test]
fn test_missing_id_column_stops_pipeline() -> Result<()> {
    let df = df!("cost" => [1.0, 2.0])?;
    let mut prep = Preprocessor::new(df, PrepConfig::default())?;
    assert!(matches!(
        prep.apply_all_raw(),
        Err(PrepError::MissingColumn(_))
    ));
    Ok(())
}

#[test]
fn test_duplicate_columns_reported_without_mutation() -> Result<()> {
    let df = df!("frn_adjusted" => [1, 2], "a" => [1.0, 2.0], "b" => [1.0, 2.0])?;
    let prep = Preprocessor::new(df, PrepConfig::default())?;
    assert_eq!(prep.duplicate_columns(), owned(&["a"]));
    assert_eq!(prep.data().width(), 3);
    Ok(())
}
