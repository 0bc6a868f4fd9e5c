use super::coercion::{self, DummyOptions};
use super::filtering::{self, CorrelationDrop};
use super::hygiene;
use super::types::{ColumnSummary, Mode, RunReport, Step, StepOutcome};
use crate::config::{ColumnCatalog, PrepConfig};
use crate::error::Result;
use polars::prelude::DataFrame;

/// Mutable context for one dataset passing through the pipeline.
///
/// Every step takes `&mut self`, replaces the held frame with its output and
/// returns what it changed. Steps are meant to run one after another on a
/// single thread; each observes the previous one's output.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    df: DataFrame,
    config: PrepConfig,
    catalog: ColumnCatalog,
}

impl Preprocessor {
    /// Wrap `df` with the funding-request column catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Config`](crate::error::PrepError::Config) if a
    /// threshold is outside `[0, 1]`.
    pub fn new(df: DataFrame, config: PrepConfig) -> Result<Self> {
        Self::with_catalog(df, config, ColumnCatalog::default())
    }

    /// Wrap `df` with a custom column catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Config`](crate::error::PrepError::Config) if a
    /// threshold is outside `[0, 1]`.
    pub fn with_catalog(df: DataFrame, config: PrepConfig, catalog: ColumnCatalog) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            df,
            config,
            catalog,
        })
    }

    /// The current, possibly transformed, dataset.
    pub fn data(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_data(self) -> DataFrame {
        self.df
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    fn verbose(&self) -> bool {
        self.config.verbose
    }

    fn commit(&mut self, (df, outcome): (DataFrame, StepOutcome)) -> StepOutcome {
        self.df = df;
        outcome
    }

    pub fn remove_row_duplicates(&mut self) -> Result<StepOutcome> {
        let result = hygiene::remove_row_duplicates(&self.df, &self.catalog.id_column)?;
        let outcome = self.commit(result);
        step_log!(self.verbose(), "Dropped {} duplicate rows", outcome.rows_removed);
        Ok(outcome)
    }

    pub fn remove_column_nulls(&mut self) -> Result<StepOutcome> {
        let result = hygiene::remove_column_nulls(&self.df)?;
        let outcome = self.commit(result);
        step_log!(self.verbose(), "Dropped null columns: {:?}", outcome.columns_removed);
        Ok(outcome)
    }

    /// Columns that duplicate a later column value for value.
    pub fn duplicate_columns(&self) -> Vec<String> {
        hygiene::duplicate_columns(&self.df)
    }

    pub fn remove_column_duplicates(&mut self) -> Result<StepOutcome> {
        let result = hygiene::remove_column_duplicates(&self.df)?;
        let outcome = self.commit(result);
        step_log!(
            self.verbose(),
            "Dropped duplicate columns: {:?}",
            outcome.columns_removed
        );
        Ok(outcome)
    }

    pub fn remove_no_variance(&mut self) -> Result<StepOutcome> {
        let result = hygiene::remove_no_variance(&self.df)?;
        let outcome = self.commit(result);
        if !outcome.columns_removed.is_empty() {
            step_log!(
                self.verbose(),
                "Dropped 0-variance columns: {:?}",
                outcome.columns_removed
            );
        }
        Ok(outcome)
    }

    /// Remove the catalog's drop list.
    pub fn remove_drops(&mut self) -> Result<StepOutcome> {
        let result = hygiene::remove_drops(&self.df, &self.catalog.drop_cols)?;
        let outcome = self.commit(result);
        step_log!(self.verbose(), "Dropped: {:?}", outcome.columns_removed);
        Ok(outcome)
    }

    pub fn rename_col(&mut self, from: &str, to: &str) -> Result<StepOutcome> {
        let result = hygiene::rename_column(&self.df, from, to)?;
        let outcome = self.commit(result);
        if !outcome.columns_renamed.is_empty() {
            step_log!(self.verbose(), "Renamed {from} to {to}");
        }
        Ok(outcome)
    }

    /// Apply the catalog's renames in order.
    pub fn rename_columns(&mut self) -> Result<StepOutcome> {
        let mut outcome = StepOutcome::new(Step::RenameColumns);
        for rename in self.catalog.renames.clone() {
            let done = self.rename_col(&rename.from, &rename.to)?;
            outcome.columns_renamed.extend(done.columns_renamed);
        }
        Ok(outcome)
    }

    /// Convert every column not in `exclude` to float where possible.
    pub fn convert_floats(&mut self, exclude: &[String]) -> Result<StepOutcome> {
        let result = coercion::convert_floats(&self.df, exclude)?;
        let outcome = self.commit(result);
        for name in &outcome.columns_converted {
            step_log!(self.verbose(), "{name} converted to float");
        }
        for name in &outcome.columns_failed {
            tracing::warn!("{name} float conversion failed");
        }
        Ok(outcome)
    }

    /// Float conversion with the catalog's categorical columns excluded.
    pub fn convert_floats_raw(&mut self) -> Result<StepOutcome> {
        let exclude = self.catalog.cat_cols.clone();
        self.convert_floats(&exclude)
    }

    /// Yes/no conversion of a single column; absent columns are skipped.
    pub fn convert_yn(&mut self, column: &str) -> Result<StepOutcome> {
        self.convert_yn_columns(&[column.to_owned()])
    }

    fn convert_yn_columns(&mut self, columns: &[String]) -> Result<StepOutcome> {
        let result = coercion::convert_yes_no(&self.df, columns)?;
        let outcome = self.commit(result);
        for name in &outcome.columns_converted {
            step_log!(self.verbose(), "{name} converted to 1/0 flag");
        }
        Ok(outcome)
    }

    /// Yes/no conversion of the catalog's flag columns.
    pub fn convert_yn_raw(&mut self) -> Result<StepOutcome> {
        let columns = self.catalog.yn_cols.clone();
        self.convert_yn_columns(&columns)
    }

    pub fn convert_dummies(&mut self, columns: &[String]) -> Result<StepOutcome> {
        let options = DummyOptions {
            max_categories: self.config.max_categories,
            always_encode: &self.catalog.always_encode,
        };
        let result = coercion::convert_dummies(&self.df, columns, options)?;
        let outcome = self.commit(result);
        step_log!(self.verbose(), "Dummified columns: {:?}", outcome.columns_removed);
        Ok(outcome)
    }

    /// Dummy-encode the catalog's categorical columns, except yes/no flags.
    pub fn convert_dummies_raw(&mut self) -> Result<StepOutcome> {
        let columns = self.catalog.dummy_candidates();
        self.convert_dummies(&columns)
    }

    pub fn summary(&self) -> Result<Vec<ColumnSummary>> {
        let (rows, columns) = self.df.shape();
        step_log!(self.verbose(), "Summarising dataset of shape ({rows}, {columns})");
        filtering::summary(&self.df)
    }

    pub fn remove_mostly_nulls(&mut self) -> Result<StepOutcome> {
        let result = filtering::remove_mostly_nulls(&self.df, self.config.null_threshold)?;
        let outcome = self.commit(result);
        step_log!(
            self.verbose(),
            "Dropped columns >= {}% NULL: {:?}",
            self.config.null_threshold * 100.0,
            outcome.columns_removed
        );
        Ok(outcome)
    }

    pub fn remove_correlated(&mut self) -> Result<StepOutcome> {
        let (df, outcome, drops) =
            filtering::remove_correlated(&self.df, self.config.corr_threshold)?;
        self.df = df;
        for CorrelationDrop {
            dropped,
            kept,
            correlation,
        } in &drops
        {
            step_log!(
                self.verbose(),
                "Dropped {dropped} due to {correlation:.3} correlation with {kept}"
            );
        }
        Ok(outcome)
    }

    /// Run a single step with catalog-driven arguments.
    pub fn apply_step(&mut self, step: Step) -> Result<StepOutcome> {
        match step {
            Step::RemoveRowDuplicates => self.remove_row_duplicates(),
            Step::RemoveColumnNulls => self.remove_column_nulls(),
            Step::RemoveColumnDuplicates => self.remove_column_duplicates(),
            Step::RemoveNoVariance => self.remove_no_variance(),
            Step::RemoveDrops => self.remove_drops(),
            Step::RenameColumns => self.rename_columns(),
            Step::ConvertFloats => self.convert_floats_raw(),
            Step::ConvertYesNo => self.convert_yn_raw(),
            Step::ConvertDummies => self.convert_dummies_raw(),
            Step::RemoveMostlyNulls => self.remove_mostly_nulls(),
            Step::RemoveCorrelated => self.remove_correlated(),
        }
    }

    /// Run every step of `mode` in order, stopping at the first error.
    pub fn apply(&mut self, mode: Mode) -> Result<RunReport> {
        let start = std::time::Instant::now();
        let (rows_before, columns_before) = self.df.shape();

        let mut steps = Vec::with_capacity(mode.steps().len());
        for &step in mode.steps() {
            steps.push(self.apply_step(step)?);
        }

        let (rows_after, columns_after) = self.df.shape();
        let report = RunReport {
            mode,
            rows_before,
            columns_before,
            rows_after,
            columns_after,
            steps,
            duration: start.elapsed(),
        };
        step_log!(self.verbose(), "{}", report.summary());
        Ok(report)
    }

    /// Full training-time sequence.
    pub fn apply_all_raw(&mut self) -> Result<RunReport> {
        self.apply(Mode::Raw)
    }

    /// Prediction-time sequence that keeps the trained column schema.
    pub fn apply_all_predict(&mut self) -> Result<RunReport> {
        self.apply(Mode::Predict)
    }
}
