use polars::prelude::DataType;
use serde::{Deserialize, Serialize};

/// How a column is treated by kind-sensitive steps.
///
/// Derived once from the Polars dtype, which is fixed when the dataset is
/// loaded and changes only when a step explicitly rewrites a column.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug, Hash)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Categorical,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnKind {
    pub fn of(dtype: &DataType) -> Self {
        if dtype.is_bool() {
            Self::Boolean
        } else if dtype.is_primitive_numeric() {
            Self::Numeric
        } else {
            Self::Categorical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Boolean => "Boolean",
            Self::Categorical => "Categorical",
        }
    }

    /// Numeric and boolean columns are summarised with min/max/mean.
    pub fn is_numeric_like(&self) -> bool {
        matches!(self, Self::Numeric | Self::Boolean)
    }
}

/// One transformation of the pipeline.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    RemoveRowDuplicates,
    RemoveColumnNulls,
    RemoveColumnDuplicates,
    RemoveNoVariance,
    RemoveDrops,
    RenameColumns,
    ConvertFloats,
    ConvertYesNo,
    ConvertDummies,
    RemoveMostlyNulls,
    RemoveCorrelated,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemoveRowDuplicates => "remove_row_duplicates",
            Self::RemoveColumnNulls => "remove_column_nulls",
            Self::RemoveColumnDuplicates => "remove_column_duplicates",
            Self::RemoveNoVariance => "remove_no_variance",
            Self::RemoveDrops => "remove_drops",
            Self::RenameColumns => "rename_columns",
            Self::ConvertFloats => "convert_floats",
            Self::ConvertYesNo => "convert_yes_no",
            Self::ConvertDummies => "convert_dummies",
            Self::RemoveMostlyNulls => "remove_mostly_nulls",
            Self::RemoveCorrelated => "remove_correlated",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which stage sequence to run.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Training data: the full sequence, including the data-dependent filters.
    #[default]
    Raw,
    /// Data to score with an already trained model. Zero-variance,
    /// mostly-null and correlation filtering are left out because they would
    /// derive a different column set from new data.
    Predict,
}

const RAW_STEPS: &[Step] = &[
    Step::RemoveRowDuplicates,
    Step::RemoveColumnNulls,
    Step::RemoveColumnDuplicates,
    Step::RemoveNoVariance,
    Step::RemoveDrops,
    Step::RenameColumns,
    Step::ConvertFloats,
    Step::ConvertYesNo,
    Step::ConvertDummies,
    Step::RemoveMostlyNulls,
    Step::RemoveCorrelated,
];

const PREDICT_STEPS: &[Step] = &[
    Step::RemoveRowDuplicates,
    Step::RemoveColumnNulls,
    Step::RemoveColumnDuplicates,
    Step::RemoveDrops,
    Step::RenameColumns,
    Step::ConvertFloats,
    Step::ConvertYesNo,
    Step::ConvertDummies,
];

impl Mode {
    /// The ordered steps for this mode.
    pub fn steps(&self) -> &'static [Step] {
        match self {
            Self::Raw => RAW_STEPS,
            Self::Predict => PREDICT_STEPS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Predict => "predict",
        }
    }
}

/// What a single step did to the dataset.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct StepOutcome {
    pub step: Step,
    pub rows_removed: usize,
    pub columns_removed: Vec<String>,
    pub columns_added: Vec<String>,
    pub columns_converted: Vec<String>,
    /// Columns the step tried and left untouched (e.g. float conversion failed)
    pub columns_failed: Vec<String>,
    /// `(from, to)` pairs
    pub columns_renamed: Vec<(String, String)>,
}

impl StepOutcome {
    pub fn new(step: Step) -> Self {
        Self {
            step,
            rows_removed: 0,
            columns_removed: Vec::new(),
            columns_added: Vec::new(),
            columns_converted: Vec::new(),
            columns_failed: Vec::new(),
            columns_renamed: Vec::new(),
        }
    }

    pub fn with_removed_columns(step: Step, columns: Vec<String>) -> Self {
        Self {
            columns_removed: columns,
            ..Self::new(step)
        }
    }

    /// True when the step left the dataset exactly as it found it.
    pub fn is_noop(&self) -> bool {
        self.rows_removed == 0
            && self.columns_removed.is_empty()
            && self.columns_added.is_empty()
            && self.columns_converted.is_empty()
            && self.columns_renamed.is_empty()
    }
}

/// A column's mean (numeric) or most frequent value (categorical).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CentralValue {
    Mean(f64),
    MostCommon(String),
}

/// Per-column statistics used by the mostly-null filter.
///
/// `min`, `max` are `None` for categorical columns ("not applicable") and for
/// numeric columns with no non-null values.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub kind: ColumnKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub central: Option<CentralValue>,
    pub num_unique: usize,
    pub null_count: usize,
    pub null_fraction: f64,
}

/// Result of running a whole mode.
#[derive(Clone, Serialize, Debug)]
pub struct RunReport {
    pub mode: Mode,
    pub rows_before: usize,
    pub columns_before: usize,
    pub rows_after: usize,
    pub columns_after: usize,
    pub steps: Vec<StepOutcome>,
    #[serde(with = "duration_serde", rename = "duration")]
    pub duration: std::time::Duration,
}

impl RunReport {
    pub fn summary(&self) -> String {
        format!(
            "{} pipeline completed: rows {} → {}, columns {} → {}, {} steps, {:.2}s",
            self.mode.as_str(),
            self.rows_before,
            self.rows_after,
            self.columns_before,
            self.columns_after,
            self.steps.len(),
            self.duration.as_secs_f64()
        )
    }

    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps.iter().find(|o| o.step == step)
    }
}

mod duration_serde {
    use serde::{Serializer, ser::SerializeStruct as _};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Duration", 2)?;
        state.serialize_field("secs", &duration.as_secs())?;
        state.serialize_field("nanos", &duration.subsec_nanos())?;
        state.end()
    }
}
