//! Pipeline parameters and the column catalog.
//!
//! [`PrepConfig`] holds the four tuning parameters. [`ColumnCatalog`] holds
//! the dataset-specific column knowledge (which columns to drop, which are
//! yes/no flags, which are categorical). The catalog is plain data: the
//! default is the funding-request schema, and other schemas load their own
//! lists from JSON.

use crate::error::{PrepError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning parameters attached to a [`Preprocessor`](crate::prep::Preprocessor)
/// at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Emit step diagnostics at `info` instead of `debug`
    pub verbose: bool,

    /// Largest cardinality a categorical column may have and still be
    /// dummy-encoded (override columns are encoded regardless)
    pub max_categories: usize,

    /// Columns whose null fraction is at or above this are dropped
    pub null_threshold: f64,

    /// Float column pairs with |Pearson r| at or above this are pruned
    pub corr_threshold: f64,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            max_categories: 12,
            null_threshold: 0.74,
            corr_threshold: 0.9,
        }
    }
}

impl PrepConfig {
    /// Check both thresholds lie in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Config`] naming the offending parameter.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("null_threshold", self.null_threshold),
            ("corr_threshold", self.corr_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PrepError::Config(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// A column rename applied after the drop list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Static knowledge about a dataset's columns.
///
/// Names listed here but absent from a dataset are skipped silently, so one
/// catalog can serve extracts with slightly different schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnCatalog {
    /// Row identifier used for duplicate detection
    pub id_column: String,

    /// Columns that are always removed (identifiers, dates, denormalized fields)
    pub drop_cols: Vec<String>,

    /// Columns holding "Yes"/"No" values
    pub yn_cols: Vec<String>,

    /// Columns excluded from float conversion and considered for dummy encoding
    pub cat_cols: Vec<String>,

    /// Categorical columns encoded even above `max_categories`
    pub always_encode: Vec<String>,

    /// Renames applied, in order, after the drop list
    pub renames: Vec<Rename>,
}

const ID_COLUMN: &str = "frn_adjusted";

// `purpose` is redefined upstream as `purpose_adj`, so the raw field is dropped
// and the adjusted one renamed over it.
const DROP_COLS: &[&str] = &[
    "id",
    "frn",
    "frn_number_from_the_previous_year",
    "application_number",
    "ben",
    "account_number",
    "service_provider_number",
    "establishing_fcc_form470",
    "user_entered_establishing_fcc_form470",
    "line_item",
    "award_date",
    "expiration_date",
    "contract_expiration_date",
    "service_start_date",
    "model",
    "contract_number",
    "restriction_citation",
    "other_manufacture",
    "download_speed",
    "download_speed_units",
    "upload_speed",
    "upload_speed_units",
    "burstable_speed",
    "burstable_speed_units",
    "purpose",
    "billed_entity_name",
    "type_of_product",
    "updated_at",
    "created_at",
    "extended_contract_expiration_date",
    "window_status",
];

const YN_COLS: &[&str] = &[
    "connection_supports_school_library_or_nif",
    "includes_voluntary_extensions",
    "basic_firewall_protection",
    "based_on_state_master_contract",
    "based_on_multiple_award_schedule",
    "pricing_confidentiality",
    "lease_or_non_purchase_agreement",
    "connected_directly_to_school_library_or_nif",
    "was_fcc_form470_posted",
    "frn_previous_year_exists",
];

const CAT_COLS: &[&str] = &[
    "pricing_confidentiality_type",
    "fiber_type",
    "connection_used_by",
    "fiber_sub_type",
    "purpose",
    "unit",
    "function",
    "postal_cd",
    "billed_entity_type",
    "source_of_matching_funds",
    "contract_type",
];

const ALWAYS_ENCODE: &[&str] = &["postal_cd", "connect_type"];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for ColumnCatalog {
    /// The funding-request (FRN + line item) schema.
    fn default() -> Self {
        Self {
            id_column: ID_COLUMN.to_owned(),
            drop_cols: owned(DROP_COLS),
            yn_cols: owned(YN_COLS),
            cat_cols: owned(CAT_COLS),
            always_encode: owned(ALWAYS_ENCODE),
            renames: vec![Rename {
                from: "purpose_adj".to_owned(),
                to: "purpose".to_owned(),
            }],
        }
    }
}

impl ColumnCatalog {
    /// Load a catalog from a JSON file. Missing fields fall back to the
    /// funding-request defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read column catalog {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Config`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the catalog as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_yn(&self, name: &str) -> bool {
        self.yn_cols.iter().any(|c| c == name)
    }

    /// Categorical columns that are not also yes/no flags, in catalog order.
    pub fn dummy_candidates(&self) -> Vec<String> {
        self.cat_cols
            .iter()
            .filter(|c| !self.is_yn(c))
            .cloned()
            .collect()
    }
}
