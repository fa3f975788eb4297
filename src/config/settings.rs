//! Diagram settings
//!
//! Loads the YAML config file describing the category hierarchy, exclusion
//! lists, manual offsets, the minimum category amount and which categories
//! count as income, savings and taxes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use tracing::debug;

use crate::error::{SankeyError, SankeyResult};
use crate::models::CategoryTree;

/// Every top-level key the config file must define, and the only ones allowed
pub const REQUIRED_KEYS: [&str; 10] = [
    "transactions_file",
    "categories",
    "min_category_amount",
    "net_income_categories",
    "exclude_categories",
    "exclude_accounts",
    "exclude_labels",
    "category_offsets",
    "saving_categories",
    "tax_categories",
];

/// Settings for one diagram run
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Path to the exported transaction CSV
    pub transactions_file: PathBuf,

    /// Category hierarchy rolled up under the `Spending` node
    pub categories: CategoryTree,

    /// Categories smaller than this are folded into misc nodes
    pub min_category_amount: u32,

    /// Categories feeding the `Net Income` node
    #[serde(deserialize_with = "nullable")]
    pub net_income_categories: Vec<String>,

    /// Categories dropped before aggregation
    #[serde(deserialize_with = "nullable")]
    pub exclude_categories: Vec<String>,

    /// Accounts dropped before aggregation
    #[serde(deserialize_with = "nullable")]
    pub exclude_accounts: Vec<String>,

    /// Labels dropped before aggregation
    #[serde(deserialize_with = "nullable")]
    pub exclude_labels: Vec<String>,

    /// Manual adjustments added to a category's net amount
    #[serde(deserialize_with = "nullable")]
    pub category_offsets: BTreeMap<String, i64>,

    /// Categories rolled up under the `Savings` node
    #[serde(deserialize_with = "nullable")]
    pub saving_categories: Vec<String>,

    /// Categories rolled up under the `Taxes` node
    #[serde(deserialize_with = "nullable")]
    pub tax_categories: Vec<String>,
}

/// Treat an explicit YAML null as the empty value
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Settings {
    /// Load settings from a config file
    pub fn load(path: &Path) -> SankeyResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SankeyError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let settings = Self::from_yaml_str(&contents)?;
        debug!(
            path = %path.display(),
            top_level_categories = settings.categories.children().len(),
            min_category_amount = settings.min_category_amount,
            "Loaded config"
        );
        Ok(settings)
    }

    /// Parse settings from YAML text, enforcing the exact key set
    pub fn from_yaml_str(contents: &str) -> SankeyResult<Self> {
        let document: Value = serde_yaml::from_str(contents)?;
        validate_keys(&document)?;
        Ok(serde_yaml::from_value(document)?)
    }

    /// Threshold as used by the rollup
    pub fn threshold(&self) -> i64 {
        i64::from(self.min_category_amount)
    }

    /// Transactions file path, with relative paths taken from the config
    /// file's directory
    pub fn transactions_path(&self, config_path: &Path) -> PathBuf {
        match config_path.parent() {
            Some(dir) if self.transactions_file.is_relative() => dir.join(&self.transactions_file),
            _ => self.transactions_file.clone(),
        }
    }
}

fn validate_keys(document: &Value) -> SankeyResult<()> {
    let mapping = document.as_mapping().ok_or_else(|| {
        SankeyError::Config(format!(
            "config file must be a mapping with the following keys: {:?}",
            REQUIRED_KEYS
        ))
    })?;

    let present: Vec<&str> = mapping.keys().filter_map(Value::as_str).collect();

    if REQUIRED_KEYS.iter().any(|k| !present.contains(k)) {
        return Err(SankeyError::Config(format!(
            "config needs the following keys defined: {:?}",
            REQUIRED_KEYS
        )));
    }

    if mapping.len() != present.len() || present.iter().any(|k| !REQUIRED_KEYS.contains(k)) {
        return Err(SankeyError::Config(format!(
            "config expects only the following keys: {:?}",
            REQUIRED_KEYS
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
transactions_file: transactions.csv
categories:
  Housing:
    Rent: {}
    Utilities:
  Food:
    Groceries: {}
    Restaurants: {}
min_category_amount: 100
net_income_categories: [Paycheck, Interest]
exclude_categories: [Transfer, Credit Card Payment]
exclude_accounts: []
exclude_labels: [Reimbursable]
category_offsets:
  Groceries: -50
  Gifts: 200
saving_categories: [Brokerage]
tax_categories: [Federal Tax, State Tax]
"#;

    #[test]
    fn test_parse_sample() {
        let settings = Settings::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(settings.transactions_file, PathBuf::from("transactions.csv"));
        assert_eq!(settings.threshold(), 100);
        assert_eq!(settings.net_income_categories, vec!["Paycheck", "Interest"]);
        assert_eq!(settings.category_offsets.get("Gifts"), Some(&200));
        assert_eq!(
            settings.categories.leaf_names(),
            vec!["Rent", "Utilities", "Groceries", "Restaurants"]
        );
    }

    #[test]
    fn test_missing_key_lists_required_set() {
        let contents = SAMPLE.replace("tax_categories: [Federal Tax, State Tax]\n", "");
        let err = Settings::from_yaml_str(&contents).unwrap_err();

        assert!(err.is_config());
        let message = err.to_string();
        assert!(message.contains("needs the following keys"));
        for key in REQUIRED_KEYS {
            assert!(message.contains(key), "{} missing from message", key);
        }
    }

    #[test]
    fn test_extra_key_rejected() {
        let contents = format!("{}db_file: spend.db\n", SAMPLE);
        let err = Settings::from_yaml_str(&contents).unwrap_err();

        assert!(err.is_config());
        assert!(err.to_string().contains("expects only the following keys"));
    }

    #[test]
    fn test_non_mapping_document_rejected() {
        let err = Settings::from_yaml_str("- just\n- a list\n").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = Settings::from_yaml_str("categories: [unclosed\n").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().starts_with("Configuration error: "));
    }

    #[test]
    fn test_null_lists_are_empty() {
        let contents = SAMPLE
            .replace("exclude_labels: [Reimbursable]", "exclude_labels:")
            .replace("saving_categories: [Brokerage]", "saving_categories: ~");
        let settings = Settings::from_yaml_str(&contents).unwrap();

        assert!(settings.exclude_labels.is_empty());
        assert!(settings.saving_categories.is_empty());
    }

    #[test]
    fn test_bad_hierarchy_is_config_error() {
        let contents = SAMPLE.replace("Rent: {}", "Rent: 1500");
        let err = Settings::from_yaml_str(&contents).unwrap_err();

        assert!(err.is_config());
        assert!(err.to_string().contains("categories.Housing.Rent"));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let contents = SAMPLE.replace("min_category_amount: 100", "min_category_amount: -5");
        assert!(Settings::from_yaml_str(&contents).unwrap_err().is_config());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.tax_categories, vec!["Federal Tax", "State Tax"]);
    }

    #[test]
    fn test_transactions_path_relative_to_config() {
        let settings = Settings::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(
            settings.transactions_path(Path::new("/home/me/budget/config.yaml")),
            PathBuf::from("/home/me/budget/transactions.csv")
        );
        assert_eq!(
            settings.transactions_path(Path::new("config.yaml")),
            PathBuf::from("transactions.csv")
        );

        let contents = SAMPLE.replace(
            "transactions_file: transactions.csv",
            "transactions_file: /data/export.csv",
        );
        let absolute = Settings::from_yaml_str(&contents).unwrap();
        assert_eq!(
            absolute.transactions_path(Path::new("/home/me/config.yaml")),
            PathBuf::from("/data/export.csv")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(err.is_config());
    }
}
