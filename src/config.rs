use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{
    supported_transforms, DEFAULT_ABBREVIATIONS, DEFAULT_COMMON_WORD_PERCENTILE, DEFAULT_STEPS, DEFAULT_SUFFIXES,
};
use crate::error::{LinkageError, Result};
use crate::pipeline::processing::normalize::AbbreviationRule;

/// Run configuration. Every section has built-in defaults, so an empty file
/// (or no file at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub normalizer: NormalizerConfig,
    pub input: InputConfig,
    pub steps: Vec<StepConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Applied in order
    pub abbreviations: Vec<AbbreviationRule>,
    /// Checked in order; only the first hit is stripped
    pub suffixes: Vec<String>,
    pub common_word_percentile: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Numeric column Kununu rows are sorted by (descending) before matching
    pub kununu_sort_column: Option<String>,
    /// Numeric column Orbis rows are sorted by (descending) before matching
    pub orbis_sort_column: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    pub label: String,
    /// Transform names, applied left to right
    pub transforms: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            input: InputConfig::default(),
            steps: DEFAULT_STEPS
                .iter()
                .map(|(label, transforms)| StepConfig {
                    label: label.to_string(),
                    transforms: transforms.iter().map(|t| t.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            abbreviations: DEFAULT_ABBREVIATIONS
                .iter()
                .map(|(full, abbreviation)| AbbreviationRule::new(*full, *abbreviation))
                .collect(),
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            common_word_percentile: DEFAULT_COMMON_WORD_PERCENTILE,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LinkageError::Config(format!("Failed to read config file '{}': {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let pct = self.normalizer.common_word_percentile;
        if !(0.0..=100.0).contains(&pct) {
            return Err(LinkageError::InvalidPercentile(pct));
        }

        for rule in &self.normalizer.abbreviations {
            if rule.full.is_empty() || rule.abbreviation.is_empty() {
                return Err(LinkageError::Config(format!(
                    "Abbreviation rules need a full form and an abbreviation, got '{}' -> '{}'",
                    rule.full, rule.abbreviation
                )));
            }
        }

        if self.normalizer.suffixes.iter().any(|s| s.trim().is_empty()) {
            return Err(LinkageError::Config("Suffixes must not be empty".to_string()));
        }

        if self.steps.is_empty() {
            return Err(LinkageError::Config("At least one matching step is required".to_string()));
        }

        let known = supported_transforms();
        for step in &self.steps {
            if step.label.trim().is_empty() {
                return Err(LinkageError::Config("Step labels must not be empty".to_string()));
            }
            if let Some(unknown) = step.transforms.iter().find(|t| !known.contains(&t.as_str())) {
                return Err(LinkageError::UnknownTransform(unknown.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.steps.len(), DEFAULT_STEPS.len());
        assert_eq!(config.normalizer.common_word_percentile, 99.0);
    }

    #[test]
    fn test_partial_config_overrides_section() {
        let config = Config::from_toml_str(
            r#"
            [normalizer]
            suffixes = ["gmbh & co kg", "gmbh"]
            common_word_percentile = 95.0

            [input]
            kununu_sort_column = "reviews"

            [[steps]]
            label = "exact"
            transforms = ["identity"]

            [[steps]]
            label = "relaxed"
            transforms = ["umlauts_to_english", "remove_suffixes"]
            "#,
        )
        .unwrap();

        assert_eq!(config.normalizer.suffixes, vec!["gmbh & co kg", "gmbh"]);
        assert_eq!(config.normalizer.abbreviations.len(), DEFAULT_ABBREVIATIONS.len());
        assert_eq!(config.input.kununu_sort_column.as_deref(), Some("reviews"));
        assert_eq!(config.input.orbis_sort_column, None);
        assert_eq!(config.steps[1].transforms, vec!["umlauts_to_english", "remove_suffixes"]);
    }

    #[test]
    fn test_rejects_unknown_transform() {
        let result = Config::from_toml_str(
            r#"
            [[steps]]
            label = "fuzzy"
            transforms = ["levenshtein"]
            "#,
        );
        assert!(matches!(result, Err(LinkageError::UnknownTransform(name)) if name == "levenshtein"));
    }

    #[test]
    fn test_rejects_bad_percentile_and_empty_suffix() {
        let bad_pct = Config::from_toml_str("[normalizer]\ncommon_word_percentile = 120.0\n");
        assert!(matches!(bad_pct, Err(LinkageError::InvalidPercentile(_))));

        let empty_suffix = Config::from_toml_str("[normalizer]\nsuffixes = [\"gmbh\", \" \"]\n");
        assert!(matches!(empty_suffix, Err(LinkageError::Config(_))));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let result = Config::load("/definitely/not/here/linkage.toml");
        assert!(matches!(result, Err(LinkageError::Config(_))));
    }
}
