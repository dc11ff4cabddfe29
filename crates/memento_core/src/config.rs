//! Planner configuration record.
//!
//! # Responsibility
//! - Hold every tunable constant the services rely on (quotas, placeholder
//!   counts, lifespan bounds) in one explicit value.
//! - Load that value from TOML with per-field defaults.
//!
//! # Invariants
//! - A validated config never synthesizes more placeholders than the
//!   block+period quota admits.

use crate::model::block::is_hex_color;
use crate::model::objective::{ObjectiveCategory, ObjectiveScope};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Maximum objectives per scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObjectiveQuotas {
    pub long_term_purpose: u32,
    pub weekly_purpose: u32,
    pub weekly_necessity: u32,
    /// Limit for one block within one week.
    pub per_block_period: u32,
}

impl Default for ObjectiveQuotas {
    fn default() -> Self {
        Self {
            long_term_purpose: 3,
            weekly_purpose: 3,
            weekly_necessity: 2,
            per_block_period: 2,
        }
    }
}

impl ObjectiveQuotas {
    pub fn limit_for(&self, scope: &ObjectiveScope) -> u32 {
        match scope {
            ObjectiveScope::Category(ObjectiveCategory::LongTermPurpose) => self.long_term_purpose,
            ObjectiveScope::Category(ObjectiveCategory::WeeklyPurpose) => self.weekly_purpose,
            ObjectiveScope::Category(ObjectiveCategory::WeeklyNecessity) => self.weekly_necessity,
            ObjectiveScope::BlockPeriod { .. } => self.per_block_period,
        }
    }
}

/// Explicit configuration passed into every service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifeConfig {
    pub quotas: ObjectiveQuotas,
    /// Blank objectives synthesized per block on first access to a week.
    pub placeholders_per_block: u32,
    /// Block count the UI is designed around. Drift is logged, not rejected.
    pub expected_block_count: u32,
    pub max_lifespan_years: u32,
    /// Display color for purpose cells and objectives.
    pub purpose_color: String,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            quotas: ObjectiveQuotas::default(),
            placeholders_per_block: 2,
            expected_block_count: 4,
            max_lifespan_years: 150,
            purpose_color: "#8b5cf6".to_string(),
        }
    }
}

impl LifeConfig {
    /// Parses and validates a TOML document. Missing keys take defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lifespan_years == 0 {
            return Err(ConfigError::Invalid(
                "max_lifespan_years must be positive".to_string(),
            ));
        }
        if self.placeholders_per_block > self.quotas.per_block_period {
            return Err(ConfigError::Invalid(format!(
                "placeholders_per_block {} exceeds quotas.per_block_period {}",
                self.placeholders_per_block, self.quotas.per_block_period
            )));
        }
        if !is_hex_color(&self.purpose_color) {
            return Err(ConfigError::Invalid(format!(
                "purpose_color `{}` is not a #rrggbb color",
                self.purpose_color
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LifeConfig};
    use crate::model::objective::{ObjectiveCategory, ObjectiveScope};

    #[test]
    fn empty_document_yields_defaults() {
        let config = LifeConfig::from_toml_str("").unwrap();
        assert_eq!(config, LifeConfig::default());
        assert_eq!(config.placeholders_per_block, 2);
        assert_eq!(
            config
                .quotas
                .limit_for(&ObjectiveScope::Category(ObjectiveCategory::WeeklyNecessity)),
            2
        );
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = LifeConfig::from_toml_str(
            "max_lifespan_years = 120\n[quotas]\nweekly_purpose = 5\n",
        )
        .unwrap();
        assert_eq!(config.max_lifespan_years, 120);
        assert_eq!(config.quotas.weekly_purpose, 5);
        assert_eq!(config.quotas.long_term_purpose, 3);
    }

    #[test]
    fn placeholders_above_quota_are_rejected() {
        let err = LifeConfig::from_toml_str(
            "placeholders_per_block = 3\n[quotas]\nper_block_period = 2\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(message) if message.contains("placeholders")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = LifeConfig::from_toml_str("lifespan = 80\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file_path() {
        let err = LifeConfig::load("/nonexistent/memento.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/memento.toml"));
    }
}
