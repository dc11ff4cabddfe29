//! Objective model and quota scopes.
//!
//! # Responsibility
//! - Define the two objective scope shapes: flat category, or block+week.
//! - Carry partial-update and add-outcome types used by the quota ledger.
//!
//! # Invariants
//! - An objective belongs to exactly one scope.
//! - `sort_order` is assigned once at creation (current count in scope).

use crate::model::block::BlockId;
use crate::model::period::PeriodKey;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ObjectiveId = Uuid;

/// Flat objective categories with global quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveCategory {
    /// Life-long direction.
    LongTermPurpose,
    /// Purpose work planned for the current week.
    WeeklyPurpose,
    /// Necessities that must get done this week.
    WeeklyNecessity,
}

impl ObjectiveCategory {
    pub const ALL: [Self; 3] = [
        Self::LongTermPurpose,
        Self::WeeklyPurpose,
        Self::WeeklyNecessity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LongTermPurpose => "long_term_purpose",
            Self::WeeklyPurpose => "weekly_purpose",
            Self::WeeklyNecessity => "weekly_necessity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "long_term_purpose" => Some(Self::LongTermPurpose),
            "weekly_purpose" => Some(Self::WeeklyPurpose),
            "weekly_necessity" => Some(Self::WeeklyNecessity),
            _ => None,
        }
    }
}

impl Display for ObjectiveCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quota scope an objective is counted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveScope {
    Category(ObjectiveCategory),
    BlockPeriod {
        block_id: BlockId,
        period: PeriodKey,
    },
}

impl Display for ObjectiveScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category(category) => write!(f, "category:{category}"),
            Self::BlockPeriod { block_id, period } => write!(f, "block:{block_id}@{period}"),
        }
    }
}

/// Persisted objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub id: ObjectiveId,
    pub scope: ObjectiveScope,
    pub text: String,
    pub is_completed: bool,
    pub sort_order: i64,
}

impl Objective {
    /// Blank, incomplete objective used for period placeholders.
    pub fn placeholder(scope: ObjectiveScope, sort_order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            scope,
            text: String::new(),
            is_completed: false,
            sort_order,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Partial objective update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectivePatch {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

impl ObjectivePatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.is_completed.is_none()
    }
}

/// Result of a quota-checked add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectiveAddOutcome {
    Created(Objective),
    /// Scope already holds `limit` objectives; nothing was written.
    QuotaExceeded { limit: u32 },
}

impl ObjectiveAddOutcome {
    /// Returns the created record, if any.
    pub fn created(self) -> Option<Objective> {
        match self {
            Self::Created(objective) => Some(objective),
            Self::QuotaExceeded { .. } => None,
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectiveCategory, ObjectivePatch, ObjectiveScope};

    #[test]
    fn category_text_roundtrips_for_every_variant() {
        for category in ObjectiveCategory::ALL {
            assert_eq!(ObjectiveCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(ObjectiveCategory::parse("long-term-purpose"), None);
    }

    #[test]
    fn scope_serializes_with_snake_case_tags() {
        let scope = ObjectiveScope::Category(ObjectiveCategory::WeeklyNecessity);
        let json = serde_json::to_string(&scope).unwrap();
        assert_eq!(json, r#"{"category":"weekly_necessity"}"#);
    }

    #[test]
    fn patch_deserializes_missing_fields_as_untouched() {
        let patch: ObjectivePatch = serde_json::from_str(r#"{"is_completed":true}"#).unwrap();
        assert_eq!(patch.text, None);
        assert_eq!(patch.is_completed, Some(true));
        assert!(ObjectivePatch::default().is_empty());
    }
}
