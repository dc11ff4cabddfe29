//! User profile model.
//!
//! # Invariants
//! - `lifespan_years` is strictly positive.
//! - Exactly one profile is expected at steady state; the core does not rely
//!   on it and reports "absent" when none exists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

/// Persisted user settings driving the death clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub birth_date: NaiveDate,
    pub lifespan_years: u32,
    /// Free-form label shown next to purpose objectives and grid cells.
    pub purpose_label: String,
}

impl UserProfile {
    /// Creates a profile with a generated id and an empty purpose label.
    pub fn new(birth_date: NaiveDate, lifespan_years: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            birth_date,
            lifespan_years,
            purpose_label: String::new(),
        }
    }
}

/// Settings mutation request.
///
/// `purpose_label = None` leaves the stored label untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub birth_date: NaiveDate,
    pub lifespan_years: u32,
    #[serde(default)]
    pub purpose_label: Option<String>,
}
