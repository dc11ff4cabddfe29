//! Affirmation model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AffirmationId = Uuid;

/// Text returned by the rotator when the pool is empty.
pub const FALLBACK_AFFIRMATION: &str = "Memento Mori";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affirmation {
    pub id: AffirmationId,
    pub text: String,
}
