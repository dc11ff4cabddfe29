//! Necessity block model.

use crate::model::user::UserId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BlockId = Uuid;

/// Color used when a caller does not provide one.
pub const DEFAULT_BLOCK_COLOR: &str = "#6b7280";

/// One categorization block (work, chores, ...) for necessity time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NecessityBlock {
    pub id: BlockId,
    pub name: String,
    /// `#rrggbb` hex color.
    pub color: String,
    /// Assigned once at creation; gaps after deletes are expected.
    pub sort_order: i64,
    pub owner_id: UserId,
}

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// Returns whether `value` is a `#rrggbb` color.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::{is_hex_color, DEFAULT_BLOCK_COLOR};

    #[test]
    fn hex_color_accepts_six_digit_forms_only() {
        assert!(is_hex_color(DEFAULT_BLOCK_COLOR));
        assert!(is_hex_color("#3B82F6"));
        assert!(!is_hex_color("#fff"));
        assert!(!is_hex_color("3b82f6"));
        assert!(!is_hex_color("#3b82f6 "));
    }
}
