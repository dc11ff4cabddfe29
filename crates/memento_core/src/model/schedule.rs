//! Weekly schedule grid model.
//!
//! # Responsibility
//! - Describe one allocated hour in the recurring 7x24 grid.
//! - Validate a single input cell before it reaches storage.
//!
//! # Invariants
//! - `day_of_week` is `0..=6` with 0 = Monday.
//! - `hour_slot` is `0..=23`.
//! - `necessity_block_id` is set iff `slot_type == SlotType::Necessity`.

use crate::model::block::BlockId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type AllocationId = Uuid;

pub const DAYS_PER_WEEK: u8 = 7;
pub const HOURS_PER_DAY: u8 = 24;

/// What an allocated hour is spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    Purpose,
    Necessity,
}

impl SlotType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purpose => "purpose",
            Self::Necessity => "necessity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "purpose" => Some(Self::Purpose),
            "necessity" => Some(Self::Necessity),
            _ => None,
        }
    }
}

/// One (day, hour) coordinate of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub day_of_week: u8,
    pub hour_slot: u8,
}

impl Display for GridCell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "day {} hour {}", self.day_of_week, self.hour_slot)
    }
}

/// Caller-provided allocation, validated before replacement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocationInput {
    pub slot_type: SlotType,
    #[serde(default)]
    pub necessity_block_id: Option<BlockId>,
    pub day_of_week: u8,
    pub hour_slot: u8,
}

impl AllocationInput {
    pub fn purpose(day_of_week: u8, hour_slot: u8) -> Self {
        Self {
            slot_type: SlotType::Purpose,
            necessity_block_id: None,
            day_of_week,
            hour_slot,
        }
    }

    pub fn necessity(block_id: BlockId, day_of_week: u8, hour_slot: u8) -> Self {
        Self {
            slot_type: SlotType::Necessity,
            necessity_block_id: Some(block_id),
            day_of_week,
            hour_slot,
        }
    }

    pub fn cell(&self) -> GridCell {
        GridCell {
            day_of_week: self.day_of_week,
            hour_slot: self.hour_slot,
        }
    }

    /// Checks ranges and the slot-type/block pairing of this cell alone.
    pub fn validate(&self) -> Result<(), GridValidationError> {
        if self.day_of_week >= DAYS_PER_WEEK {
            return Err(GridValidationError::DayOutOfRange(self.day_of_week));
        }
        if self.hour_slot >= HOURS_PER_DAY {
            return Err(GridValidationError::HourOutOfRange(self.hour_slot));
        }
        match (self.slot_type, self.necessity_block_id) {
            (SlotType::Necessity, None) => {
                Err(GridValidationError::MissingNecessityBlock(self.cell()))
            }
            (SlotType::Purpose, Some(_)) => {
                Err(GridValidationError::UnexpectedNecessityBlock(self.cell()))
            }
            _ => Ok(()),
        }
    }
}

/// Persisted allocation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleAllocation {
    pub id: AllocationId,
    pub slot_type: SlotType,
    pub necessity_block_id: Option<BlockId>,
    pub day_of_week: u8,
    pub hour_slot: u8,
}

impl ScheduleAllocation {
    pub fn cell(&self) -> GridCell {
        GridCell {
            day_of_week: self.day_of_week,
            hour_slot: self.hour_slot,
        }
    }

    /// Strips the storage id, yielding the equivalent input value.
    pub fn to_input(&self) -> AllocationInput {
        AllocationInput {
            slot_type: self.slot_type,
            necessity_block_id: self.necessity_block_id,
            day_of_week: self.day_of_week,
            hour_slot: self.hour_slot,
        }
    }
}

/// Rejection reasons for a grid replacement. Raised before any write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridValidationError {
    #[error("day_of_week {0} is out of range 0..=6")]
    DayOutOfRange(u8),
    #[error("hour_slot {0} is out of range 0..=23")]
    HourOutOfRange(u8),
    #[error("necessity slot at {0} has no necessity_block_id")]
    MissingNecessityBlock(GridCell),
    #[error("purpose slot at {0} must not carry a necessity_block_id")]
    UnexpectedNecessityBlock(GridCell),
    #[error("cell {0} is allocated more than once")]
    DuplicateCell(GridCell),
    #[error("necessity block not found: {0}")]
    UnknownBlock(BlockId),
}
