//! Weekly schedule grid.
//!
//! # Responsibility
//! - Validate and atomically replace the 7x24 allocation grid.
//! - Summarize allocated hours per necessity block.
//!
//! # Invariants
//! - Every input cell is validated before any write.
//! - At most one allocation per `(day_of_week, hour_slot)`.
//! - Readers observe either the whole prior grid or the whole new grid.

use crate::model::block::BlockId;
use crate::model::schedule::{
    AllocationInput, GridCell, GridValidationError, ScheduleAllocation, SlotType, DAYS_PER_WEEK,
    HOURS_PER_DAY,
};
use crate::repo::schedule_repo::ScheduleRepository;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid grid: {0}")]
    Validation(#[from] GridValidationError),
    #[error("{0}")]
    Repo(RepoError),
}

impl From<RepoError> for ScheduleError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::BlockNotFound(block_id) => {
                Self::Validation(GridValidationError::UnknownBlock(block_id))
            }
            other => Self::Repo(other),
        }
    }
}

/// Hours allocated per week, split by slot type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub purpose_hours: u32,
    pub necessity_hours: BTreeMap<BlockId, u32>,
    /// Cells without any allocation.
    pub unallocated_hours: u32,
}

impl AllocationSummary {
    pub fn hours_for_block(&self, block_id: BlockId) -> u32 {
        self.necessity_hours.get(&block_id).copied().unwrap_or(0)
    }
}

pub struct ScheduleGrid<R: ScheduleRepository> {
    repo: R,
}

impl<R: ScheduleRepository> ScheduleGrid<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Current grid ordered by day then hour.
    pub fn list_allocations(&self) -> RepoResult<Vec<ScheduleAllocation>> {
        self.repo.list_allocations()
    }

    /// Replaces the whole grid. An empty slice clears it.
    pub fn replace_all(
        &self,
        allocations: &[AllocationInput],
    ) -> Result<Vec<ScheduleAllocation>, ScheduleError> {
        if let Err(err) = validate_grid(allocations) {
            warn!("event=schedule_replace module=schedule status=rejected reason={err}");
            return Err(err.into());
        }

        let stored = self.repo.replace_all(allocations).map_err(|err| {
            warn!("event=schedule_replace module=schedule status=error");
            ScheduleError::from(err)
        })?;
        info!(
            "event=schedule_replace module=schedule status=ok cells={}",
            stored.len()
        );
        Ok(stored)
    }

    pub fn necessity_hours_by_block(&self) -> RepoResult<AllocationSummary> {
        let allocations = self.repo.list_allocations()?;
        Ok(summarize(&allocations))
    }
}

fn validate_grid(allocations: &[AllocationInput]) -> Result<(), GridValidationError> {
    let mut seen: HashSet<GridCell> = HashSet::with_capacity(allocations.len());
    for allocation in allocations {
        allocation.validate()?;
        let cell = allocation.cell();
        if !seen.insert(cell) {
            return Err(GridValidationError::DuplicateCell(cell));
        }
    }
    Ok(())
}

/// Folds a grid into per-slot-type hour counts.
pub fn summarize(allocations: &[ScheduleAllocation]) -> AllocationSummary {
    let mut summary = AllocationSummary::default();
    for allocation in allocations {
        match (allocation.slot_type, allocation.necessity_block_id) {
            (SlotType::Purpose, _) => summary.purpose_hours += 1,
            (SlotType::Necessity, Some(block_id)) => {
                *summary.necessity_hours.entry(block_id).or_insert(0) += 1;
            }
            (SlotType::Necessity, None) => {}
        }
    }
    let total = u32::from(DAYS_PER_WEEK) * u32::from(HOURS_PER_DAY);
    let allocated = u32::try_from(allocations.len()).unwrap_or(u32::MAX);
    summary.unallocated_hours = total.saturating_sub(allocated);
    summary
}

#[cfg(test)]
mod tests {
    use super::{summarize, validate_grid};
    use crate::model::schedule::{AllocationInput, GridValidationError, ScheduleAllocation};
    use uuid::Uuid;

    #[test]
    fn validate_grid_rejects_duplicate_cells() {
        let block = Uuid::new_v4();
        let inputs = vec![
            AllocationInput::purpose(1, 9),
            AllocationInput::necessity(block, 1, 9),
        ];
        let err = validate_grid(&inputs).unwrap_err();
        assert!(matches!(err, GridValidationError::DuplicateCell(cell) if cell.hour_slot == 9));
    }

    #[test]
    fn validate_grid_accepts_empty_input() {
        assert!(validate_grid(&[]).is_ok());
    }

    #[test]
    fn summarize_counts_hours_per_block() {
        let block_a = Uuid::new_v4();
        let block_b = Uuid::new_v4();
        let rows: Vec<ScheduleAllocation> = [
            AllocationInput::purpose(0, 6),
            AllocationInput::purpose(0, 7),
            AllocationInput::necessity(block_a, 0, 8),
            AllocationInput::necessity(block_a, 0, 9),
            AllocationInput::necessity(block_b, 3, 22),
        ]
        .into_iter()
        .map(|input| ScheduleAllocation {
            id: Uuid::new_v4(),
            slot_type: input.slot_type,
            necessity_block_id: input.necessity_block_id,
            day_of_week: input.day_of_week,
            hour_slot: input.hour_slot,
        })
        .collect();

        let summary = summarize(&rows);
        assert_eq!(summary.purpose_hours, 2);
        assert_eq!(summary.hours_for_block(block_a), 2);
        assert_eq!(summary.hours_for_block(block_b), 1);
        assert_eq!(summary.hours_for_block(Uuid::new_v4()), 0);
        assert_eq!(summary.unallocated_hours, 168 - 5);
    }
}
