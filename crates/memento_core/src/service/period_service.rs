//! Per-week objective reconciliation.
//!
//! # Responsibility
//! - Guarantee a canonical objective set exists for the requested week.
//! - Discard block+period objectives of every other week.
//!
//! # Invariants
//! - Placeholders are synthesized at most once per week: only when the week
//!   has no objectives and at least one block exists.
//! - A populated week is returned unmodified; user edits are never replaced.
//! - Category-scoped objectives are outside the sweep.

use crate::config::LifeConfig;
use crate::model::block::NecessityBlock;
use crate::model::objective::{Objective, ObjectiveScope};
use crate::model::period::PeriodKey;
use crate::repo::objective_repo::ObjectiveRepository;
use crate::repo::RepoResult;
use log::info;
use serde::{Deserialize, Serialize};

/// Reconciliation state of one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodState {
    /// No objectives exist for the week (no blocks to synthesize from).
    Unpopulated,
    /// The week holds objectives; terminal for the reconciler.
    Populated,
}

/// Blocks and objectives of one reconciled week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    pub period: PeriodKey,
    pub state: PeriodState,
    pub blocks: Vec<NecessityBlock>,
    pub objectives: Vec<Objective>,
}

impl PeriodSnapshot {
    /// Objectives of one block, in order.
    pub fn objectives_for(&self, block: &NecessityBlock) -> Vec<&Objective> {
        self.objectives
            .iter()
            .filter(|objective| {
                matches!(
                    objective.scope,
                    ObjectiveScope::BlockPeriod { block_id, .. } if block_id == block.id
                )
            })
            .collect()
    }
}

/// Idempotent week initializer.
pub struct PeriodReconciler<R: ObjectiveRepository> {
    repo: R,
    placeholders_per_block: u32,
}

impl<R: ObjectiveRepository> PeriodReconciler<R> {
    pub fn new(repo: R, config: &LifeConfig) -> Self {
        Self {
            repo,
            placeholders_per_block: config.placeholders_per_block,
        }
    }

    /// Sweeps stale weeks and returns the canonical set for `period`.
    pub fn ensure_period(&self, period: PeriodKey) -> RepoResult<PeriodSnapshot> {
        let records = self
            .repo
            .reconcile_period(period, self.placeholders_per_block)?;
        let state = if records.objectives.is_empty() {
            PeriodState::Unpopulated
        } else {
            PeriodState::Populated
        };

        info!(
            "event=period_ensure module=period status=ok period={period} swept={} generated={} blocks={} objectives={}",
            records.swept,
            records.generated,
            records.blocks.len(),
            records.objectives.len()
        );

        Ok(PeriodSnapshot {
            period,
            state,
            blocks: records.blocks,
            objectives: records.objectives,
        })
    }
}
