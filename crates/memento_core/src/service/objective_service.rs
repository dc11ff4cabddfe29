//! Objective quota ledger.
//!
//! # Responsibility
//! - Enforce per-scope capacity on objectives.
//! - Provide ordered listing, partial updates and idempotent removal.
//!
//! # Invariants
//! - A scope never holds more objectives than its configured quota; the
//!   check and the insert share one serialized transaction.
//! - Quota rejection is an expected outcome, not an error.
//! - Updates and deletes of missing ids are silent no-ops.

use crate::config::{LifeConfig, ObjectiveQuotas};
use crate::model::block::BlockId;
use crate::model::objective::{
    Objective, ObjectiveAddOutcome, ObjectiveId, ObjectivePatch, ObjectiveScope,
};
use crate::repo::objective_repo::ObjectiveRepository;
use crate::repo::{RepoError, RepoResult};
use log::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ObjectiveServiceError {
    /// Block+period scope targets a block that does not exist.
    #[error("necessity block not found: {0}")]
    BlockNotFound(BlockId),
    #[error("{0}")]
    Repo(RepoError),
}

impl From<RepoError> for ObjectiveServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::BlockNotFound(block_id) => Self::BlockNotFound(block_id),
            other => Self::Repo(other),
        }
    }
}

/// Quota-enforcing facade over objective storage.
pub struct ObjectiveQuotaLedger<R: ObjectiveRepository> {
    repo: R,
    quotas: ObjectiveQuotas,
}

impl<R: ObjectiveRepository> ObjectiveQuotaLedger<R> {
    pub fn new(repo: R, config: &LifeConfig) -> Self {
        Self {
            repo,
            quotas: config.quotas,
        }
    }

    /// Configured capacity of `scope`.
    pub fn limit_for(&self, scope: &ObjectiveScope) -> u32 {
        self.quotas.limit_for(scope)
    }

    /// Lists one scope ordered by `sort_order`.
    pub fn list(&self, scope: &ObjectiveScope) -> RepoResult<Vec<Objective>> {
        self.repo.list_scope(scope)
    }

    /// Lists every category-scoped objective, grouped by category.
    pub fn list_all_categories(&self) -> RepoResult<Vec<Objective>> {
        self.repo.list_categories()
    }

    /// Adds one objective unless `scope` is already full.
    pub fn add(
        &self,
        scope: &ObjectiveScope,
        text: &str,
    ) -> Result<ObjectiveAddOutcome, ObjectiveServiceError> {
        let limit = self.limit_for(scope);
        let outcome = self.repo.insert_within_quota(scope, text, limit)?;
        match &outcome {
            ObjectiveAddOutcome::Created(objective) => info!(
                "event=objective_add module=ledger status=ok scope={scope} sort_order={}",
                objective.sort_order
            ),
            ObjectiveAddOutcome::QuotaExceeded { limit } => info!(
                "event=objective_add module=ledger status=quota_exceeded scope={scope} limit={limit}"
            ),
        }
        Ok(outcome)
    }

    /// Applies a partial update; `None` when the objective does not exist.
    pub fn update(
        &self,
        id: ObjectiveId,
        patch: &ObjectivePatch,
    ) -> RepoResult<Option<Objective>> {
        let updated = self.repo.update_objective(id, patch)?;
        if updated.is_none() {
            debug!("event=objective_update module=ledger status=not_found");
        }
        Ok(updated)
    }

    /// Flips completion; `None` when the objective does not exist.
    pub fn toggle(&self, id: ObjectiveId) -> RepoResult<Option<Objective>> {
        let toggled = self.repo.toggle_objective(id)?;
        if toggled.is_none() {
            debug!("event=objective_toggle module=ledger status=not_found");
        }
        Ok(toggled)
    }

    /// Removes one objective. Returns the number of rows removed.
    pub fn delete(&self, id: ObjectiveId) -> RepoResult<usize> {
        let removed = self.repo.delete_objective(id)?;
        debug!("event=objective_delete module=ledger status=ok removed={removed}");
        Ok(removed)
    }

    /// Removes every objective in `scope`. Clearing an empty scope is a no-op.
    pub fn clear_scope(&self, scope: &ObjectiveScope) -> RepoResult<usize> {
        let removed = self.repo.clear_scope(scope)?;
        info!("event=objective_clear module=ledger status=ok scope={scope} removed={removed}");
        Ok(removed)
    }
}
