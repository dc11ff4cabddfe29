//! Affirmation rotation and CRUD.
//!
//! # Responsibility
//! - Pick one stored affirmation uniformly at random.
//! - Provide plain CRUD over the pool.
//!
//! # Invariants
//! - An empty pool yields `FALLBACK_AFFIRMATION`, never an error.
//! - The random source is injectable for deterministic callers.

use crate::model::affirmation::{Affirmation, AffirmationId, FALLBACK_AFFIRMATION};
use crate::repo::affirmation_repo::AffirmationRepository;
use crate::repo::{RepoError, RepoResult};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, thiserror::Error)]
pub enum AffirmationServiceError {
    #[error("affirmation text must not be blank")]
    EmptyText,
    #[error("{0}")]
    Repo(#[from] RepoError),
}

/// Affirmation pool facade.
pub struct AffirmationRotator<R: AffirmationRepository> {
    repo: R,
}

impl<R: AffirmationRepository> AffirmationRotator<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Picks one affirmation text using the thread-local RNG.
    pub fn pick_random(&self) -> RepoResult<String> {
        self.pick_random_with(&mut rand::thread_rng())
    }

    /// Picks one affirmation text using `rng`.
    pub fn pick_random_with<G: Rng + ?Sized>(&self, rng: &mut G) -> RepoResult<String> {
        let pool = self.repo.list_affirmations()?;
        match pool.choose(rng) {
            Some(affirmation) => Ok(affirmation.text.clone()),
            None => {
                debug!("event=affirmation_pick module=affirmation status=fallback");
                Ok(FALLBACK_AFFIRMATION.to_string())
            }
        }
    }

    pub fn list(&self) -> RepoResult<Vec<Affirmation>> {
        self.repo.list_affirmations()
    }

    pub fn add(&self, text: &str) -> Result<Affirmation, AffirmationServiceError> {
        let text = normalize_text(text)?;
        let created = self.repo.create_affirmation(text)?;
        info!("event=affirmation_add module=affirmation status=ok");
        Ok(created)
    }

    /// Replaces the text of one affirmation; `None` when it does not exist.
    pub fn update(
        &self,
        id: AffirmationId,
        text: &str,
    ) -> Result<Option<Affirmation>, AffirmationServiceError> {
        let text = normalize_text(text)?;
        let updated = self.repo.update_affirmation(id, text)?;
        if updated.is_none() {
            debug!("event=affirmation_update module=affirmation status=not_found");
        }
        Ok(updated)
    }

    /// Deletes one affirmation. Missing ids are a no-op.
    pub fn delete(&self, id: AffirmationId) -> RepoResult<bool> {
        let removed = self.repo.delete_affirmation(id)?;
        debug!("event=affirmation_delete module=affirmation status=ok removed={removed}");
        Ok(removed)
    }
}

fn normalize_text(text: &str) -> Result<&str, AffirmationServiceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AffirmationServiceError::EmptyText);
    }
    Ok(trimmed)
}
