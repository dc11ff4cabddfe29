//! Necessity block registry.
//!
//! # Responsibility
//! - Validate block names and colors above the repository layer.
//! - Keep block ordering stable (append-only `sort_order`).
//!
//! # Invariants
//! - Names are trimmed and non-blank; colors are `#rrggbb`.
//! - The expected block count is advisory: drift is logged, not rejected.
//! - Rename/recolor/delete of a missing id is a silent no-op.

use crate::config::LifeConfig;
use crate::model::block::{is_hex_color, BlockId, NecessityBlock, DEFAULT_BLOCK_COLOR};
use crate::model::user::UserId;
use crate::repo::block_repo::BlockRepository;
use crate::repo::{RepoError, RepoResult};
use log::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum BlockServiceError {
    #[error("block name must not be blank")]
    InvalidName,
    #[error("block color `{0}` is not a #rrggbb color")]
    InvalidColor(String),
    #[error("{0}")]
    Repo(#[from] RepoError),
}

/// CRUD facade over necessity blocks.
pub struct BlockRegistry<R: BlockRepository> {
    repo: R,
    expected_block_count: u32,
}

impl<R: BlockRepository> BlockRegistry<R> {
    pub fn new(repo: R, config: &LifeConfig) -> Self {
        Self {
            repo,
            expected_block_count: config.expected_block_count,
        }
    }

    /// Lists blocks ordered by `sort_order`.
    pub fn list(&self) -> RepoResult<Vec<NecessityBlock>> {
        self.repo.list_blocks()
    }

    /// Appends one block; `color = None` takes [`DEFAULT_BLOCK_COLOR`].
    pub fn add_block(
        &self,
        owner_id: UserId,
        name: &str,
        color: Option<&str>,
    ) -> Result<NecessityBlock, BlockServiceError> {
        let name = normalize_name(name)?;
        let color = normalize_color(color.unwrap_or(DEFAULT_BLOCK_COLOR))?;
        let block = self.repo.create_block(owner_id, name, color.as_str())?;
        info!(
            "event=block_add module=block_registry status=ok sort_order={}",
            block.sort_order
        );
        self.warn_on_count_drift()?;
        Ok(block)
    }

    pub fn rename(
        &self,
        id: BlockId,
        name: &str,
    ) -> Result<Option<NecessityBlock>, BlockServiceError> {
        let name = normalize_name(name)?;
        let renamed = self.repo.rename_block(id, name)?;
        if renamed.is_none() {
            debug!("event=block_rename module=block_registry status=not_found");
        }
        Ok(renamed)
    }

    pub fn recolor(
        &self,
        id: BlockId,
        color: &str,
    ) -> Result<Option<NecessityBlock>, BlockServiceError> {
        let color = normalize_color(color)?;
        let recolored = self.repo.recolor_block(id, color.as_str())?;
        if recolored.is_none() {
            debug!("event=block_recolor module=block_registry status=not_found");
        }
        Ok(recolored)
    }

    /// Deletes one block together with its period objectives and grid cells.
    pub fn delete(&self, id: BlockId) -> RepoResult<bool> {
        let removed = self.repo.delete_block(id)?;
        info!("event=block_delete module=block_registry status=ok removed={removed}");
        if removed {
            self.warn_on_count_drift()?;
        }
        Ok(removed)
    }

    fn warn_on_count_drift(&self) -> RepoResult<()> {
        let count = self.repo.count_blocks()?;
        if count != i64::from(self.expected_block_count) {
            warn!(
                "event=block_count_drift module=block_registry status=warn count={count} expected={}",
                self.expected_block_count
            );
        }
        Ok(())
    }
}

fn normalize_name(value: &str) -> Result<&str, BlockServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BlockServiceError::InvalidName);
    }
    Ok(trimmed)
}

fn normalize_color(value: &str) -> Result<String, BlockServiceError> {
    let trimmed = value.trim();
    if !is_hex_color(trimmed) {
        return Err(BlockServiceError::InvalidColor(value.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}
