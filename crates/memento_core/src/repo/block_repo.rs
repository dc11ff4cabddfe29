//! Necessity block repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `necessity_blocks` with stable ordering.
//!
//! # Invariants
//! - Listing is deterministic: `sort_order ASC, rowid ASC`.
//! - New blocks take `sort_order = max + 1` (0 when empty), computed and
//!   inserted inside one `IMMEDIATE` transaction, so an appended block
//!   always sorts strictly last.
//! - Deleting a block cascades to its period objectives and necessity cells.

use super::support::{ensure_connection_ready, parse_uuid, NOW_MS_SQL};
use super::RepoResult;
use crate::model::block::{BlockId, NecessityBlock};
use crate::model::user::UserId;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const BLOCK_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    color,
    sort_order,
    owner_uuid
FROM necessity_blocks";

/// Repository interface for necessity blocks.
pub trait BlockRepository {
    fn list_blocks(&self) -> RepoResult<Vec<NecessityBlock>>;
    fn get_block(&self, id: BlockId) -> RepoResult<Option<NecessityBlock>>;
    fn count_blocks(&self) -> RepoResult<i64>;
    /// Appends one block after the current ones.
    fn create_block(&self, owner_id: UserId, name: &str, color: &str)
        -> RepoResult<NecessityBlock>;
    fn rename_block(&self, id: BlockId, name: &str) -> RepoResult<Option<NecessityBlock>>;
    fn recolor_block(&self, id: BlockId, color: &str) -> RepoResult<Option<NecessityBlock>>;
    /// Returns whether a row was removed.
    fn delete_block(&self, id: BlockId) -> RepoResult<bool>;
}

/// SQLite-backed necessity block repository.
pub struct SqliteBlockRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlockRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "necessity_blocks",
            &["uuid", "name", "color", "sort_order", "owner_uuid"],
        )?;
        Ok(Self { conn })
    }
}

impl BlockRepository for SqliteBlockRepository<'_> {
    fn list_blocks(&self) -> RepoResult<Vec<NecessityBlock>> {
        list_blocks_on(self.conn)
    }

    fn get_block(&self, id: BlockId) -> RepoResult<Option<NecessityBlock>> {
        self.conn
            .query_row(
                &format!("{BLOCK_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_block_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn count_blocks(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM necessity_blocks;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn create_block(
        &self,
        owner_id: UserId,
        name: &str,
        color: &str,
    ) -> RepoResult<NecessityBlock> {
        let block_id = Uuid::new_v4();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let sort_order: i64 = tx.query_row(
            "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM necessity_blocks;",
            [],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO necessity_blocks (uuid, name, color, sort_order, owner_uuid)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                block_id.to_string(),
                name,
                color,
                sort_order,
                owner_id.to_string(),
            ],
        )?;
        tx.commit()?;

        Ok(NecessityBlock {
            id: block_id,
            name: name.to_string(),
            color: color.to_string(),
            sort_order,
            owner_id,
        })
    }

    fn rename_block(&self, id: BlockId, name: &str) -> RepoResult<Option<NecessityBlock>> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE necessity_blocks
                 SET name = ?2,
                     updated_at = {NOW_MS_SQL}
                 WHERE uuid = ?1;"
            ),
            params![id.to_string(), name],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_block(id)
    }

    fn recolor_block(&self, id: BlockId, color: &str) -> RepoResult<Option<NecessityBlock>> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE necessity_blocks
                 SET color = ?2,
                     updated_at = {NOW_MS_SQL}
                 WHERE uuid = ?1;"
            ),
            params![id.to_string(), color],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_block(id)
    }

    fn delete_block(&self, id: BlockId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM necessity_blocks WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

/// Lists blocks on any connection or open transaction.
pub(crate) fn list_blocks_on(conn: &Connection) -> RepoResult<Vec<NecessityBlock>> {
    let mut stmt = conn.prepare(&format!(
        "{BLOCK_SELECT_SQL} ORDER BY sort_order ASC, rowid ASC;"
    ))?;
    let mut rows = stmt.query([])?;
    let mut blocks = Vec::new();
    while let Some(row) = rows.next()? {
        blocks.push(parse_block_row(row)?);
    }
    Ok(blocks)
}

/// Returns whether a block exists, on any connection or open transaction.
pub(crate) fn block_exists_on(conn: &Connection, id: BlockId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM necessity_blocks WHERE uuid = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_block_row(row: &Row<'_>) -> RepoResult<NecessityBlock> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    Ok(NecessityBlock {
        id: parse_uuid(&uuid_text, "necessity_blocks.uuid")?,
        name: row.get("name")?,
        color: row.get("color")?,
        sort_order: row.get("sort_order")?,
        owner_id: parse_uuid(&owner_text, "necessity_blocks.owner_uuid")?,
    })
}
