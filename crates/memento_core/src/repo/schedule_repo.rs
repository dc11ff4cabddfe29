//! Schedule allocation repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read the current weekly grid.
//! - Replace the whole grid atomically.
//!
//! # Invariants
//! - `replace_all` deletes and re-inserts inside one `IMMEDIATE`
//!   transaction; readers see either the full old or the full new grid.
//! - There is no per-cell write path.

use super::block_repo::block_exists_on;
use super::support::{ensure_connection_ready, parse_uuid};
use super::{RepoError, RepoResult};
use crate::model::schedule::{AllocationInput, ScheduleAllocation, SlotType};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Repository interface for the schedule grid.
pub trait ScheduleRepository {
    /// Lists the grid ordered by day, then hour.
    fn list_allocations(&self) -> RepoResult<Vec<ScheduleAllocation>>;
    /// Replaces every row with `allocations`. Callers validate cells first.
    fn replace_all(&self, allocations: &[AllocationInput])
        -> RepoResult<Vec<ScheduleAllocation>>;
}

/// SQLite-backed schedule repository.
pub struct SqliteScheduleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteScheduleRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "schedule_allocations",
            &[
                "uuid",
                "slot_type",
                "necessity_block_uuid",
                "day_of_week",
                "hour_slot",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl ScheduleRepository for SqliteScheduleRepository<'_> {
    fn list_allocations(&self) -> RepoResult<Vec<ScheduleAllocation>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                uuid,
                slot_type,
                necessity_block_uuid,
                day_of_week,
                hour_slot
             FROM schedule_allocations
             ORDER BY day_of_week ASC, hour_slot ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut allocations = Vec::new();
        while let Some(row) = rows.next()? {
            allocations.push(parse_allocation_row(row)?);
        }
        Ok(allocations)
    }

    fn replace_all(
        &self,
        allocations: &[AllocationInput],
    ) -> RepoResult<Vec<ScheduleAllocation>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let referenced: BTreeSet<_> = allocations
            .iter()
            .filter_map(|allocation| allocation.necessity_block_id)
            .collect();
        for block_id in referenced {
            if !block_exists_on(&tx, block_id)? {
                return Err(RepoError::BlockNotFound(block_id));
            }
        }

        tx.execute("DELETE FROM schedule_allocations;", [])?;

        let mut inserted = Vec::with_capacity(allocations.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO schedule_allocations (
                    uuid,
                    slot_type,
                    necessity_block_uuid,
                    day_of_week,
                    hour_slot
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for allocation in allocations {
                let row = ScheduleAllocation {
                    id: Uuid::new_v4(),
                    slot_type: allocation.slot_type,
                    necessity_block_id: allocation.necessity_block_id,
                    day_of_week: allocation.day_of_week,
                    hour_slot: allocation.hour_slot,
                };
                stmt.execute(params![
                    row.id.to_string(),
                    row.slot_type.as_str(),
                    row.necessity_block_id.map(|id| id.to_string()),
                    i64::from(row.day_of_week),
                    i64::from(row.hour_slot),
                ])?;
                inserted.push(row);
            }
        }

        tx.commit()?;
        inserted.sort_by_key(ScheduleAllocation::cell);
        Ok(inserted)
    }
}

fn parse_allocation_row(row: &Row<'_>) -> RepoResult<ScheduleAllocation> {
    let uuid_text: String = row.get("uuid")?;
    let slot_text: String = row.get("slot_type")?;
    let slot_type = SlotType::parse(&slot_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid slot type `{slot_text}` in schedule_allocations.slot_type"
        ))
    })?;
    let necessity_block_id = row
        .get::<_, Option<String>>("necessity_block_uuid")?
        .map(|value| parse_uuid(&value, "schedule_allocations.necessity_block_uuid"))
        .transpose()?;

    Ok(ScheduleAllocation {
        id: parse_uuid(&uuid_text, "schedule_allocations.uuid")?,
        slot_type,
        necessity_block_id,
        day_of_week: parse_grid_coordinate(row.get("day_of_week")?, "day_of_week")?,
        hour_slot: parse_grid_coordinate(row.get("hour_slot")?, "hour_slot")?,
    })
}

fn parse_grid_coordinate(value: i64, column: &'static str) -> RepoResult<u8> {
    u8::try_from(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid value `{value}` in schedule_allocations.{column}"
        ))
    })
}
