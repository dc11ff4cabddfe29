//! Objective repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist objectives for both scope shapes (category, block+period).
//! - Own the transactional building blocks the quota ledger and the period
//!   reconciler rely on.
//!
//! # Invariants
//! - Quota check and insert run in one `IMMEDIATE` transaction, so two
//!   writers can never both observe `count < limit` for the same slot.
//! - Period reconciliation (sweep, read, placeholder batch, re-read) runs in
//!   one `IMMEDIATE` transaction.
//! - Scope listing is deterministic: `sort_order ASC, rowid ASC`.
//! - New objectives append at `max(sort_order) + 1` within their scope.

use super::block_repo::{block_exists_on, list_blocks_on};
use super::support::{
    bool_to_int, count_to_u32, ensure_connection_ready, parse_bool, parse_uuid, NOW_MS_SQL,
};
use super::{RepoError, RepoResult};
use crate::model::block::NecessityBlock;
use crate::model::objective::{
    Objective, ObjectiveAddOutcome, ObjectiveCategory, ObjectiveId, ObjectivePatch,
    ObjectiveScope,
};
use crate::model::period::PeriodKey;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use uuid::Uuid;

const OBJECTIVE_SELECT_SQL: &str = "SELECT
    o.uuid AS uuid,
    o.category AS category,
    o.block_uuid AS block_uuid,
    o.period_key AS period_key,
    o.text AS text,
    o.is_completed AS is_completed,
    o.sort_order AS sort_order
FROM objectives o";

const OBJECTIVE_INSERT_SQL: &str = "INSERT INTO objectives (
    uuid,
    category,
    block_uuid,
    period_key,
    text,
    is_completed,
    sort_order
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);";

/// Rows touched and returned by one period reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodRecords {
    pub blocks: Vec<NecessityBlock>,
    pub objectives: Vec<Objective>,
    /// Objectives of other periods removed by the sweep.
    pub swept: usize,
    /// Placeholders inserted by this call.
    pub generated: usize,
}

/// Repository interface for objectives.
pub trait ObjectiveRepository {
    fn list_scope(&self, scope: &ObjectiveScope) -> RepoResult<Vec<Objective>>;
    /// Every category-scoped objective, grouped by category.
    fn list_categories(&self) -> RepoResult<Vec<Objective>>;
    /// Every objective of one period, grouped by block order.
    fn list_period(&self, period: PeriodKey) -> RepoResult<Vec<Objective>>;
    fn get_objective(&self, id: ObjectiveId) -> RepoResult<Option<Objective>>;
    fn count_scope(&self, scope: &ObjectiveScope) -> RepoResult<u32>;
    /// Inserts one objective unless the scope already holds `limit` rows.
    fn insert_within_quota(
        &self,
        scope: &ObjectiveScope,
        text: &str,
        limit: u32,
    ) -> RepoResult<ObjectiveAddOutcome>;
    /// Applies a partial update; `None` when the objective does not exist.
    fn update_objective(
        &self,
        id: ObjectiveId,
        patch: &ObjectivePatch,
    ) -> RepoResult<Option<Objective>>;
    fn toggle_objective(&self, id: ObjectiveId) -> RepoResult<Option<Objective>>;
    /// Returns the number of rows removed (0 or 1).
    fn delete_objective(&self, id: ObjectiveId) -> RepoResult<usize>;
    /// Returns the number of rows removed.
    fn clear_scope(&self, scope: &ObjectiveScope) -> RepoResult<usize>;
    /// Sweeps other periods and fills an empty `period` with placeholders.
    fn reconcile_period(
        &self,
        period: PeriodKey,
        placeholders_per_block: u32,
    ) -> RepoResult<PeriodRecords>;
}

/// SQLite-backed objective repository.
pub struct SqliteObjectiveRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteObjectiveRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "objectives",
            &[
                "uuid",
                "category",
                "block_uuid",
                "period_key",
                "text",
                "is_completed",
                "sort_order",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl ObjectiveRepository for SqliteObjectiveRepository<'_> {
    fn list_scope(&self, scope: &ObjectiveScope) -> RepoResult<Vec<Objective>> {
        let (filter, bind_values) = scope_filter(scope);
        query_objectives(
            self.conn,
            &format!(
                "{OBJECTIVE_SELECT_SQL}
                 WHERE {filter}
                 ORDER BY o.sort_order ASC, o.rowid ASC;"
            ),
            bind_values,
        )
    }

    fn list_categories(&self) -> RepoResult<Vec<Objective>> {
        query_objectives(
            self.conn,
            &format!(
                "{OBJECTIVE_SELECT_SQL}
                 WHERE o.category IS NOT NULL
                 ORDER BY
                    CASE o.category
                        WHEN 'long_term_purpose' THEN 0
                        WHEN 'weekly_purpose' THEN 1
                        ELSE 2
                    END ASC,
                    o.sort_order ASC,
                    o.rowid ASC;"
            ),
            Vec::new(),
        )
    }

    fn list_period(&self, period: PeriodKey) -> RepoResult<Vec<Objective>> {
        list_period_on(self.conn, period)
    }

    fn get_objective(&self, id: ObjectiveId) -> RepoResult<Option<Objective>> {
        self.conn
            .query_row(
                &format!("{OBJECTIVE_SELECT_SQL} WHERE o.uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_objective_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn count_scope(&self, scope: &ObjectiveScope) -> RepoResult<u32> {
        count_scope_on(self.conn, scope)
    }

    fn insert_within_quota(
        &self,
        scope: &ObjectiveScope,
        text: &str,
        limit: u32,
    ) -> RepoResult<ObjectiveAddOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if let ObjectiveScope::BlockPeriod { block_id, .. } = scope {
            if !block_exists_on(&tx, *block_id)? {
                return Err(RepoError::BlockNotFound(*block_id));
            }
        }

        let count = count_scope_on(&tx, scope)?;
        if count >= limit {
            return Ok(ObjectiveAddOutcome::QuotaExceeded { limit });
        }

        let objective = Objective {
            id: Uuid::new_v4(),
            scope: *scope,
            text: text.to_string(),
            is_completed: false,
            sort_order: next_sort_order_on(&tx, scope)?,
        };
        insert_objective_on(&tx, &objective)?;
        tx.commit()?;

        Ok(ObjectiveAddOutcome::Created(objective))
    }

    fn update_objective(
        &self,
        id: ObjectiveId,
        patch: &ObjectivePatch,
    ) -> RepoResult<Option<Objective>> {
        if patch.is_empty() {
            return self.get_objective(id);
        }

        let changed = self.conn.execute(
            &format!(
                "UPDATE objectives
                 SET text = COALESCE(?2, text),
                     is_completed = COALESCE(?3, is_completed),
                     updated_at = {NOW_MS_SQL}
                 WHERE uuid = ?1;"
            ),
            params![
                id.to_string(),
                patch.text.as_deref(),
                patch.is_completed.map(bool_to_int),
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_objective(id)
    }

    fn toggle_objective(&self, id: ObjectiveId) -> RepoResult<Option<Objective>> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE objectives
                 SET is_completed = 1 - is_completed,
                     updated_at = {NOW_MS_SQL}
                 WHERE uuid = ?1;"
            ),
            [id.to_string()],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_objective(id)
    }

    fn delete_objective(&self, id: ObjectiveId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM objectives WHERE uuid = ?1;", [id.to_string()])?;
        Ok(removed)
    }

    fn clear_scope(&self, scope: &ObjectiveScope) -> RepoResult<usize> {
        let (filter, bind_values) = scope_filter(scope);
        let removed = self.conn.execute(
            &format!(
                "DELETE FROM objectives
                 WHERE uuid IN (SELECT o.uuid FROM objectives o WHERE {filter});"
            ),
            params_from_iter(bind_values),
        )?;
        Ok(removed)
    }

    fn reconcile_period(
        &self,
        period: PeriodKey,
        placeholders_per_block: u32,
    ) -> RepoResult<PeriodRecords> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let swept = tx.execute(
            "DELETE FROM objectives
             WHERE period_key IS NOT NULL
               AND period_key <> ?1;",
            [period.to_string()],
        )?;

        let blocks = list_blocks_on(&tx)?;
        let mut objectives = list_period_on(&tx, period)?;
        let mut generated = 0;

        if objectives.is_empty() && !blocks.is_empty() && placeholders_per_block > 0 {
            for block in &blocks {
                let scope = ObjectiveScope::BlockPeriod {
                    block_id: block.id,
                    period,
                };
                for sort_order in 0..placeholders_per_block {
                    let placeholder = Objective::placeholder(scope, i64::from(sort_order));
                    insert_objective_on(&tx, &placeholder)?;
                    generated += 1;
                }
            }
            objectives = list_period_on(&tx, period)?;
        }

        tx.commit()?;
        Ok(PeriodRecords {
            blocks,
            objectives,
            swept,
            generated,
        })
    }
}

fn scope_filter(scope: &ObjectiveScope) -> (&'static str, Vec<Value>) {
    match scope {
        ObjectiveScope::Category(category) => (
            "o.category = ?1",
            vec![Value::Text(category.as_str().to_string())],
        ),
        ObjectiveScope::BlockPeriod { block_id, period } => (
            "o.block_uuid = ?1 AND o.period_key = ?2",
            vec![
                Value::Text(block_id.to_string()),
                Value::Text(period.to_string()),
            ],
        ),
    }
}

fn count_scope_on(conn: &Connection, scope: &ObjectiveScope) -> RepoResult<u32> {
    let (filter, bind_values) = scope_filter(scope);
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM objectives o WHERE {filter};"),
        params_from_iter(bind_values),
        |row| row.get(0),
    )?;
    count_to_u32(count, "objectives scope count")
}

fn next_sort_order_on(conn: &Connection, scope: &ObjectiveScope) -> RepoResult<i64> {
    let (filter, bind_values) = scope_filter(scope);
    let next = conn.query_row(
        &format!("SELECT COALESCE(MAX(o.sort_order) + 1, 0) FROM objectives o WHERE {filter};"),
        params_from_iter(bind_values),
        |row| row.get(0),
    )?;
    Ok(next)
}

fn list_period_on(conn: &Connection, period: PeriodKey) -> RepoResult<Vec<Objective>> {
    query_objectives(
        conn,
        &format!(
            "{OBJECTIVE_SELECT_SQL}
             INNER JOIN necessity_blocks b ON b.uuid = o.block_uuid
             WHERE o.period_key = ?1
             ORDER BY b.sort_order ASC, b.rowid ASC, o.sort_order ASC, o.rowid ASC;"
        ),
        vec![Value::Text(period.to_string())],
    )
}

fn insert_objective_on(conn: &Connection, objective: &Objective) -> RepoResult<()> {
    let (category, block_uuid, period_key) = match objective.scope {
        ObjectiveScope::Category(category) => (Some(category.as_str()), None, None),
        ObjectiveScope::BlockPeriod { block_id, period } => {
            (None, Some(block_id.to_string()), Some(period.to_string()))
        }
    };
    conn.execute(
        OBJECTIVE_INSERT_SQL,
        params![
            objective.id.to_string(),
            category,
            block_uuid,
            period_key,
            objective.text.as_str(),
            bool_to_int(objective.is_completed),
            objective.sort_order,
        ],
    )?;
    Ok(())
}

fn query_objectives(
    conn: &Connection,
    sql: &str,
    bind_values: Vec<Value>,
) -> RepoResult<Vec<Objective>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut objectives = Vec::new();
    while let Some(row) = rows.next()? {
        objectives.push(parse_objective_row(row)?);
    }
    Ok(objectives)
}

fn parse_objective_row(row: &Row<'_>) -> RepoResult<Objective> {
    let uuid_text: String = row.get("uuid")?;
    let category: Option<String> = row.get("category")?;
    let block_uuid: Option<String> = row.get("block_uuid")?;
    let period_key: Option<String> = row.get("period_key")?;

    let scope = match (category, block_uuid, period_key) {
        (Some(category), None, None) => {
            let parsed = ObjectiveCategory::parse(&category).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid category `{category}` in objectives.category"
                ))
            })?;
            ObjectiveScope::Category(parsed)
        }
        (None, Some(block_uuid), Some(period_key)) => ObjectiveScope::BlockPeriod {
            block_id: parse_uuid(&block_uuid, "objectives.block_uuid")?,
            period: period_key.parse().map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid period key `{period_key}` in objectives.period_key"
                ))
            })?,
        },
        _ => {
            return Err(RepoError::InvalidData(format!(
                "objective `{uuid_text}` has no single valid scope"
            )));
        }
    };

    Ok(Objective {
        id: parse_uuid(&uuid_text, "objectives.uuid")?,
        scope,
        text: row.get("text")?,
        is_completed: parse_bool(row.get("is_completed")?, "objectives.is_completed")?,
        sort_order: row.get("sort_order")?,
    })
}
