//! Affirmation repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Listing order is insertion order (`rowid ASC`).
//! - Updates and deletes of missing ids change nothing.

use super::support::{ensure_connection_ready, parse_uuid, NOW_MS_SQL};
use super::RepoResult;
use crate::model::affirmation::{Affirmation, AffirmationId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

/// Repository interface for the affirmation pool.
pub trait AffirmationRepository {
    fn list_affirmations(&self) -> RepoResult<Vec<Affirmation>>;
    fn get_affirmation(&self, id: AffirmationId) -> RepoResult<Option<Affirmation>>;
    fn create_affirmation(&self, text: &str) -> RepoResult<Affirmation>;
    fn update_affirmation(&self, id: AffirmationId, text: &str)
        -> RepoResult<Option<Affirmation>>;
    /// Returns whether a row was removed.
    fn delete_affirmation(&self, id: AffirmationId) -> RepoResult<bool>;
}

/// SQLite-backed affirmation repository.
pub struct SqliteAffirmationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAffirmationRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "affirmations", &["uuid", "text"])?;
        Ok(Self { conn })
    }
}

impl AffirmationRepository for SqliteAffirmationRepository<'_> {
    fn list_affirmations(&self) -> RepoResult<Vec<Affirmation>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, text FROM affirmations ORDER BY rowid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut affirmations = Vec::new();
        while let Some(row) = rows.next()? {
            affirmations.push(parse_affirmation_row(row)?);
        }
        Ok(affirmations)
    }

    fn get_affirmation(&self, id: AffirmationId) -> RepoResult<Option<Affirmation>> {
        self.conn
            .query_row(
                "SELECT uuid, text FROM affirmations WHERE uuid = ?1;",
                [id.to_string()],
                |row| Ok(parse_affirmation_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn create_affirmation(&self, text: &str) -> RepoResult<Affirmation> {
        let affirmation = Affirmation {
            id: Uuid::new_v4(),
            text: text.to_string(),
        };
        self.conn.execute(
            "INSERT INTO affirmations (uuid, text) VALUES (?1, ?2);",
            params![affirmation.id.to_string(), affirmation.text.as_str()],
        )?;
        Ok(affirmation)
    }

    fn update_affirmation(
        &self,
        id: AffirmationId,
        text: &str,
    ) -> RepoResult<Option<Affirmation>> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE affirmations
                 SET text = ?2,
                     updated_at = {NOW_MS_SQL}
                 WHERE uuid = ?1;"
            ),
            params![id.to_string(), text],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(Affirmation {
            id,
            text: text.to_string(),
        }))
    }

    fn delete_affirmation(&self, id: AffirmationId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM affirmations WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn parse_affirmation_row(row: &Row<'_>) -> RepoResult<Affirmation> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Affirmation {
        id: parse_uuid(&uuid_text, "affirmations.uuid")?,
        text: row.get("text")?,
    })
}
