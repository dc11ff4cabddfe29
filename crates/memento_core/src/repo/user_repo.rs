//! User profile repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the single user profile and its settings.
//!
//! # Invariants
//! - The primary user is the earliest inserted row; the core never assumes
//!   the table holds exactly one row.
//! - Updates targeting a missing user change nothing and report `None`.

use super::support::{ensure_connection_ready, format_date, parse_date, parse_uuid, NOW_MS_SQL};
use super::{RepoError, RepoResult};
use crate::model::user::{SettingsUpdate, UserId, UserProfile};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    uuid,
    birth_date,
    lifespan_years,
    purpose_label
FROM users";

/// Repository interface for the user profile.
pub trait UserRepository {
    /// Inserts one profile. Used by the external seeding collaborator.
    fn create_user(&self, user: &UserProfile) -> RepoResult<UserId>;
    /// Loads the earliest inserted profile, if any.
    fn primary_user(&self) -> RepoResult<Option<UserProfile>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<UserProfile>>;
    /// Applies a settings update; `None` when the user does not exist.
    fn update_settings(
        &self,
        id: UserId,
        update: &SettingsUpdate,
    ) -> RepoResult<Option<UserProfile>>;
    fn update_purpose_label(&self, id: UserId, label: &str) -> RepoResult<Option<UserProfile>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "users",
            &["uuid", "birth_date", "lifespan_years", "purpose_label"],
        )?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &UserProfile) -> RepoResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (uuid, birth_date, lifespan_years, purpose_label)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.id.to_string(),
                format_date(user.birth_date),
                i64::from(user.lifespan_years),
                user.purpose_label.as_str(),
            ],
        )?;
        Ok(user.id)
    }

    fn primary_user(&self) -> RepoResult<Option<UserProfile>> {
        self.conn
            .query_row(
                &format!("{USER_SELECT_SQL} ORDER BY rowid ASC LIMIT 1;"),
                [],
                |row| Ok(parse_user_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<UserProfile>> {
        self.conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_user_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn update_settings(
        &self,
        id: UserId,
        update: &SettingsUpdate,
    ) -> RepoResult<Option<UserProfile>> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE users
                 SET birth_date = ?2,
                     lifespan_years = ?3,
                     purpose_label = COALESCE(?4, purpose_label),
                     updated_at = {NOW_MS_SQL}
                 WHERE uuid = ?1;"
            ),
            params![
                id.to_string(),
                format_date(update.birth_date),
                i64::from(update.lifespan_years),
                update.purpose_label.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_user(id)
    }

    fn update_purpose_label(&self, id: UserId, label: &str) -> RepoResult<Option<UserProfile>> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE users
                 SET purpose_label = ?2,
                     updated_at = {NOW_MS_SQL}
                 WHERE uuid = ?1;"
            ),
            params![id.to_string(), label],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_user(id)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<UserProfile> {
    let uuid_text: String = row.get("uuid")?;
    let birth_date_text: String = row.get("birth_date")?;
    let lifespan: i64 = row.get("lifespan_years")?;
    let lifespan_years = u32::try_from(lifespan)
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid lifespan `{lifespan}` in users.lifespan_years"
            ))
        })?;

    Ok(UserProfile {
        id: parse_uuid(&uuid_text, "users.uuid")?,
        birth_date: parse_date(&birth_date_text, "users.birth_date")?,
        lifespan_years,
        purpose_label: row.get("purpose_label")?,
    })
}
