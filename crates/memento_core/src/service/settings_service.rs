//! User settings updates.
//!
//! # Invariants
//! - `lifespan_years` stays within `1..=max_lifespan_years`.
//! - `birth_date` is never after the current UTC date.
//! - Missing users are a silent no-op (`None`).

use crate::config::LifeConfig;
use crate::model::user::{SettingsUpdate, UserId, UserProfile};
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::{NaiveDate, Utc};
use log::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("lifespan_years {value} is out of range 1..={max}")]
    LifespanOutOfRange { value: u32, max: u32 },
    #[error("birth_date {0} is in the future")]
    BirthDateInFuture(NaiveDate),
    #[error("{0}")]
    Repo(#[from] RepoError),
}

pub struct SettingsService<R: UserRepository> {
    repo: R,
    max_lifespan_years: u32,
}

impl<R: UserRepository> SettingsService<R> {
    pub fn new(repo: R, config: &LifeConfig) -> Self {
        Self {
            repo,
            max_lifespan_years: config.max_lifespan_years,
        }
    }

    /// Profile owning blocks and settings, if seeded.
    pub fn primary_user(&self) -> RepoResult<Option<UserProfile>> {
        self.repo.primary_user()
    }

    pub fn update_user_settings(
        &self,
        user_id: UserId,
        update: &SettingsUpdate,
    ) -> Result<Option<UserProfile>, SettingsError> {
        self.update_user_settings_as_of(user_id, update, Utc::now().date_naive())
    }

    /// Same as [`Self::update_user_settings`] with an explicit current date.
    pub fn update_user_settings_as_of(
        &self,
        user_id: UserId,
        update: &SettingsUpdate,
        today: NaiveDate,
    ) -> Result<Option<UserProfile>, SettingsError> {
        if update.lifespan_years == 0 || update.lifespan_years > self.max_lifespan_years {
            return Err(SettingsError::LifespanOutOfRange {
                value: update.lifespan_years,
                max: self.max_lifespan_years,
            });
        }
        if update.birth_date > today {
            return Err(SettingsError::BirthDateInFuture(update.birth_date));
        }

        let updated = self.repo.update_settings(user_id, update)?;
        match &updated {
            Some(_) => info!(
                "event=settings_update module=settings status=ok label_changed={}",
                update.purpose_label.is_some()
            ),
            None => debug!("event=settings_update module=settings status=not_found"),
        }
        Ok(updated)
    }

    pub fn update_purpose_label(
        &self,
        user_id: UserId,
        label: &str,
    ) -> RepoResult<Option<UserProfile>> {
        let updated = self.repo.update_purpose_label(user_id, label)?;
        if updated.is_none() {
            debug!("event=purpose_label_update module=settings status=not_found");
        }
        Ok(updated)
    }
}
