//! Dashboard read model.
//!
//! Composes every read path over one connection. Reconciling the requested
//! week is the only write this load performs.

use crate::config::LifeConfig;
use crate::model::affirmation::Affirmation;
use crate::model::objective::Objective;
use crate::model::period::PeriodKey;
use crate::model::schedule::ScheduleAllocation;
use crate::repo::affirmation_repo::SqliteAffirmationRepository;
use crate::repo::objective_repo::SqliteObjectiveRepository;
use crate::repo::schedule_repo::SqliteScheduleRepository;
use crate::repo::user_repo::SqliteUserRepository;
use crate::repo::RepoResult;
use crate::service::affirmation_service::AffirmationRotator;
use crate::service::death_clock::{DeathClock, DeathClockService};
use crate::service::objective_service::ObjectiveQuotaLedger;
use crate::service::period_service::{PeriodReconciler, PeriodSnapshot};
use crate::service::schedule_service::ScheduleGrid;
use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    /// `None` until a user profile has been seeded.
    pub death_clock: Option<DeathClock>,
    /// Category-scoped objectives.
    pub objectives: Vec<Objective>,
    pub period: PeriodSnapshot,
    pub allocations: Vec<ScheduleAllocation>,
    pub affirmation: String,
    pub affirmations: Vec<Affirmation>,
    pub purpose_color: String,
}

pub struct DashboardService<'conn> {
    conn: &'conn Connection,
    config: LifeConfig,
}

impl<'conn> DashboardService<'conn> {
    pub fn new(conn: &'conn Connection, config: &LifeConfig) -> Self {
        Self {
            conn,
            config: config.clone(),
        }
    }

    pub fn load(&self, period: PeriodKey) -> RepoResult<DashboardView> {
        self.load_with(period, Utc::now(), &mut rand::thread_rng())
    }

    /// Loads the view with an explicit clock and random source.
    pub fn load_with<G: Rng + ?Sized>(
        &self,
        period: PeriodKey,
        now: DateTime<Utc>,
        rng: &mut G,
    ) -> RepoResult<DashboardView> {
        let started_at = Instant::now();

        let death_clock =
            DeathClockService::new(SqliteUserRepository::try_new(self.conn)?).get_death_clock_at(now)?;
        let objectives = ObjectiveQuotaLedger::new(
            SqliteObjectiveRepository::try_new(self.conn)?,
            &self.config,
        )
        .list_all_categories()?;
        let period = PeriodReconciler::new(
            SqliteObjectiveRepository::try_new(self.conn)?,
            &self.config,
        )
        .ensure_period(period)?;
        let allocations =
            ScheduleGrid::new(SqliteScheduleRepository::try_new(self.conn)?).list_allocations()?;
        let rotator = AffirmationRotator::new(SqliteAffirmationRepository::try_new(self.conn)?);
        let affirmation = rotator.pick_random_with(rng)?;
        let affirmations = rotator.list()?;

        info!(
            "event=dashboard_load module=dashboard status=ok has_user={} objectives={} period_objectives={} allocations={} duration_ms={}",
            death_clock.is_some(),
            objectives.len(),
            period.objectives.len(),
            allocations.len(),
            started_at.elapsed().as_millis()
        );

        Ok(DashboardView {
            death_clock,
            objectives,
            period,
            allocations,
            affirmation,
            affirmations,
            purpose_color: self.config.purpose_color.clone(),
        })
    }
}
