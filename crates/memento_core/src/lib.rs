//! Core domain logic for Memento.
//! This crate owns the life-planning invariants: objective quotas, weekly
//! reconciliation, the schedule grid and the remaining-lifetime clock.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, LifeConfig, ObjectiveQuotas};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::affirmation::{Affirmation, AffirmationId, FALLBACK_AFFIRMATION};
pub use model::block::{BlockId, NecessityBlock, DEFAULT_BLOCK_COLOR};
pub use model::objective::{
    Objective, ObjectiveAddOutcome, ObjectiveCategory, ObjectiveId, ObjectivePatch,
    ObjectiveScope,
};
pub use model::period::{PeriodKey, PeriodKeyError};
pub use model::schedule::{
    AllocationInput, GridCell, GridValidationError, ScheduleAllocation, SlotType,
};
pub use model::user::{SettingsUpdate, UserId, UserProfile};
pub use repo::affirmation_repo::{AffirmationRepository, SqliteAffirmationRepository};
pub use repo::block_repo::{BlockRepository, SqliteBlockRepository};
pub use repo::objective_repo::{ObjectiveRepository, SqliteObjectiveRepository};
pub use repo::schedule_repo::{ScheduleRepository, SqliteScheduleRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::affirmation_service::{AffirmationRotator, AffirmationServiceError};
pub use service::block_service::{BlockRegistry, BlockServiceError};
pub use service::dashboard_service::{DashboardService, DashboardView};
pub use service::death_clock::{compute_remaining, DeathClock, DeathClockService, Remaining};
pub use service::objective_service::{ObjectiveQuotaLedger, ObjectiveServiceError};
pub use service::period_service::{PeriodReconciler, PeriodSnapshot, PeriodState};
pub use service::schedule_service::{AllocationSummary, ScheduleError, ScheduleGrid};
pub use service::settings_service::{SettingsError, SettingsService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
