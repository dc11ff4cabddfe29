//! Service layer.
//!
//! Services own validation, quota policy and logging. Storage access goes
//! through the repository traits so each service can be driven by an
//! in-memory connection in tests.

pub mod affirmation_service;
pub mod block_service;
pub mod dashboard_service;
pub mod death_clock;
pub mod objective_service;
pub mod period_service;
pub mod schedule_service;
pub mod settings_service;
