//! Domain model for the life-planning core.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Represent closed value sets (categories, slot types, scopes) as enums.
//!
//! # Invariants
//! - Every persisted record is identified by a stable UUID.
//! - Invalid category/slot strings are unrepresentable past the repository
//!   decode step.

pub mod affirmation;
pub mod block;
pub mod objective;
pub mod period;
pub mod schedule;
pub mod user;
