//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts, one per collection.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repositories never decide quota or validation policy.
//! - Multi-statement writes run inside one `IMMEDIATE` transaction.
//! - Repository APIs return semantic errors in addition to DB transport errors.

pub mod affirmation_repo;
pub mod block_repo;
mod error;
pub mod objective_repo;
pub mod schedule_repo;
mod support;
pub mod user_repo;

pub use error::{RepoError, RepoResult};
