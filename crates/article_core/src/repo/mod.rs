//! Persistence contracts for articles and their SQLite implementation.
//!
//! # Responsibility
//! - Define the store interface the lifecycle engine depends on.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - Write paths run `validate()` before any SQL mutation.
//! - Absence is reported as `RepoError::NotFound` (mutations) or `None`
//!   (lookups), never as a zero-value record.

pub mod article_repo;
