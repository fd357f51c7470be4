//! Domain model for the article resource.
//!
//! # Responsibility
//! - Define the canonical article record and its status enum.
//! - Own the pure field validation and status normalization rules.
//!
//! # Invariants
//! - Every persisted article is identified by a store-assigned `ArticleId`.
//! - An `Article` reachable through core always passes `Article::validate()`.

pub mod article;
