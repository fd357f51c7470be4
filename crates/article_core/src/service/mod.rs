//! Lifecycle use-case services.
//!
//! # Responsibility
//! - Apply article business rules on top of an `ArticleStore`.
//! - Keep transports (HTTP, CLI) decoupled from storage details.

pub mod article_service;
