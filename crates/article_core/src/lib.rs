//! Core lifecycle engine for the article resource.
//! This crate is the single source of truth for article invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::article::{
    normalize_status, validate_fields, Article, ArticleId, ArticleStatus, ArticleValidationError,
    NewArticle,
};
pub use repo::article_repo::{
    ArticleStore, PageQuery, RepoError, RepoResult, SqliteArticleRepository,
};
pub use service::article_service::{
    ArticleService, ArticleServiceError, CreateArticleRequest, ServiceResult,
    UpdateArticleRequest,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
