//! HTTP surface for the article lifecycle engine.
//!
//! # Responsibility
//! - Bind JSON requests to `article_core` service calls.
//! - Map typed engine outcomes onto HTTP status codes.
//! - Load process configuration from the environment.
//!
//! # Invariants
//! - No business rule lives here; every decision comes from `ArticleService`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
