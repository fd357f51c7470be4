//! Route table and middleware stack.

use crate::handlers::{
    create_article, delete_article, get_article, health, list_articles, update_article,
};
use crate::state::AppState;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::time::Instant;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

/// Prefix under which the article routes are mounted.
pub const API_PREFIX: &str = "/api/v1";

/// Builds the full application router around `state`.
pub fn build_router(state: AppState) -> Router {
    let articles = Router::new()
        .route("/article", post(create_article))
        .route("/article/:limit/:offset", get(list_articles))
        .route(
            "/article/:id",
            get(get_article).put(update_article).delete(delete_article),
        );

    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, articles)
        .with_state(state)
        .layer(middleware::from_fn(log_request))
        .layer(CatchPanicLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=api method={method} path={path} http_status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
