//! Article route handlers.
//!
//! Path segments and bodies are parsed here; every rule beyond "is this
//! well-formed input" is delegated to the engine.

use crate::error::ApiError;
use crate::state::AppState;
use article_core::{
    core_version, Article, ArticleId, CreateArticleRequest, UpdateArticleRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": core_version() }))
}

pub async fn create_article(
    State(state): State<AppState>,
    body: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let Json(request) = body.map_err(|_| ApiError::bad_request("invalid request body"))?;
    let article = state
        .with_service(move |service| service.create(&request))
        .await??;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn list_articles(
    State(state): State<AppState>,
    Path((limit, offset)): Path<(String, String)>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let (Ok(limit), Ok(offset)) = (limit.parse::<u32>(), offset.parse::<u32>()) else {
        return Err(ApiError::bad_request("invalid limit or offset"));
    };
    let articles = state
        .with_service(move |service| service.list(limit, offset))
        .await??;
    Ok(Json(articles))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let id = parse_id(&id)?;
    let article = state
        .with_service(move |service| service.get_by_id(id))
        .await??;
    Ok(Json(article))
}

pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateArticleRequest>, JsonRejection>,
) -> Result<Json<Article>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = body.map_err(|_| ApiError::bad_request("invalid request body"))?;
    let article = state
        .with_service(move |service| service.update(id, &request))
        .await??;
    Ok(Json(article))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state
        .with_service(move |service| service.delete(id))
        .await?
        .map_err(|err| ApiError::from_service(err, StatusCode::BAD_REQUEST))?;
    Ok(Json(json!({ "message": "article deleted successfully" })))
}

fn parse_id(raw: &str) -> Result<ArticleId, ApiError> {
    raw.parse::<ArticleId>()
        .map_err(|_| ApiError::bad_request("invalid article id"))
}
