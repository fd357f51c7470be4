use article_core::db::open_db_in_memory;
use article_server::{build_router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    build_router(AppState::new(open_db_in_memory().unwrap()))
}

fn valid_body(status: &str) -> Value {
    json!({
        "title": "Shipping an article service in Rust",
        "content": "Lorem ipsum dolor sit amet. ".repeat(10),
        "category": "engineering",
        "status": status,
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, status: &str) -> Value {
    let (code, body) = send(app, Method::POST, "/api/v1/article", Some(valid_body(status))).await;
    assert_eq!(code, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn health_reports_version() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn create_returns_201_with_canonical_record() {
    let app = app();
    let body = create(&app, "PUBLISH").await;

    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["status"], "Publish");
    assert_eq!(body["category"], "engineering");
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn create_with_invalid_fields_is_400() {
    let app = app();

    let mut body = valid_body("draft");
    body["title"] = json!("too short");
    let (status, error) = send(&app, Method::POST, "/api/v1/article", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("title"));

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/v1/article",
        Some(valid_body("archived")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("status"));

    let (status, list) = send(&app, Method::GET, "/api/v1/article/10/0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn create_with_malformed_body_is_400() {
    let app = app();
    let (status, error) = send(
        &app,
        Method::POST,
        "/api/v1/article",
        Some(json!({ "title": "missing the other fields entirely" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "invalid request body");
}

#[tokio::test]
async fn get_roundtrips_created_record() {
    let app = app();
    let created = create(&app, "draft").await;
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, Method::GET, &format!("/api/v1/article/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_missing_is_404_and_bad_id_is_400() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/api/v1/article/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, error) = send(&app, Method::GET, "/api/v1/article/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "invalid article id");
}

#[tokio::test]
async fn list_pages_newest_first() {
    let app = app();
    let first = create(&app, "draft").await;
    let second = create(&app, "draft").await;
    let third = create(&app, "draft").await;

    let (status, page) = send(&app, Method::GET, "/api/v1/article/2/0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, json!([third, second]));

    let (_, rest) = send(&app, Method::GET, "/api/v1/article/2/2", None).await;
    assert_eq!(rest, json!([first]));
}

#[tokio::test]
async fn list_with_bad_integers_is_400() {
    let app = app();
    for uri in ["/api/v1/article/x/0", "/api/v1/article/5/-1"] {
        let (status, error) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(error["error"], "invalid limit or offset");
    }
}

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let app = app();
    let created = create(&app, "publish").await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/article/{id}"),
        Some(json!({ "status": "trash" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Trash");
    for field in ["id", "title", "content", "category", "createdAt"] {
        assert_eq!(updated[field], created[field], "{field} must not change");
    }
}

#[tokio::test]
async fn invalid_update_is_400_and_leaves_record_unchanged() {
    let app = app();
    let created = create(&app, "draft").await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/v1/article/{id}");

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "content": "x".repeat(50) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_missing_is_404() {
    let (status, _) = send(
        &app(),
        Method::PUT,
        "/api/v1/article/77",
        Some(json!({ "status": "draft" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_delete_again_is_404() {
    let app = app();
    let created = create(&app, "draft").await;
    let uri = format!("/api/v1/article/{}", created["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "article deleted successfully");

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_headers_are_present() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn storage_failures_map_to_500_except_delete_which_is_400() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE articles;").unwrap();
    let app = build_router(AppState::new(conn));

    let (status, _) = send(&app, Method::GET, "/api/v1/article/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::GET, "/api/v1/article/10/0", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::POST, "/api/v1/article", Some(valid_body("draft"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, error) = send(&app, Method::DELETE, "/api/v1/article/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().starts_with("storage error"));
}
