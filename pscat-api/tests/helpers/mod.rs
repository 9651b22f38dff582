//! Shared helpers for pscat-api integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use pscat_api::db::{init_memory_database, users::create_user};
use pscat_api::{build_router, AppState};
use pscat_common::auth::Role;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

pub const BOUNDARY: &str = "pscat-test-boundary";

/// Upload limit used by the test app
pub const TEST_MAX_UPLOAD_BYTES: usize = 64 * 1024;

/// App over a fresh in-memory database
pub async fn test_app() -> (Router, SqlitePool) {
    let pool = init_memory_database()
        .await
        .expect("Should create in-memory database");
    let app = build_router(AppState::new(pool.clone(), TEST_MAX_UPLOAD_BYTES));
    (app, pool)
}

/// Create a user with `role`, returning its id and bearer token
pub async fn user_with_role(pool: &SqlitePool, role: Role) -> (Uuid, String) {
    let email = format!("{}-{}@example.edu", role, Uuid::new_v4());
    let (user, token) = create_user(pool, "Test User", &email, role)
        .await
        .expect("Should create user");
    (user.id, token)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("Router should not fail")
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// `multipart/form-data` body with one file part
pub fn multipart_body(
    field: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/problem-statements/bulk-upload")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Upload `csv` as `problems.csv` with a CSV content type
pub fn csv_upload(token: &str, csv: &str) -> Request<Body> {
    upload_request(token, multipart_body("file", "problems.csv", "text/csv", csv.as_bytes()))
}

pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn extract_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

/// Valid body for manual creation in `domain`
pub fn create_body(domain: &str) -> Value {
    serde_json::json!({
        "title": "Offline Voice Assistant for Labs",
        "abstract": "Build a voice assistant that answers lab equipment questions without any network connection.",
        "domain": domain,
        "category": "Major",
        "difficulty": "Intermediate",
        "duration": "4 months",
        "technologies": ["Rust", "Whisper"],
        "deliverables": ["Prototype", "Report"],
        "tags": ["voice", "accessibility"]
    })
}
