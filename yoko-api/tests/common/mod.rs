//! Shared helpers for yoko-api integration tests

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::util::ServiceExt;
use yoko_api::mailer::Mailer;
use yoko_api::AppState;

/// Router over a fresh in-memory database, mail disabled
pub async fn test_app() -> (Router, SqlitePool) {
    let pool = yoko_common::db::open_in_memory()
        .await
        .expect("Failed to create in-memory database");
    let app = yoko_api::build_router(AppState::new(pool.clone(), Mailer::disabled()));
    (app, pool)
}

/// Send one request and decode the JSON body (`Value::Null` when empty or
/// not JSON)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    dispatch(app, builder.body(body).unwrap()).await
}

/// Send a JSON-typed request whose body is taken verbatim
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Submit an applicant and return the new id
pub async fn submit(app: &Router, body: Value) -> i64 {
    let (status, json) = post(app, "/api/submit", body).await;
    assert_eq!(status, StatusCode::CREATED, "submit failed: {}", json);
    json["id"].as_i64().unwrap()
}

pub fn applicant(name: &str, fields: &[&str]) -> Value {
    serde_json::json!({
        "full_name": name,
        "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        "fields": fields,
    })
}
