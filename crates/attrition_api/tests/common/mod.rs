#![allow(dead_code)]

use core::time::Duration;
use std::path::Path;

use attrition_api::http::{API_KEY_HEADER, AppState, router};
use attrition_structs::NewEmployee;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use database::{
    count_prediction_logs, create_memory_pool, create_pool, insert_employee, run_migrations,
};
use scorer::{LogisticModel, ModelBundle, ScorerState};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt as _;

pub const TEST_API_KEY: &str = "test-api-key-for-ci";

pub async fn test_pool() -> SqlitePool {
    let pool = create_memory_pool().await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub fn test_bundle() -> ModelBundle {
    serde_json::from_value(json!({
        "model_version": "logreg-test-1",
        "threshold": 0.42,
        "features": [
            {"name": "age", "kind": "numeric", "impute": 37.0, "mean": 37.0, "scale": 9.0},
            {"name": "revenu_mensuel", "kind": "numeric", "impute": 6500.0, "mean": 6500.0, "scale": 4700.0},
            {"name": "heures_supplementaires", "kind": "boolean"},
            {"name": "departement", "kind": "categorical", "levels": ["Commercial", "Consulting", "Ressources Humaines"]},
        ],
        "weights": [-0.4, -0.3, 1.1, 0.2, -0.1, 0.3],
        "bias": -0.6,
    }))
    .unwrap()
}

pub fn ready_scorer() -> ScorerState {
    ScorerState::ready(LogisticModel::from_bundle(test_bundle()).unwrap())
}

pub async fn seed_employee(pool: &SqlitePool, identifier: &str, features: Value, target: Option<&str>) {
    let Value::Object(features) = features else {
        panic!("features must be an object");
    };
    insert_employee(
        pool,
        &NewEmployee {
            identifier: identifier.to_string(),
            features,
            target: target.map(str::to_string),
        },
    )
    .await
    .unwrap();
}

/// File-backed pool in `dir`, for tests that need more than one connection.
pub async fn file_pool(dir: &Path) -> SqlitePool {
    let url = format!("sqlite://{}", dir.join("attrition.db").display());
    let pool = create_pool(&url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub fn app(pool: SqlitePool, scorer: ScorerState, api_key: Option<&str>) -> Router {
    app_with_timeout(pool, scorer, api_key, Duration::from_secs(5))
}

pub fn app_with_timeout(
    pool: SqlitePool,
    scorer: ScorerState,
    api_key: Option<&str>,
    request_timeout: Duration,
) -> Router {
    let state = AppState::new(pool, scorer, api_key.map(str::to_string));
    router(state, request_timeout)
}

pub async fn log_count(pool: &SqlitePool) -> i64 {
    count_prediction_logs(pool).await.unwrap()
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    api_key: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header(API_KEY_HEADER, key);
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    into_parts(app, request).await
}

/// Sends a raw body, optionally with a content type.
pub async fn send_raw(
    app: &Router,
    uri: &str,
    body: &str,
    content_type: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    into_parts(app, request).await
}

async fn into_parts(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}
