mod common;

use core::time::Duration;

use axum::http::StatusCode;
use common::{
    app, app_with_timeout, file_pool, log_count, ready_scorer, seed_employee, send, send_raw,
    test_pool,
};
use scorer::ScorerState;
use serde_json::json;

#[tokio::test]
async fn test_predict_from_existing_employee() {
    let pool = test_pool().await;
    seed_employee(&pool, "RECORD_0", json!({"age": 30}), Some("Non")).await;
    let app = app(pool.clone(), ready_scorer(), None);

    let (status, body) = send(&app, "POST", "/predict/from_id/1", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee_id"], json!(1));
    assert!(matches!(body["prediction"].as_str(), Some("Oui" | "Non")));
    let confidence = body["confidence_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert_eq!(body["model_version"], json!("logreg-test-1"));
    assert_eq!(body["features"], json!({"age": 30}));
    assert!(body["log_id"].is_i64());
    assert!(body["timestamp"].is_string());
    assert_eq!(log_count(&pool).await, 1);
}

#[tokio::test]
async fn test_predict_from_unknown_employee() {
    let pool = test_pool().await;
    let app = app(pool.clone(), ready_scorer(), None);

    let (status, body) = send(&app, "POST", "/predict/from_id/99999", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());
    assert_eq!(log_count(&pool).await, 0);
}

#[tokio::test]
async fn test_predict_from_corrupt_employee() {
    let pool = test_pool().await;
    sqlx::query("INSERT INTO employees (identifier, features, created_at) VALUES (?, ?, ?)")
        .bind("BROKEN")
        .bind("not json at all")
        .bind(chrono::Utc::now())
        .execute(&pool)
        .await
        .unwrap();
    let app = app(pool.clone(), ready_scorer(), None);

    let (status, body) = send(&app, "POST", "/predict/from_id/1", None, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], json!("Internal server error"));
    assert_eq!(log_count(&pool).await, 0);
}

#[tokio::test]
async fn test_new_employee_rejects_non_object_features() {
    let pool = test_pool().await;
    let app = app(pool.clone(), ready_scorer(), None);

    let (status, body) = send(
        &app,
        "POST",
        "/predict/new_employee",
        Some(json!({"features": "not-an-object"})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
    assert_eq!(log_count(&pool).await, 0);
}

#[tokio::test]
async fn test_new_employee_requires_features_field() {
    let pool = test_pool().await;
    let app = app(pool.clone(), ready_scorer(), None);

    let (status, body) = send(
        &app,
        "POST",
        "/predict/new_employee",
        Some(json!({"model_version": "v1.0"})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
    assert_eq!(log_count(&pool).await, 0);
}

#[tokio::test]
async fn test_new_employee_preserves_utf8_features() {
    let pool = test_pool().await;
    let app = app(pool.clone(), ready_scorer(), None);

    let (status, body) = send(
        &app,
        "POST",
        "/predict/new_employee",
        Some(json!({"features": {"age": 35, "ville": "Sélestat"}})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee_id"], json!(null));
    assert_eq!(body["model_version"], json!("v1.0"));
    assert_eq!(log_count(&pool).await, 1);

    let log_id = body["log_id"].as_i64().unwrap();
    let (status, log) = send(&app, "GET", &format!("/predict/log/{log_id}"), None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(log["features"]["ville"], json!("Sélestat"));
    assert_eq!(log["features"], json!({"age": 35, "ville": "Sélestat"}));
    assert_eq!(log["prediction"], body["prediction"]);
    assert_eq!(log_count(&pool).await, 1);
}

#[tokio::test]
async fn test_new_employee_round_trips_nested_and_null_values() {
    let pool = test_pool().await;
    let app = app(pool, ready_scorer(), None);
    let features = json!({
        "age": 29,
        "poste": "Consultant",
        "manager": null,
        "evaluations": {"2023": 3, "2024": {"note": 4, "commentaire": "très bien"}},
        "formations": ["Excel", "Gestion de projet"],
    });

    let (status, body) = send(
        &app,
        "POST",
        "/predict/new_employee",
        Some(json!({"features": features, "model_version": "v2.0"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_version"], json!("v2.0"));

    let uri = format!("/predict/log/{}", body["log_id"]);
    let (_, first) = send(&app, "GET", &uri, None, None).await;
    let (_, second) = send(&app, "GET", &uri, None, None).await;

    assert_eq!(first["features"], features);
    assert_eq!(
        serde_json::to_string(&first["features"]).unwrap(),
        serde_json::to_string(&second["features"]).unwrap()
    );
}

#[tokio::test]
async fn test_new_employee_with_empty_features() {
    let pool = test_pool().await;
    let app = app(pool.clone(), ready_scorer(), None);

    let (status, body) = send(
        &app,
        "POST",
        "/predict/new_employee",
        Some(json!({"features": {}})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Every input imputes to zero: p = sigmoid(-0.6) ~ 0.354 < 0.42.
    assert_eq!(body["prediction"], json!("Non"));
    let confidence = body["confidence_score"].as_f64().unwrap();
    assert!((confidence - (1.0 - 1.0 / (1.0 + 0.6_f64.exp()))).abs() < 1e-5);
    assert_eq!(log_count(&pool).await, 1);
}

#[tokio::test]
async fn test_prediction_unavailable_without_model() {
    let pool = test_pool().await;
    seed_employee(&pool, "RECORD_0", json!({"age": 30}), None).await;
    let app = app(pool.clone(), ScorerState::Failed("bundle missing".to_string()), None);

    let (status, body) = send(&app, "POST", "/predict/from_id/1", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/predict/new_employee",
        Some(json!({"features": {"age": 30}})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(log_count(&pool).await, 0);
}

#[tokio::test]
async fn test_unknown_prediction_log() {
    let pool = test_pool().await;
    let app = app(pool, ready_scorer(), None);

    let (status, body) = send(&app, "GET", "/predict/log/99999", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_api_key_gate() {
    let pool = test_pool().await;
    seed_employee(&pool, "RECORD_0", json!({"age": 30}), None).await;
    let app = app(pool.clone(), ready_scorer(), Some(common::TEST_API_KEY));

    let (status, body) = send(&app, "POST", "/predict/from_id/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].is_string());

    let (status, _) = send(&app, "POST", "/predict/from_id/1", None, Some("wrong-key")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(log_count(&pool).await, 0);

    let (status, _) = send(
        &app,
        "POST",
        "/predict/from_id/1",
        None,
        Some(common::TEST_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log_count(&pool).await, 1);

    // Read-only employee routes stay open.
    let (status, _) = send(&app, "GET", "/employees", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let pool = test_pool().await;
    let app = app(pool.clone(), ready_scorer(), None);

    let (status, body) = send_raw(
        &app,
        "/predict/new_employee",
        r#"{"features":"#,
        Some("application/json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
    assert_eq!(log_count(&pool).await, 0);
}

#[tokio::test]
async fn test_body_without_content_type() {
    let pool = test_pool().await;
    let app = app(pool.clone(), ready_scorer(), None);

    let (status, body) = send_raw(
        &app,
        "/predict/new_employee",
        r#"{"features": {"age": 35}}"#,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["detail"].is_string());
    assert_eq!(log_count(&pool).await, 0);
}

#[tokio::test]
async fn test_request_times_out_while_database_is_locked() {
    let dir = tempfile::tempdir().unwrap();
    let pool = file_pool(dir.path()).await;

    // An open write transaction on another connection holds the database lock.
    let mut writer = pool.begin().await.unwrap();
    sqlx::query("INSERT INTO employees (identifier, features, created_at) VALUES (?, ?, ?)")
        .bind("LOCK_HOLDER")
        .bind("{}")
        .bind(chrono::Utc::now())
        .execute(&mut *writer)
        .await
        .unwrap();

    let app = app_with_timeout(
        pool.clone(),
        ready_scorer(),
        None,
        Duration::from_millis(200),
    );
    let (status, _) = send(
        &app,
        "POST",
        "/predict/new_employee",
        Some(json!({"features": {"age": 35}})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    writer.rollback().await.unwrap();
}
