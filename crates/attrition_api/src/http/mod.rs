//! HTTP surface of the service.

use core::time::Duration;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Router, middleware};
use scorer::ScorerState;
use sqlx::SqlitePool;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod employees;
mod error;
mod meta;
mod predict;
mod predictions;

pub use auth::API_KEY_HEADER;
pub use error::{ApiError, ApiJson, ApiPath, ApiQuery, Pagination};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub scorer: Arc<ScorerState>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: SqlitePool, scorer: ScorerState, api_key: Option<String>) -> Self {
        Self {
            pool,
            scorer: Arc::new(scorer),
            api_key: api_key.map(Arc::from),
        }
    }
}

/// Builds the application router.
///
/// Prediction routes sit behind the API key gate; every request is traced and
/// bounded by `request_timeout`.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let protected = Router::new()
        .route("/predict/from_id/{employee_id}", post(predict::from_employee))
        .route("/predict/new_employee", post(predict::new_employee))
        .route("/predict/log/{log_id}", get(predict::log))
        .route("/predictions/logs", get(predictions::list))
        .route("/predictions/count", get(predictions::count))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/", get(meta::root))
        .route("/health", get(meta::health))
        .route("/stats", get(meta::stats))
        .route("/employees", get(employees::list))
        .route("/employees/count", get(employees::count))
        .route("/employees/{employee_id}", get(employees::get))
        .merge(protected)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
