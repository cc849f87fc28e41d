use attrition_structs::Stats;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::warn;

use super::{ApiError, AppState};
use crate::feature_store;

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Employee attrition prediction API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "stats": "/stats",
            "employees": "/employees",
            "predict_from_id": "/predict/from_id/{employee_id}",
            "predict_new_employee": "/predict/new_employee",
            "prediction_log": "/predict/log/{log_id}",
            "prediction_logs": "/predictions/logs",
        },
    }))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database_ok = match database::ping(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "Database health check failed");
            false
        }
    };

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_ok { "healthy" } else { "unhealthy" },
            "database": if database_ok { "ok" } else { "unavailable" },
            "scorer": state.scorer.status(),
        })),
    )
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    let stats = feature_store::stats(&state.pool).await?;
    Ok(Json(stats))
}
