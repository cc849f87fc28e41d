use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use super::{ApiError, ApiJson, ApiPath, AppState};
use crate::workflow::{self, PredictionRecord};

/// Body of `POST /predict/new_employee`.
#[derive(Debug, Deserialize)]
pub struct NewEmployeeRequest {
    /// Checked to be a JSON object by the workflow.
    pub features: Value,
    #[serde(default)]
    pub model_version: Option<String>,
}

pub async fn from_employee(
    State(state): State<AppState>,
    ApiPath(employee_id): ApiPath<i64>,
) -> Result<Json<PredictionRecord>, ApiError> {
    let record = workflow::predict_from_employee(&state.pool, &state.scorer, employee_id).await?;
    Ok(Json(record))
}

pub async fn new_employee(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewEmployeeRequest>,
) -> Result<Json<PredictionRecord>, ApiError> {
    let record = workflow::predict_from_features(
        &state.pool,
        &state.scorer,
        request.features,
        request.model_version,
    )
    .await?;
    Ok(Json(record))
}

pub async fn log(
    State(state): State<AppState>,
    ApiPath(log_id): ApiPath<i64>,
) -> Result<Json<PredictionRecord>, ApiError> {
    let record = workflow::get_prediction_log(&state.pool, log_id).await?;
    Ok(Json(record))
}
