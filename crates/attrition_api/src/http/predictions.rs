use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use super::{ApiError, ApiQuery, AppState, Pagination};
use crate::workflow::{self, PredictionRecord};

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<PredictionRecord>>, ApiError> {
    let (skip, limit) = page.bounds();
    let records = workflow::list_predictions(&state.pool, skip, limit).await?;
    Ok(Json(records))
}

pub async fn count(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let total = workflow::count_predictions(&state.pool).await?;
    Ok(Json(json!({ "total": total })))
}
