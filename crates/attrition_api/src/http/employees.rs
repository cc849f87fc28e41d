use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use super::{ApiError, ApiPath, ApiQuery, AppState, Pagination};
use crate::feature_store::{self, EmployeeRecord};

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<EmployeeRecord>>, ApiError> {
    let (skip, limit) = page.bounds();
    let employees = feature_store::list_employees(&state.pool, skip, limit).await?;
    Ok(Json(employees))
}

pub async fn count(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let total = feature_store::count_employees(&state.pool).await?;
    Ok(Json(json!({ "total": total })))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(employee_id): ApiPath<i64>,
) -> Result<Json<EmployeeRecord>, ApiError> {
    let employee = feature_store::get_employee(&state.pool, employee_id).await?;
    Ok(Json(employee))
}
