//! Repository functions for the append-only prediction log.

use attrition_structs::{NewPredictionLog, PredictionLog};
use chrono::Utc;
use sqlx::SqliteExecutor;

/// Inserts a prediction log row and returns it as stored.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn insert_prediction_log<'e, E>(
    executor: E,
    log: &NewPredictionLog,
) -> Result<PredictionLog, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, PredictionLog>(
        r"
        INSERT INTO prediction_logs
            (employee_id, input_features, prediction_result, confidence_score, model_version, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, employee_id, input_features, prediction_result, confidence_score, model_version, created_at
        ",
    )
    .bind(log.employee_id())
    .bind(log.input_features())
    .bind(log.prediction_result())
    .bind(log.confidence_score())
    .bind(log.model_version())
    .bind(Utc::now())
    .fetch_one(executor)
    .await
}

/// Finds a prediction log row by its ID.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn find_prediction_log_by_id<'e, E>(
    executor: E,
    id: i64,
) -> Result<Option<PredictionLog>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, PredictionLog>(
        r"
        SELECT id, employee_id, input_features, prediction_result, confidence_score, model_version, created_at
        FROM prediction_logs
        WHERE id = ?
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Lists prediction log rows ordered by ID.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list_prediction_logs<'e, E>(
    executor: E,
    skip: i64,
    limit: i64,
) -> Result<Vec<PredictionLog>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, PredictionLog>(
        r"
        SELECT id, employee_id, input_features, prediction_result, confidence_score, model_version, created_at
        FROM prediction_logs
        ORDER BY id
        LIMIT ? OFFSET ?
        ",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(executor)
    .await
}

/// Counts all prediction log rows.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn count_prediction_logs<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM prediction_logs")
        .fetch_one(executor)
        .await
}
