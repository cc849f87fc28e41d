//! Prediction workflow: lookup, scoring and durable logging.
//!
//! Lookups and scoring happen before any write. The log row is the only write
//! of a prediction and goes through a transaction opened right before it, so
//! any earlier failure leaves no trace in the prediction log and concurrent
//! predictions never hold a read lock they later need to upgrade.

use attrition_structs::{FeatureMap, Label, NewPredictionLog, PredictionLog, decode_features};
use chrono::{DateTime, Utc};
use database::{
    count_prediction_logs, find_employee_by_id, find_prediction_log_by_id, insert_prediction_log,
    list_prediction_logs,
};
use scorer::ScorerState;
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::WorkflowError;

/// Model version recorded for ad-hoc predictions when the caller gives none.
pub const DEFAULT_MODEL_VERSION: &str = "v1.0";

/// A logged prediction with its input features decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub log_id: i64,
    pub employee_id: Option<i64>,
    pub features: FeatureMap,
    pub prediction: Label,
    pub confidence_score: Option<f64>,
    pub model_version: String,
    pub timestamp: DateTime<Utc>,
}

impl PredictionRecord {
    fn from_log(log: PredictionLog, features: FeatureMap) -> Self {
        Self {
            log_id: log.id,
            employee_id: log.employee_id,
            features,
            prediction: log.prediction_result,
            confidence_score: log.confidence_score,
            model_version: log.model_version,
            timestamp: log.created_at,
        }
    }

    fn decode(log: PredictionLog) -> Result<Self, WorkflowError> {
        let features =
            decode_features(&log.input_features).map_err(|source| WorkflowError::CorruptFeatures {
                record: "prediction log",
                id: log.id,
                source,
            })?;
        Ok(Self::from_log(log, features))
    }
}

/// Scores a stored employee and logs the prediction against it.
///
/// # Errors
///
/// - [`WorkflowError::NotReady`] if the scorer is not loaded.
/// - [`WorkflowError::EmployeeNotFound`] if no employee has this ID.
/// - [`WorkflowError::CorruptFeatures`] if the stored features do not decode.
/// - Internal errors from scoring or persistence.
pub async fn predict_from_employee(
    pool: &SqlitePool,
    scorer: &ScorerState,
    employee_id: i64,
) -> Result<PredictionRecord, WorkflowError> {
    let scorer = scorer.scorer()?;

    let employee = find_employee_by_id(pool, employee_id)
        .await?
        .ok_or(WorkflowError::EmployeeNotFound(employee_id))?;

    let features =
        decode_features(&employee.features).map_err(|source| WorkflowError::CorruptFeatures {
            record: "employee",
            id: employee.id,
            source,
        })?;

    let prediction = scorer.score(&features)?;
    let new_log = NewPredictionLog::new(
        Some(employee.id),
        &features,
        prediction.label,
        prediction.confidence,
        scorer.model_version(),
    )?;

    let mut tx = pool.begin().await?;
    let log = insert_prediction_log(&mut *tx, &new_log).await?;
    tx.commit().await?;

    info!(
        log_id = log.id,
        employee_id,
        prediction = %log.prediction_result,
        confidence = prediction.confidence,
        "Prediction logged for stored employee"
    );

    Ok(PredictionRecord::from_log(log, features))
}

/// Scores an ad-hoc feature mapping and logs the prediction without an
/// employee reference.
///
/// `features` must be a JSON object; its content is not validated, so an empty
/// object is scored like any other.
///
/// # Errors
///
/// - [`WorkflowError::NotReady`] if the scorer is not loaded.
/// - [`WorkflowError::BadRequest`] if `features` is not a JSON object.
/// - Internal errors from scoring or persistence.
pub async fn predict_from_features(
    pool: &SqlitePool,
    scorer: &ScorerState,
    features: Value,
    model_version: Option<String>,
) -> Result<PredictionRecord, WorkflowError> {
    let scorer = scorer.scorer()?;

    let features = match features {
        Value::Object(map) => map,
        other => {
            return Err(WorkflowError::BadRequest(format!(
                "features must be a JSON object, got {}",
                json_type_name(&other)
            )));
        }
    };

    let model_version = model_version
        .filter(|version| !version.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string());

    let prediction = scorer.score(&features)?;
    let new_log = NewPredictionLog::new(
        None,
        &features,
        prediction.label,
        prediction.confidence,
        model_version,
    )?;

    let mut tx = pool.begin().await?;
    let log = insert_prediction_log(&mut *tx, &new_log).await?;
    tx.commit().await?;

    info!(
        log_id = log.id,
        prediction = %log.prediction_result,
        confidence = prediction.confidence,
        "Prediction logged for new employee"
    );

    Ok(PredictionRecord::from_log(log, features))
}

/// Fetches a logged prediction with its stored features decoded verbatim.
///
/// # Errors
///
/// - [`WorkflowError::PredictionLogNotFound`] if no log has this ID.
/// - [`WorkflowError::CorruptFeatures`] if the stored features do not decode.
pub async fn get_prediction_log(
    pool: &SqlitePool,
    log_id: i64,
) -> Result<PredictionRecord, WorkflowError> {
    let log = find_prediction_log_by_id(pool, log_id)
        .await?
        .ok_or(WorkflowError::PredictionLogNotFound(log_id))?;

    debug!(log_id, "Prediction log fetched");
    PredictionRecord::decode(log)
}

/// Lists logged predictions ordered by ID.
///
/// Rows whose stored features do not decode are logged and left out of the
/// page; fetch them individually to get the error.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_predictions(
    pool: &SqlitePool,
    skip: i64,
    limit: i64,
) -> Result<Vec<PredictionRecord>, WorkflowError> {
    let records = list_prediction_logs(pool, skip, limit)
        .await?
        .into_iter()
        .filter_map(|log| match PredictionRecord::decode(log) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "Skipping prediction log with malformed features");
                None
            }
        })
        .collect();

    Ok(records)
}

/// Counts logged predictions.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn count_predictions(pool: &SqlitePool) -> Result<i64, WorkflowError> {
    Ok(count_prediction_logs(pool).await?)
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
