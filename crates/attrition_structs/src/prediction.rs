use chrono::{DateTime, Utc};

use crate::{FeatureMap, Label, encode_features};

/// Prediction log row. Append-only: never updated or deleted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PredictionLog {
    pub id: i64,
    pub employee_id: Option<i64>,
    pub input_features: String,
    pub prediction_result: Label,
    pub confidence_score: Option<f64>,
    pub model_version: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a prediction log row.
///
/// Can only be built from a decoded [`FeatureMap`], so a log without input
/// features cannot reach the database.
#[derive(Debug, Clone)]
pub struct NewPredictionLog {
    employee_id: Option<i64>,
    input_features: String,
    prediction_result: Label,
    confidence_score: f64,
    model_version: String,
}

impl NewPredictionLog {
    /// Creates a log entry for one scoring request.
    ///
    /// # Errors
    ///
    /// Returns an error if the features cannot be serialized.
    pub fn new(
        employee_id: Option<i64>,
        features: &FeatureMap,
        prediction_result: Label,
        confidence_score: f64,
        model_version: impl Into<String>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            employee_id,
            input_features: encode_features(features)?,
            prediction_result,
            confidence_score,
            model_version: model_version.into(),
        })
    }

    #[must_use]
    pub const fn employee_id(&self) -> Option<i64> {
        self.employee_id
    }

    #[must_use]
    pub fn input_features(&self) -> &str {
        &self.input_features
    }

    #[must_use]
    pub const fn prediction_result(&self) -> Label {
        self.prediction_result
    }

    #[must_use]
    pub const fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.model_version
    }
}
