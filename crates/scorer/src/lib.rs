//! Scorer crate for employee attrition prediction.
//!
//! This crate owns the trained classifier: it loads a model bundle from disk,
//! runs inference with the Burn framework, and turns the positive-class
//! probability into a `Oui`/`Non` label with a confidence score.

use attrition_structs::{FeatureMap, Label};

mod bundle;
mod model;
mod state;

pub use bundle::{BundleError, ModelBundle};
pub use model::LogisticModel;
pub use state::ScorerState;

/// Threshold used when the model bundle does not carry one.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Result of scoring one feature mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    /// Probability of the predicted label, in `[0, 1]`.
    pub confidence: f64,
    /// Probability of the positive class (`Oui`), in `[0, 1]`.
    pub probability: f64,
}

/// Errors raised while scoring.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("scorer is not ready: {0}")]
    NotReady(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model produced a probability outside [0, 1]: {0}")]
    InvalidProbability(f64),
}

/// A loaded classifier that maps features to a label.
///
/// Implementations are immutable once constructed and shared across request
/// handlers without locking.
pub trait Scorer: Send + Sync {
    /// Identity recorded in prediction logs.
    fn model_version(&self) -> &str;

    /// Decision threshold applied to the positive-class probability.
    fn threshold(&self) -> f64;

    /// Probability of the positive class for `features`.
    ///
    /// Must not fail because expected features are missing or unknown
    /// features are present.
    fn probability(&self, features: &FeatureMap) -> Result<f64, ScoreError>;

    /// Scores `features` and applies the decision threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails or yields an invalid probability.
    fn score(&self, features: &FeatureMap) -> Result<Prediction, ScoreError> {
        let probability = self.probability(features)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoreError::InvalidProbability(probability));
        }
        Ok(decide(probability, self.threshold()))
    }
}

/// Applies `threshold` to a positive-class probability.
///
/// `Oui` when `probability >= threshold`; the confidence is the probability of
/// the chosen label.
#[must_use]
pub fn decide(probability: f64, threshold: f64) -> Prediction {
    let label = if probability >= threshold {
        Label::Oui
    } else {
        Label::Non
    };

    let confidence = match label {
        Label::Oui => probability,
        Label::Non => 1.0 - probability,
    };

    Prediction {
        label,
        confidence,
        probability,
    }
}
