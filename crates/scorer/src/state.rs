//! Process-wide scorer lifecycle.

use std::path::Path;
use std::sync::Arc;

use attrition_structs::FeatureMap;
use tracing::{error, info};

use crate::{LogisticModel, Prediction, ScoreError, Scorer};

/// Lifecycle of the scorer, fixed once the process has started.
///
/// A failed load does not stop the service; every scoring request then fails
/// with [`ScoreError::NotReady`] instead of guessing a label.
#[derive(Clone, Default)]
pub enum ScorerState {
    #[default]
    Uninitialized,
    Ready(Arc<dyn Scorer>),
    Failed(String),
}

impl ScorerState {
    /// Loads the model bundle at `path`.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        info!(path = %path.display(), "Loading model bundle");

        match LogisticModel::load(path) {
            Ok(model) => {
                info!(
                    model_version = model.model_version(),
                    features = model.feature_names().count(),
                    threshold = model.threshold(),
                    "Model loaded"
                );
                Self::Ready(Arc::new(model))
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "Failed to load model bundle");
                Self::Failed(err.to_string())
            }
        }
    }

    /// Wraps an already constructed scorer.
    #[must_use]
    pub fn ready(scorer: impl Scorer + 'static) -> Self {
        Self::Ready(Arc::new(scorer))
    }

    /// Returns the scorer if it is ready.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::NotReady`] if the scorer never loaded.
    pub fn scorer(&self) -> Result<&dyn Scorer, ScoreError> {
        match self {
            Self::Ready(scorer) => Ok(scorer.as_ref()),
            Self::Uninitialized => Err(ScoreError::NotReady("model not loaded".to_string())),
            Self::Failed(reason) => Err(ScoreError::NotReady(reason.clone())),
        }
    }

    /// Scores `features` with the loaded model.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::NotReady`] if the scorer is not ready, or the
    /// scorer's own error.
    pub fn score(&self, features: &FeatureMap) -> Result<Prediction, ScoreError> {
        self.scorer()?.score(features)
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Short status string for health reports.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

impl core::fmt::Debug for ScorerState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("Uninitialized"),
            Self::Ready(scorer) => f
                .debug_tuple("Ready")
                .field(&scorer.model_version())
                .finish(),
            Self::Failed(reason) => f.debug_tuple("Failed").field(reason).finish(),
        }
    }
}
