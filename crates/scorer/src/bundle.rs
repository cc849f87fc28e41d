//! Model bundle: the artifact produced by the training pipeline.

use std::path::{Path, PathBuf};

use feature_encoder::{FeatureSpec, encoded_width};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_THRESHOLD;

/// Errors raised while loading or validating a model bundle.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to read model bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model bundle: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model bundle declares no features")]
    NoFeatures,

    #[error("model bundle has {actual} weights but its features encode to {expected} inputs")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("decision threshold {0} is outside [0, 1]")]
    ThresholdOutOfRange(f64),

    #[error("model bundle contains non-finite parameters")]
    NonFiniteParameter,
}

/// Serialized classifier with its feature list and decision threshold.
///
/// ```json
/// {
///   "model_version": "logreg-2025-06",
///   "threshold": 0.42,
///   "features": [{"name": "age", "kind": "numeric", "mean": 36.9, "scale": 9.1}],
///   "weights": [-0.31],
///   "bias": -1.2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Identity recorded with every prediction made by this model.
    pub model_version: String,
    /// Decision threshold. Falls back to [`DEFAULT_THRESHOLD`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Input features in training order.
    pub features: Vec<FeatureSpec>,
    /// One weight per encoded input.
    pub weights: Vec<f32>,
    #[serde(default)]
    pub bias: f32,
}

impl ModelBundle {
    /// Reads and validates a bundle from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_path(path: &Path) -> Result<Self, BundleError> {
        let text = std::fs::read_to_string(path).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses and validates a bundle from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or the bundle is invalid.
    pub fn from_json_str(text: &str) -> Result<Self, BundleError> {
        let bundle: Self = serde_json::from_str(text)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Checks the bundle is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found.
    pub fn validate(&self) -> Result<(), BundleError> {
        if self.features.is_empty() {
            return Err(BundleError::NoFeatures);
        }

        let expected = encoded_width(&self.features);
        if expected != self.weights.len() {
            return Err(BundleError::WidthMismatch {
                expected,
                actual: self.weights.len(),
            });
        }

        let threshold = self.threshold();
        if !(0.0..=1.0).contains(&threshold) {
            return Err(BundleError::ThresholdOutOfRange(threshold));
        }

        if !self.bias.is_finite()
            || self.weights.iter().any(|w| !w.is_finite())
            || self.features.iter().any(|spec| !spec.kind.has_finite_parameters())
        {
            return Err(BundleError::NonFiniteParameter);
        }

        Ok(())
    }

    /// Decision threshold, preferring the value shipped with the model.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    /// Ordered names of the features the model expects.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|spec| spec.name.as_str())
    }
}
