//! Logistic classifier evaluated with Burn on the CPU.

use std::path::Path;

use attrition_structs::FeatureMap;
use burn::backend::NdArray;
use burn::backend::ndarray::NdArrayDevice;
use burn::tensor::activation::sigmoid;
use burn::tensor::{Tensor, TensorData};
use feature_encoder::{FeatureSpec, encode};

use crate::{BundleError, ModelBundle, ScoreError, Scorer};

type InferenceBackend = NdArray;

/// Logistic regression over encoded features: `p = sigmoid(x · w + b)`.
///
/// Parameters are kept as plain vectors so the model is `Sync`; tensors are
/// built for each call.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    model_version: String,
    threshold: f64,
    features: Vec<FeatureSpec>,
    weights: Vec<f32>,
    bias: f32,
    device: NdArrayDevice,
}

impl LogisticModel {
    /// Builds a model from a bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle is inconsistent.
    pub fn from_bundle(bundle: ModelBundle) -> Result<Self, BundleError> {
        bundle.validate()?;
        let threshold = bundle.threshold();

        Ok(Self {
            model_version: bundle.model_version,
            threshold,
            features: bundle.features,
            weights: bundle.weights,
            bias: bundle.bias,
            device: NdArrayDevice::default(),
        })
    }

    /// Loads a model from a bundle file.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, BundleError> {
        Self::from_bundle(ModelBundle::from_path(path)?)
    }

    /// Ordered names of the features the model expects.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|spec| spec.name.as_str())
    }

    fn forward(&self, encoded: Vec<f32>) -> Result<f32, ScoreError> {
        let width = encoded.len();

        let input = Tensor::<InferenceBackend, 2>::from_data(
            TensorData::new(encoded, [1, width]),
            &self.device,
        );
        let weights = Tensor::<InferenceBackend, 2>::from_data(
            TensorData::new(self.weights.clone(), [width, 1]),
            &self.device,
        );

        let output = sigmoid(input.matmul(weights).add_scalar(self.bias));

        let values = output
            .into_data()
            .to_vec::<f32>()
            .map_err(|err| ScoreError::Inference(format!("{err:?}")))?;

        values
            .first()
            .copied()
            .ok_or_else(|| ScoreError::Inference("model returned no output".to_string()))
    }
}

impl Scorer for LogisticModel {
    fn model_version(&self) -> &str {
        &self.model_version
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn probability(&self, features: &FeatureMap) -> Result<f64, ScoreError> {
        let encoded = encode(features, &self.features);
        self.forward(encoded).map(f64::from)
    }
}
