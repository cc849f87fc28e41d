//! Score command - runs the model on one feature mapping without logging it.

use std::path::Path;

use anyhow::{Context, Result};
use attrition_structs::FeatureMap;
use scorer::{LogisticModel, Scorer};
use serde_json::json;
use tracing::info;

/// Runs the score command and prints the prediction as JSON.
///
/// # Errors
///
/// Returns an error if the model cannot be loaded, the features are not a JSON
/// object, or scoring fails.
pub fn run(model_path: &Path, features_json: &str) -> Result<()> {
    let model = LogisticModel::load(model_path)
        .with_context(|| format!("Failed to load model bundle {}", model_path.display()))?;

    let features: FeatureMap =
        serde_json::from_str(features_json).context("Features must be a JSON object")?;

    let prediction = model.score(&features).context("Scoring failed")?;

    info!(
        model_version = model.model_version(),
        prediction = %prediction.label,
        confidence = prediction.confidence,
        probability = prediction.probability,
        "Scored features"
    );

    let output = json!({
        "prediction": prediction.label,
        "confidence_score": prediction.confidence,
        "probability": prediction.probability,
        "threshold": model.threshold(),
        "model_version": model.model_version(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
