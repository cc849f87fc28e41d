//! Feature encoder crate for the attrition classifier.
//!
//! This crate reindexes a free-form feature mapping onto the fixed, ordered
//! feature list a model was trained on, and turns it into a numeric vector
//! that can be fed to the model.
//!
//! Reindexing never fails: expected features absent from the input become
//! missing values and input fields the model does not know are dropped.

use attrition_structs::FeatureMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One input column of a model, in training order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Key looked up in the incoming feature mapping.
    pub name: String,
    /// How the value is turned into model inputs.
    #[serde(flatten)]
    pub kind: FeatureKind,
}

/// Encoding applied to a single feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureKind {
    /// Standardized number: `(value - mean) / scale`.
    ///
    /// Missing or non-numeric values are replaced by `impute` before scaling.
    Numeric {
        #[serde(default)]
        impute: f32,
        #[serde(default)]
        mean: f32,
        #[serde(default = "unit_scale")]
        scale: f32,
    },
    /// Yes/no flag encoded as `1.0`/`0.0`, `impute` when unknown.
    Boolean {
        #[serde(default)]
        impute: f32,
    },
    /// One-hot encoding over known levels. Unknown or missing values encode as
    /// all zeros.
    Categorical { levels: Vec<String> },
}

const fn unit_scale() -> f32 {
    1.0
}

impl FeatureKind {
    /// Number of model inputs produced by this feature.
    #[must_use]
    pub fn width(&self) -> usize {
        match self {
            Self::Numeric { .. } | Self::Boolean { .. } => 1,
            Self::Categorical { levels } => levels.len(),
        }
    }
}

impl FeatureKind {
    /// Whether every encoding parameter is a finite number.
    #[must_use]
    pub fn has_finite_parameters(&self) -> bool {
        match self {
            Self::Numeric {
                impute,
                mean,
                scale,
            } => impute.is_finite() && mean.is_finite() && scale.is_finite(),
            Self::Boolean { impute } => impute.is_finite(),
            Self::Categorical { .. } => true,
        }
    }
}

impl FeatureSpec {
    /// Creates a numeric feature with no imputation or scaling.
    #[must_use]
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Numeric {
                impute: 0.0,
                mean: 0.0,
                scale: 1.0,
            },
        }
    }

    /// Creates a one-hot categorical feature.
    #[must_use]
    pub fn categorical<I, S>(name: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: FeatureKind::Categorical {
                levels: levels.into_iter().map(Into::into).collect(),
            },
        }
    }
}

/// Total number of model inputs produced by `specs`.
#[must_use]
pub fn encoded_width(specs: &[FeatureSpec]) -> usize {
    specs.iter().map(|spec| spec.kind.width()).sum()
}

/// Reindexes `features` onto the ordered `names`.
///
/// Returns one entry per name, `None` where the input has no such key.
/// Keys of `features` that are not in `names` are ignored.
pub fn reindex<'a, 'n>(
    features: &'a FeatureMap,
    names: impl IntoIterator<Item = &'n str>,
) -> Vec<Option<&'a Value>> {
    names.into_iter().map(|name| features.get(name)).collect()
}

/// Encodes `features` into the model input vector described by `specs`.
///
/// The output always has [`encoded_width`] entries.
#[must_use]
pub fn encode(features: &FeatureMap, specs: &[FeatureSpec]) -> Vec<f32> {
    let mut encoded = Vec::with_capacity(encoded_width(specs));
    let values = reindex(features, specs.iter().map(|spec| spec.name.as_str()));

    for (spec, value) in specs.iter().zip(values) {
        match &spec.kind {
            FeatureKind::Numeric {
                impute,
                mean,
                scale,
            } => {
                let standardized = value
                    .and_then(numeric_value)
                    .map(|raw| standardize(raw, *mean, *scale))
                    .filter(|z| z.is_finite())
                    .unwrap_or_else(|| standardize(*impute, *mean, *scale));
                encoded.push(standardized);
            }
            FeatureKind::Boolean { impute } => {
                encoded.push(value.and_then(boolean_value).unwrap_or(*impute));
            }
            FeatureKind::Categorical { levels } => {
                let key = value.and_then(categorical_key);
                encoded.extend(levels.iter().map(|level| {
                    if key.as_deref() == Some(level.as_str()) {
                        1.0
                    } else {
                        0.0
                    }
                }));
            }
        }
    }

    encoded
}

fn standardize(value: f32, mean: f32, scale: f32) -> f32 {
    // A zero scale comes from a constant training column.
    let scale = if scale == 0.0 { 1.0 } else { scale };
    (value - mean) / scale
}

/// Interprets a JSON value as a number. Numeric strings are accepted.
#[allow(clippy::cast_possible_truncation)]
fn numeric_value(value: &Value) -> Option<f32> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }?;

    let number = number as f32;
    number.is_finite().then_some(number)
}

fn boolean_value(value: &Value) -> Option<f32> {
    match value {
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64().map(|n| if n == 0.0 { 0.0 } else { 1.0 }),
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "oui" | "yes" | "true" | "y" | "1" => Some(1.0),
            "non" | "no" | "false" | "n" | "0" => Some(0.0),
            _ => None,
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn categorical_key(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
