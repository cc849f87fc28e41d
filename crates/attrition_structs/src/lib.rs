//! Common structs for employee records and prediction logs shared across crates.

mod employee;
mod label;
mod prediction;
mod stats;

pub use employee::*;
pub use label::*;
pub use prediction::*;
pub use stats::*;

/// A named set of input values describing one subject to classify.
///
/// Keys keep their insertion order so a mapping survives a JSON round-trip
/// unchanged. Values may be strings, numbers, booleans, null, arrays or
/// nested objects.
pub type FeatureMap = serde_json::Map<String, serde_json::Value>;

/// Decodes a JSON-encoded feature mapping as stored in the database.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON or is not a JSON object.
pub fn decode_features(text: &str) -> Result<FeatureMap, serde_json::Error> {
    serde_json::from_str(text)
}

/// Encodes a feature mapping for storage.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_features(features: &FeatureMap) -> Result<String, serde_json::Error> {
    serde_json::to_string(features)
}
