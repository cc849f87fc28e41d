use chrono::{DateTime, Utc};

use crate::FeatureMap;

/// Employee record stored in the feature store.
///
/// `features` holds the JSON text exactly as imported; callers decode it with
/// [`crate::decode_features`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub identifier: String,
    pub features: String,
    pub target: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for importing a new employee record.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub identifier: String,
    pub features: FeatureMap,
    pub target: Option<String>,
}
