//! Employee attrition prediction service.
//!
//! Scores employees with a pre-trained classifier and keeps an auditable log
//! of every prediction, either for a stored employee or for an ad-hoc feature
//! mapping.

pub mod commands;
pub mod error;
pub mod feature_store;
pub mod http;
pub mod workflow;
