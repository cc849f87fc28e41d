//! CLI command implementations.

pub mod import;
pub mod score;
pub mod serve;
