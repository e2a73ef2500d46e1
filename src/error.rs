//! Error types for Sleep Triage

use thiserror::Error;

use crate::types::Feature;

/// Errors that can occur during classification
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Missing required feature: {0}")]
    MissingFeature(Feature),

    #[error("Invalid value for {feature}: {value}")]
    InvalidFeature { feature: Feature, value: f64 },

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
