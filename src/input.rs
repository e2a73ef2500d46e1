//! Input parsing and validation
//!
//! Callers collect raw values (CLI flags, JSON requests, FFI strings) and
//! turn them into a [`FeatureSet`] here before handing it to the tree.
//! - Numeric text is parsed strictly
//! - Negative and non-finite values are rejected
//! - Unknown keys are rejected; missing keys are left for the tree to report

use serde_json::Value;

use crate::error::ComputeError;
use crate::types::{Feature, FeatureSet};

/// Parse a single feature value from text
pub fn parse_feature_value(feature: Feature, text: &str) -> Result<f64, ComputeError> {
    text.trim()
        .parse::<f64>()
        .map_err(|e| ComputeError::ParseError(format!("{feature}: '{}' ({e})", text.trim())))
}

/// Check that every present value is finite and non-negative
pub fn validate(features: &FeatureSet) -> Result<(), ComputeError> {
    for (feature, value) in features.iter() {
        if !value.is_finite() || value < 0.0 {
            return Err(ComputeError::InvalidFeature { feature, value });
        }
    }
    Ok(())
}

/// Parse a JSON object keyed by feature name into a feature set.
///
/// Values may be JSON numbers or numeric strings.
pub fn parse_request(json: &str) -> Result<FeatureSet, ComputeError> {
    let value: Value = serde_json::from_str(json)?;
    features_from_value(&value)
}

/// Convert an already-parsed JSON value into a feature set
pub fn features_from_value(value: &Value) -> Result<FeatureSet, ComputeError> {
    let object = value
        .as_object()
        .ok_or_else(|| ComputeError::ParseError("request must be a JSON object".to_string()))?;

    let mut features = FeatureSet::new();
    for (key, raw) in object {
        let feature: Feature = key.parse()?;
        let number = match raw {
            Value::Number(n) => n.as_f64().ok_or_else(|| {
                ComputeError::ParseError(format!("{feature}: {n} is not representable"))
            })?,
            Value::String(s) => parse_feature_value(feature, s)?,
            other => {
                return Err(ComputeError::ParseError(format!(
                    "{feature}: expected a number, got {other}"
                )))
            }
        };
        features.insert(feature, number);
    }

    Ok(features)
}
