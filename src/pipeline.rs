//! Pipeline orchestration
//!
//! This module provides the public API for Sleep Triage.
//! It takes a raw feature request through parsing, validation, tree
//! evaluation and report encoding.

use crate::encoder::AssessmentEncoder;
use crate::error::ComputeError;
use crate::input;
use crate::tree::DecisionTree;
use crate::types::{Assessment, DecisionStep, FeatureSet, Label};

/// Classify a JSON feature request and return an assessment JSON payload.
///
/// # Arguments
/// * `request_json` - JSON object keyed by feature name, e.g.
///   `{"sleep_duration": 6.0, "heart_rate": 70, "daily_steps": 4000, "bmi": 22}`
///
/// # Example
/// ```ignore
/// let assessment_json = classify_json(request_json)?;
/// ```
pub fn classify_json(request_json: String) -> Result<String, ComputeError> {
    SleepClassifier::new().assess_json(&request_json)
}

/// Classifier holding the decision tree and a report encoder.
///
/// Reuse one instance to keep a stable producer instance ID across calls.
pub struct SleepClassifier {
    tree: DecisionTree,
    encoder: AssessmentEncoder,
}

impl Default for SleepClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SleepClassifier {
    pub fn new() -> Self {
        Self {
            tree: DecisionTree::new(),
            encoder: AssessmentEncoder::new(),
        }
    }

    /// Create a classifier with a specific producer instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self {
            tree: DecisionTree::new(),
            encoder: AssessmentEncoder::with_instance_id(instance_id),
        }
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn instance_id(&self) -> &str {
        self.encoder.instance_id()
    }

    /// Label only; no validation beyond required keys
    pub fn predict(&self, features: &FeatureSet) -> Result<Label, ComputeError> {
        self.tree.predict(features)
    }

    pub fn decision_path(&self, features: &FeatureSet) -> Result<Vec<DecisionStep>, ComputeError> {
        self.tree.decision_path(features)
    }

    /// Validate and classify, producing the full report
    pub fn assess(&self, features: &FeatureSet) -> Result<Assessment, ComputeError> {
        self.encoder.encode(&self.tree, features)
    }

    /// Parse a JSON request and return the assessment as JSON
    pub fn assess_json(&self, request_json: &str) -> Result<String, ComputeError> {
        let features = input::parse_request(request_json)?;
        self.encoder.encode_to_json(&self.tree, &features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Feature;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_json() {
        let result = classify_json(
            r#"{"sleep_duration": 8.0, "heart_rate": 70, "daily_steps": 6000, "bmi": 30}"#
                .to_string(),
        )
        .unwrap();

        let payload: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(payload["label"], "None");
        assert_eq!(payload["path"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_classify_json_missing_feature() {
        let result = classify_json(
            r#"{"sleep_duration": 8.0, "heart_rate": 70, "daily_steps": 6000}"#.to_string(),
        );

        assert!(matches!(
            result,
            Err(ComputeError::MissingFeature(Feature::Bmi))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let result = classify_json("not valid json".to_string());
        assert!(matches!(result, Err(ComputeError::JsonError(_))));
    }

    #[test]
    fn test_classifier_keeps_instance_id() {
        let classifier = SleepClassifier::with_instance_id("kiosk-1".to_string());
        let features = FeatureSet::from_values(6.0, 70.0, 4000.0, 22.0);

        let first = classifier.assess(&features).unwrap();
        let second = classifier.assess(&features).unwrap();

        assert_eq!(first.producer.instance_id, "kiosk-1");
        assert_eq!(first.producer, second.producer);
        assert_eq!(first.steps, second.steps);
    }

    #[test]
    fn test_predict_and_path_agree() {
        let classifier = SleepClassifier::new();

        for sleep in [5.0, 7.3, 9.0] {
            for hr in [60.0, 76.0, 78.0, 80.0, 95.0] {
                for steps in [1000.0, 5300.0, 9000.0] {
                    for bmi in [20.0, 25.0, 31.0] {
                        let features = FeatureSet::from_values(sleep, hr, steps, bmi);
                        let label = classifier.predict(&features).unwrap();
                        let path = classifier.decision_path(&features).unwrap();

                        assert_eq!(path.last(), Some(&DecisionStep::Outcome { label }));
                    }
                }
            }
        }
    }
}
