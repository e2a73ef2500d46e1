//! Assessment encoding
//!
//! This module runs a feature set through the tree and packages the label,
//! decision path and recommendation into an [`Assessment`] report with
//! producer metadata.

use chrono::Utc;
use uuid::Uuid;

use crate::advice::recommendation;
use crate::error::ComputeError;
use crate::input;
use crate::tree::DecisionTree;
use crate::types::{Assessment, AssessmentProducer, FeatureSet};
use crate::{PRODUCER_NAME, TRIAGE_VERSION};

/// Encoder for producing assessment reports
pub struct AssessmentEncoder {
    instance_id: String,
}

impl Default for AssessmentEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Validate the features, classify them and build the report
    pub fn encode(
        &self,
        tree: &DecisionTree,
        features: &FeatureSet,
    ) -> Result<Assessment, ComputeError> {
        input::validate(features)?;

        let (label, steps) = tree.evaluate(features)?;

        Ok(Assessment {
            producer: AssessmentProducer {
                name: PRODUCER_NAME.to_string(),
                version: TRIAGE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            features: features.clone(),
            label,
            path: steps.iter().map(ToString::to_string).collect(),
            steps,
            recommendation: recommendation(label).to_string(),
        })
    }

    /// Encode to a JSON string
    pub fn encode_to_json(
        &self,
        tree: &DecisionTree,
        features: &FeatureSet,
    ) -> Result<String, ComputeError> {
        let assessment = self.encode(tree, features)?;
        Ok(serde_json::to_string(&assessment)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DecisionStep, Feature, Label};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_assessment() {
        let encoder = AssessmentEncoder::with_instance_id("test-instance".to_string());
        let tree = DecisionTree::new();
        let features = FeatureSet::from_values(8.0, 70.0, 6000.0, 24.0);

        let assessment = encoder.encode(&tree, &features).unwrap();

        assert_eq!(assessment.producer.name, PRODUCER_NAME);
        assert_eq!(assessment.producer.instance_id, "test-instance");
        assert_eq!(assessment.label, Label::SleepApnea);
        assert_eq!(assessment.features, features);
        assert_eq!(assessment.steps.len(), 4);
        assert_eq!(
            assessment.path,
            vec![
                "sleep_duration <= 7.3 = False (8 > 7.3)",
                "daily_steps <= 5300 = False (6000 > 5300)",
                "bmi <= 25 = True (24 <= 25)",
                "Prediction: Sleep Apnea",
            ]
        );
        assert_eq!(assessment.recommendation, recommendation(Label::SleepApnea));
    }

    #[test]
    fn test_label_matches_final_step() {
        let encoder = AssessmentEncoder::new();
        let tree = DecisionTree::new();
        let features = FeatureSet::from_values(8.0, 85.0, 6000.0, 30.0);

        let assessment = encoder.encode(&tree, &features).unwrap();

        assert_eq!(assessment.label, Label::Insomnia);
        assert_eq!(
            assessment.steps.last(),
            Some(&DecisionStep::Outcome {
                label: Label::Insomnia
            })
        );
        assert_eq!(assessment.path.last().map(String::as_str), Some("Prediction: Insomnia"));
    }

    #[test]
    fn test_encode_to_json() {
        let encoder = AssessmentEncoder::new();
        let tree = DecisionTree::new();
        let features = FeatureSet::from_values(6.0, 80.0, 4000.0, 22.0);

        let json = encoder.encode_to_json(&tree, &features).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(payload["label"], "Insomnia");
        assert_eq!(payload["features"]["heart_rate"], 80.0);
        assert_eq!(payload["steps"][1]["kind"], "comparison");
        assert_eq!(payload["steps"][1]["outcome"], false);
        assert!(payload["computed_at_utc"].as_str().is_some());
        assert_eq!(payload["producer"]["version"], TRIAGE_VERSION);
    }

    #[test]
    fn test_encode_rejects_negative_values() {
        let encoder = AssessmentEncoder::new();
        let tree = DecisionTree::new();
        let features = FeatureSet::from_values(6.0, 70.0, -10.0, 22.0);

        assert!(matches!(
            encoder.encode(&tree, &features),
            Err(ComputeError::InvalidFeature {
                feature: Feature::DailySteps,
                ..
            })
        ));
    }

    #[test]
    fn test_encode_propagates_missing_feature() {
        let encoder = AssessmentEncoder::new();
        let tree = DecisionTree::new();
        let features = FeatureSet::new()
            .with(Feature::SleepDuration, 8.0)
            .with(Feature::DailySteps, 6000.0)
            .with(Feature::Bmi, 30.0);

        assert!(matches!(
            encoder.encode(&tree, &features),
            Err(ComputeError::MissingFeature(Feature::HeartRate))
        ));
    }

    #[test]
    fn test_unique_instance_ids() {
        let a = AssessmentEncoder::new();
        let b = AssessmentEncoder::new();
        assert_ne!(a.instance_id(), b.instance_id());
    }
}
