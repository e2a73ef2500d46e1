//! Core types for Sleep Triage
//!
//! This module defines the data that flows into and out of the decision tree:
//! the feature vocabulary, classification labels, feature sets, decision path
//! records and the assessment report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ComputeError;

/// Input feature consumed by the decision tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Nightly sleep duration (hours)
    SleepDuration,
    /// Resting heart rate (bpm)
    HeartRate,
    /// Daily step count
    DailySteps,
    /// Body mass index (kg/m²)
    Bmi,
}

impl Feature {
    /// Every feature, in canonical input order
    pub const ALL: [Feature; 4] = [
        Feature::SleepDuration,
        Feature::HeartRate,
        Feature::DailySteps,
        Feature::Bmi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::SleepDuration => "sleep_duration",
            Feature::HeartRate => "heart_rate",
            Feature::DailySteps => "daily_steps",
            Feature::Bmi => "bmi",
        }
    }

    /// Human-readable name with unit, for report headers
    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::SleepDuration => "Sleep Duration (hours)",
            Feature::HeartRate => "Heart Rate (bpm)",
            Feature::DailySteps => "Daily Steps",
            Feature::Bmi => "BMI",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| ComputeError::UnknownFeature(s.to_string()))
    }
}

/// Sleep disorder classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "Insomnia")]
    Insomnia,
    #[serde(rename = "Sleep Apnea")]
    SleepApnea,
    #[serde(rename = "None")]
    None,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Insomnia => "Insomnia",
            Label::SleepApnea => "Sleep Apnea",
            Label::None => "None",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature values supplied for a single classification request.
///
/// A complete set holds all four features. Partial sets are accepted; the
/// tree reports [`ComputeError::MissingFeature`] only when a traversal
/// actually needs an absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet {
    values: BTreeMap<Feature, f64>,
}

impl FeatureSet {
    /// Create an empty feature set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a complete feature set in canonical order
    pub fn from_values(sleep_duration: f64, heart_rate: f64, daily_steps: f64, bmi: f64) -> Self {
        Self::new()
            .with(Feature::SleepDuration, sleep_duration)
            .with(Feature::HeartRate, heart_rate)
            .with(Feature::DailySteps, daily_steps)
            .with(Feature::Bmi, bmi)
    }

    /// Set a feature value, replacing any previous one
    pub fn with(mut self, feature: Feature, value: f64) -> Self {
        self.insert(feature, value);
        self
    }

    pub fn insert(&mut self, feature: Feature, value: f64) -> Option<f64> {
        self.values.insert(feature, value)
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.values.get(&feature).copied()
    }

    /// Value of a feature, or `MissingFeature` if absent
    pub fn require(&self, feature: Feature) -> Result<f64, ComputeError> {
        self.get(feature).ok_or(ComputeError::MissingFeature(feature))
    }

    /// Features from the required set that are not present
    pub fn missing(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|feature| !self.values.contains_key(feature))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.values.iter().map(|(feature, value)| (*feature, *value))
    }
}

/// One record of a decision path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionStep {
    /// Threshold test at an internal node
    Comparison {
        feature: Feature,
        threshold: f64,
        value: f64,
        /// Result of `value <= threshold`; true means the left branch was taken
        outcome: bool,
    },
    /// Leaf reached at the end of the traversal
    Outcome { label: Label },
}

impl fmt::Display for DecisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionStep::Comparison {
                feature,
                threshold,
                value,
                outcome: true,
            } => write!(f, "{feature} <= {threshold} = True ({value} <= {threshold})"),
            DecisionStep::Comparison {
                feature,
                threshold,
                value,
                outcome: false,
            } => write!(f, "{feature} <= {threshold} = False ({value} > {threshold})"),
            DecisionStep::Outcome { label } => write!(f, "Prediction: {label}"),
        }
    }
}

/// Producer metadata embedded in every assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Full classification report for one feature set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub producer: AssessmentProducer,
    /// When the assessment was computed (RFC 3339, UTC)
    pub computed_at_utc: String,
    pub features: FeatureSet,
    pub label: Label,
    /// Rendered decision path, one line per step
    pub path: Vec<String>,
    pub steps: Vec<DecisionStep>,
    pub recommendation: String,
}
