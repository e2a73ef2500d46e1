//! Fixed sleep-disorder decision tree
//!
//! The tree topology and thresholds are constants. Traversal compares the raw
//! feature value against each node threshold with `<=`, descending left on
//! true and right on false, until a leaf is reached.

use crate::error::ComputeError;
use crate::types::{DecisionStep, Feature, FeatureSet, Label};

/// A node in the decision tree
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionNode {
    /// Threshold test with exclusively owned children
    Internal {
        feature: Feature,
        threshold: f64,
        /// Taken when `value <= threshold`
        left: Box<DecisionNode>,
        /// Taken when `value > threshold`
        right: Box<DecisionNode>,
    },
    /// Terminal classification
    Leaf(Label),
}

impl DecisionNode {
    pub fn leaf(label: Label) -> Self {
        DecisionNode::Leaf(label)
    }

    pub fn split(
        feature: Feature,
        threshold: f64,
        left: DecisionNode,
        right: DecisionNode,
    ) -> Self {
        DecisionNode::Internal {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of internal nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        match self {
            DecisionNode::Leaf(_) => 0,
            DecisionNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Sleep disorder classifier over a fixed decision tree
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    root: DecisionNode,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Build the fixed tree
    pub fn new() -> Self {
        Self { root: build_tree() }
    }

    pub fn root(&self) -> &DecisionNode {
        &self.root
    }

    /// Upper bound on comparisons performed by one traversal
    pub fn max_depth(&self) -> usize {
        self.root.depth()
    }

    /// Classify a feature set.
    ///
    /// Fails with [`ComputeError::MissingFeature`] if a node on the traversed
    /// path tests a feature absent from `features`. Features that are never
    /// tested on the path may be absent.
    pub fn predict(&self, features: &FeatureSet) -> Result<Label, ComputeError> {
        self.traverse(features, |_| {})
    }

    /// Traverse the tree and record every comparison plus the final outcome.
    ///
    /// The returned path is never empty and always ends with
    /// [`DecisionStep::Outcome`].
    pub fn decision_path(&self, features: &FeatureSet) -> Result<Vec<DecisionStep>, ComputeError> {
        self.evaluate(features).map(|(_, path)| path)
    }

    /// Label and decision path from a single traversal
    pub fn evaluate(
        &self,
        features: &FeatureSet,
    ) -> Result<(Label, Vec<DecisionStep>), ComputeError> {
        let mut path = Vec::with_capacity(self.max_depth() + 1);
        let label = self.traverse(features, |step| path.push(step))?;
        path.push(DecisionStep::Outcome { label });
        Ok((label, path))
    }

    fn traverse<F>(&self, features: &FeatureSet, mut on_step: F) -> Result<Label, ComputeError>
    where
        F: FnMut(DecisionStep),
    {
        let mut node = &self.root;

        loop {
            match node {
                DecisionNode::Leaf(label) => return Ok(*label),
                DecisionNode::Internal {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.require(*feature)?;
                    let outcome = value <= *threshold;

                    on_step(DecisionStep::Comparison {
                        feature: *feature,
                        threshold: *threshold,
                        value,
                        outcome,
                    });

                    node = if outcome { left.as_ref() } else { right.as_ref() };
                }
            }
        }
    }
}

fn build_tree() -> DecisionNode {
    use DecisionNode as N;

    let bmi_heart = N::split(
        Feature::Bmi,
        25.0,
        N::leaf(Label::SleepApnea),
        N::split(
            Feature::HeartRate,
            80.0,
            N::leaf(Label::None),
            N::leaf(Label::Insomnia),
        ),
    );

    let steps = N::split(Feature::DailySteps, 5300.0, N::leaf(Label::None), bmi_heart);

    let heart = N::split(
        Feature::HeartRate,
        76.0,
        N::leaf(Label::SleepApnea),
        N::leaf(Label::Insomnia),
    );

    N::split(Feature::SleepDuration, 7.3, heart, steps)
}
