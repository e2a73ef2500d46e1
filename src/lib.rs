//! Sleep Triage - Fixed decision-tree screening for sleep disorders
//!
//! Sleep Triage classifies a person's likely sleep-disorder category
//! (Insomnia, Sleep Apnea or None) from four daily signals: sleep duration,
//! heart rate, step count and BMI. Requests flow through a deterministic
//! pipeline: input parsing → validation → tree evaluation → assessment encoding.
//!
//! ## Modules
//!
//! - **Tree**: the fixed decision tree, prediction and decision-path tracing
//! - **Input**: feature parsing and validation for callers
//! - **Encoder / Pipeline**: assessment reports with recommendations
//! - **Diagram**: text and Graphviz renderings of the tree

pub mod advice;
pub mod diagram;
pub mod encoder;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod tree;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::ComputeError;
pub use pipeline::{classify_json, SleepClassifier};
pub use tree::{DecisionNode, DecisionTree};
pub use types::{Assessment, DecisionStep, Feature, FeatureSet, Label};

/// Version embedded in all assessment payloads
pub const TRIAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for assessment payloads
pub const PRODUCER_NAME: &str = "sleep-triage";
