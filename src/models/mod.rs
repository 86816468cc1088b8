//! Classifier capability and its ONNX implementation

pub mod inference;
pub mod loader;

pub use inference::InferenceEngine;
pub use loader::ModelLoader;

use crate::features::SelectedFeatures;
use anyhow::Result;

/// A trained binary classifier.
///
/// Implementations map the selected feature vector to the probability of
/// class 1 (the "reject" class).
pub trait Classifier: Send + Sync {
    /// Probability of class 1, expected in `[0, 1]`.
    fn predict_proba(&self, features: &SelectedFeatures) -> Result<f64>;

    /// Name used in logs and metrics.
    fn name(&self) -> &str;
}
