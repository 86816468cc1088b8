//! Errors surfaced by the scoring path.

use thiserror::Error;

/// Failure to turn an SMS log into a credit decision.
///
/// Feature extraction itself never fails; every variant comes from the
/// classifier boundary.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("classifier is not loaded")]
    ClassifierUnavailable,
    #[error("classifier inference failed: {0:#}")]
    Inference(#[source] anyhow::Error),
    #[error("classifier returned probability {0} outside [0, 1]")]
    InvalidProbability(f64),
}
