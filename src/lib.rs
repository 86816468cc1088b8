//! SMS Credit Decision Pipeline Library
//!
//! Turns a user's SMS metadata log into the fixed feature vector of a
//! trained credit classifier and thresholds its probability into an
//! approve/reject decision.

pub mod config;
pub mod consumer;
pub mod error;
pub mod feature_extractor;
pub mod features;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod scorer;
pub mod types;

pub use config::AppConfig;
pub use consumer::RequestConsumer;
pub use error::ScoringError;
pub use feature_extractor::FeatureExtractor;
pub use models::{Classifier, InferenceEngine};
pub use producer::DecisionProducer;
pub use scorer::{CreditScorer, DecisionPolicy};
pub use types::{decision::Decision, message::Message};
