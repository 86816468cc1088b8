//! Type definitions for the credit decision pipeline

pub mod decision;
pub mod message;

pub use decision::{Decision, DecisionPayload, ScoringFailure, ScoringRequest};
pub use message::Message;
