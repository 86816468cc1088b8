//! Credit decision request and response payloads

use crate::features::SelectedFeatures;
use crate::types::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of thresholding the classifier probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "aprobado")]
    Approved,
    #[serde(rename = "rechazado")]
    Rejected,
}

impl Decision {
    /// Apply the threshold: strictly below approves, at or above rejects.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability < threshold {
            Decision::Approved
        } else {
            Decision::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "aprobado",
            Decision::Rejected => "rechazado",
        }
    }
}

/// A scoring request for one credit, with the user's SMS log inline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringRequest {
    /// Credit document identifier
    #[serde(alias = "uid")]
    pub credit_uid: String,

    /// Owner of the credit
    #[serde(alias = "userId")]
    pub user_id: String,

    /// Devices the messages were collected from
    #[serde(default, alias = "uuidDevices")]
    pub devices: Vec<String>,

    /// SMS log, in retrieval order
    #[serde(default, alias = "sms")]
    pub messages: Vec<Message>,
}

impl ScoringRequest {
    pub fn new(credit_uid: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            credit_uid: credit_uid.into(),
            user_id: user_id.into(),
            devices: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }
}

/// Decision published for a scored credit
#[derive(Debug, Clone, Serialize)]
pub struct DecisionPayload {
    /// Unique decision identifier
    pub decision_id: String,

    pub credit_uid: String,

    pub user_id: String,

    pub device_count: usize,

    pub sms_count: usize,

    /// Class 1 probability returned by the classifier
    pub fraud_probability: f64,

    pub decision: Decision,

    pub threshold: f64,

    /// Classifier input, in model column order
    pub features_used: SelectedFeatures,

    /// Decision timestamp
    pub timestamp: DateTime<Utc>,
}

/// Error reply for a request that could not be scored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringFailure {
    pub credit_uid: String,
    pub error: String,
}

/// Credit id reported when a request is too malformed to carry one.
pub const UNKNOWN_CREDIT: &str = "unknown";

impl ScoringFailure {
    /// Failure for a payload that did not deserialize into a request.
    ///
    /// Keeps the credit id when the payload is JSON with a string
    /// `credit_uid` (or `uid`), so the caller can still correlate the reply.
    pub fn malformed(payload: &[u8], error: &serde_json::Error) -> Self {
        let credit_uid = serde_json::from_slice::<serde_json::Value>(payload)
            .ok()
            .and_then(|value| {
                ["credit_uid", "uid"]
                    .iter()
                    .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
            })
            .unwrap_or_else(|| UNKNOWN_CREDIT.to_string());

        Self {
            credit_uid,
            error: format!("malformed scoring request: {error}"),
        }
    }
}
