//! NATS message producer for credit decisions

use crate::types::decision::{DecisionPayload, ScoringFailure};
use anyhow::Result;
use async_nats::{Client, Subject};
use tracing::debug;

/// Producer for publishing credit decisions to NATS
#[derive(Clone)]
pub struct DecisionProducer {
    client: Client,
    subject: String,
}

impl DecisionProducer {
    /// Create a new decision producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish a decision to the decision subject
    pub async fn publish(&self, payload: &DecisionPayload) -> Result<()> {
        let bytes = serde_json::to_vec(payload)?;

        self.client
            .publish(self.subject.clone(), bytes.into())
            .await?;

        debug!(
            decision_id = %payload.decision_id,
            credit_uid = %payload.credit_uid,
            decision = payload.decision.as_str(),
            "Published credit decision"
        );

        Ok(())
    }

    /// Answer a request/reply caller with the decision
    pub async fn reply(&self, reply_to: Subject, payload: &DecisionPayload) -> Result<()> {
        let bytes = serde_json::to_vec(payload)?;
        self.client.publish(reply_to, bytes.into()).await?;
        Ok(())
    }

    /// Answer a request/reply caller with a failure
    pub async fn reply_failure(&self, reply_to: Subject, failure: &ScoringFailure) -> Result<()> {
        let bytes = serde_json::to_vec(failure)?;
        self.client.publish(reply_to, bytes.into()).await?;
        Ok(())
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
