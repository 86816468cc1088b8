//! Credit scoring: feature extraction, classifier call and threshold decision

use crate::error::ScoringError;
use crate::feature_extractor::FeatureExtractor;
use crate::features::SelectedFeatures;
use crate::models::Classifier;
use crate::types::decision::{Decision, DecisionPayload, ScoringRequest};
use crate::types::message::Message;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Decision threshold the production model was calibrated for.
pub const DEFAULT_THRESHOLD: f64 = 0.5090;

/// Threshold applied to the class 1 probability.
///
/// The cutoff is calibrated with the model and is not configurable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    threshold: f64,
}

impl DecisionPolicy {
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn decide(&self, probability: f64) -> Decision {
        Decision::from_probability(probability, self.threshold)
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Result of scoring one SMS log
#[derive(Debug, Clone)]
pub struct ScoringOutcome {
    pub probability: f64,
    pub decision: Decision,
    pub threshold: f64,
    pub features: SelectedFeatures,
}

impl ScoringOutcome {
    /// Build the published payload for `request`
    pub fn to_payload(&self, request: &ScoringRequest) -> DecisionPayload {
        DecisionPayload {
            decision_id: uuid::Uuid::new_v4().to_string(),
            credit_uid: request.credit_uid.clone(),
            user_id: request.user_id.clone(),
            device_count: request.devices.len(),
            sms_count: request.messages.len(),
            fraud_probability: self.probability,
            decision: self.decision,
            threshold: self.threshold,
            features_used: self.features.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Runs the feature pipeline and the injected classifier.
///
/// The classifier is optional so the service can start without a model;
/// scoring then fails with [`ScoringError::ClassifierUnavailable`].
#[derive(Clone)]
pub struct CreditScorer {
    extractor: FeatureExtractor,
    classifier: Option<Arc<dyn Classifier>>,
    policy: DecisionPolicy,
}

impl CreditScorer {
    pub fn new(classifier: Option<Arc<dyn Classifier>>) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            classifier,
            policy: DecisionPolicy::default(),
        }
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Score an SMS log.
    pub fn score(&self, messages: &[Message]) -> Result<ScoringOutcome, ScoringError> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or(ScoringError::ClassifierUnavailable)?;

        let features = self.extractor.extract(messages);

        let probability = classifier
            .predict_proba(&features)
            .map_err(ScoringError::Inference)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoringError::InvalidProbability(probability));
        }

        let decision = self.policy.decide(probability);

        debug!(
            classifier = %classifier.name(),
            messages = messages.len(),
            probability = probability,
            decision = decision.as_str(),
            "Credit scored"
        );

        Ok(ScoringOutcome {
            probability,
            decision,
            threshold: self.policy.threshold(),
            features,
        })
    }

    /// Score a request and build its payload
    pub fn score_request(&self, request: &ScoringRequest) -> Result<DecisionPayload, ScoringError> {
        self.score(&request.messages)
            .map(|outcome| outcome.to_payload(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SELECTED_FEATURES;
    use std::sync::Mutex;

    /// Returns a fixed probability and records the vectors it was given.
    struct FixedClassifier {
        probability: f64,
        seen: Mutex<Vec<Vec<f64>>>,
    }

    impl FixedClassifier {
        fn new(probability: f64) -> Arc<Self> {
            Arc::new(Self {
                probability,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, features: &SelectedFeatures) -> anyhow::Result<f64> {
            self.seen.lock().unwrap().push(features.values());
            Ok(self.probability)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn predict_proba(&self, _features: &SelectedFeatures) -> anyhow::Result<f64> {
            Err(anyhow::anyhow!("session closed"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn scorer(classifier: Arc<dyn Classifier>) -> CreditScorer {
        CreditScorer::new(Some(classifier))
    }

    #[test]
    fn test_missing_classifier_is_an_error() {
        let scorer = CreditScorer::new(None);
        let result = scorer.score(&[Message::new("hola", "123")]);
        assert!(matches!(result, Err(ScoringError::ClassifierUnavailable)));
        assert!(!scorer.has_classifier());
    }

    #[test]
    fn test_empty_log_scores_all_zero_vector() {
        let classifier = FixedClassifier::new(0.2);
        let outcome = scorer(classifier.clone()).score(&[]).unwrap();

        assert_eq!(outcome.decision, Decision::Approved);
        assert_eq!(outcome.threshold, DEFAULT_THRESHOLD);

        let seen = classifier.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], vec![0.0; SELECTED_FEATURES.len()]);
    }

    #[test]
    fn test_policy_uses_calibrated_threshold() {
        let policy = DecisionPolicy::default();
        assert_eq!(policy.threshold(), 0.5090);
        assert_eq!(policy.decide(0.55), Decision::Rejected);
        assert_eq!(policy.decide(0.50), Decision::Approved);
    }

    #[test]
    fn test_threshold_is_inclusive_for_rejection() {
        let at = scorer(FixedClassifier::new(0.5090)).score(&[]).unwrap();
        let below = scorer(FixedClassifier::new(0.5089)).score(&[]).unwrap();

        assert_eq!(at.decision, Decision::Rejected);
        assert_eq!(below.decision, Decision::Approved);
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let result = scorer(FixedClassifier::new(1.5)).score(&[]);
        assert!(matches!(result, Err(ScoringError::InvalidProbability(p)) if p == 1.5));

        let result = scorer(FixedClassifier::new(f64::NAN)).score(&[]);
        assert!(matches!(result, Err(ScoringError::InvalidProbability(_))));
    }

    #[test]
    fn test_inference_error_propagates() {
        let result = scorer(Arc::new(FailingClassifier)).score(&[]);
        let err = result.unwrap_err();
        assert!(matches!(err, ScoringError::Inference(_)));
        assert!(err.to_string().contains("session closed"));
    }

    #[test]
    fn test_payload_carries_request_context() {
        let request = ScoringRequest::new("credit-1", "user-1").with_messages(vec![
            Message::new("Aprobado tu credito Visa", "BANCOLOMBIA"),
            Message::new("Pago exitoso", "BANCOLOMBIA"),
        ]);

        let payload = scorer(FixedClassifier::new(0.7))
            .score_request(&request)
            .unwrap();

        assert_eq!(payload.credit_uid, "credit-1");
        assert_eq!(payload.sms_count, 2);
        assert_eq!(payload.device_count, 0);
        assert_eq!(payload.decision, Decision::Rejected);
        assert_eq!(payload.features_used.get("message_count"), Some(2.0));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["decision"], "rechazado");
        assert_eq!(json["threshold"], 0.5090);
        assert_eq!(
            json["features_used"].as_object().unwrap().len(),
            SELECTED_FEATURES.len()
        );
    }
}
