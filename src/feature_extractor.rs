//! Feature extraction for credit decision model inference.
//!
//! This module turns a user's SMS log into the feature vector the trained
//! classifier expects, chaining the stages in [`crate::features`].

use crate::features::{
    DerivedMetrics, FeatureExpander, FeatureRecord, FeatureSelector, RatioComputer,
    SelectedFeatures, SignalExtractor,
};
use crate::types::message::Message;
use tracing::debug;

/// Feature extractor that transforms SMS logs into model input features.
///
/// Every stage is a pure function of its input, so one extractor can be
/// shared across worker tasks.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    signals: SignalExtractor,
    derived: DerivedMetrics,
    ratios: RatioComputer,
    expander: FeatureExpander,
    selector: FeatureSelector,
}

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the base feature record: raw counts, derived metrics and ratios.
    ///
    /// An empty log yields only the zeroed base features; derived metrics
    /// and ratios are not computed for it.
    pub fn base_features(&self, messages: &[Message]) -> FeatureRecord {
        let mut record = self.signals.extract(messages);
        if messages.is_empty() {
            return record;
        }

        let derived = self.derived.compute(&record);
        record.extend(derived);
        self.ratios.apply(&mut record);
        record
    }

    /// Base features plus pairwise ratios.
    pub fn expanded_features(&self, messages: &[Message]) -> FeatureRecord {
        self.expander.expand(&self.base_features(messages))
    }

    /// Extract the classifier input vector from an SMS log.
    pub fn extract(&self, messages: &[Message]) -> SelectedFeatures {
        let expanded = self.expanded_features(messages);
        let selected = self.selector.select(&expanded);

        if !selected.defaulted().is_empty() {
            debug!(
                messages = messages.len(),
                defaulted = ?selected.defaulted(),
                "Selected columns missing after expansion, filled with zero"
            );
        }

        selected
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        self.selector.columns().len()
    }

    /// Get feature names, in model order.
    pub fn feature_names(&self) -> &[&'static str] {
        self.selector.columns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{SELECTED_FEATURES, TOTAL_COUNT};

    #[test]
    fn test_feature_count() {
        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.feature_count(), 20);
        assert_eq!(extractor.feature_names(), &SELECTED_FEATURES[..]);
    }

    #[test]
    fn test_empty_log_gives_all_zero_vector() {
        let extractor = FeatureExtractor::new();

        let base = extractor.base_features(&[]);
        assert!(!base.contains(TOTAL_COUNT));

        let features = extractor.extract(&[]);
        assert_eq!(features.len(), 20);
        assert!(features.values().iter().all(|&v| v == 0.0));
        // message_count, nivel_transaccional, score_riesgo are not base features
        assert_eq!(
            features.defaulted(),
            &["message_count", "nivel_transaccional", "score_riesgo"]
        );
    }

    #[test]
    fn test_single_credit_card_message() {
        let extractor = FeatureExtractor::new();
        let messages = vec![Message::new("Aprobado tu credito Visa", "BANCOLOMBIA")];

        let base = extractor.base_features(&messages);
        assert_eq!(base.get("tarjetas_credito_count"), Some(1.0));
        assert_eq!(base.get("aprobaciones_count"), Some(1.0));
        assert_eq!(base.get("bancolombia_count"), Some(0.0));
        assert!(base.get("credito_formal").unwrap() >= 1.0);
        assert_eq!(base.get("ratio_aprobaciones_rechazos"), Some(1.0));

        let features = extractor.extract(&messages);
        assert!(features.defaulted().is_empty());
        assert_eq!(features.get("message_count"), Some(1.0));

        let expected = 1.0 / (1.0 + 1e-4);
        let ratio = features
            .get("R_credito_formal_vs_tarjetas_credito_count")
            .unwrap();
        assert!((ratio - expected).abs() < 1e-12);
    }

    #[test]
    fn test_total_count_matches_count_sum() {
        let extractor = FeatureExtractor::new();
        let messages = vec![
            Message::new("Compra por $20.000 en Exito con tu Visa", "891333"),
            Message::new("Tu codigo Nequi es 1234", "85954"),
            Message::new("Pago exitoso de tu factura EPM", "alertas@epm.com.co"),
        ];

        let base = extractor.base_features(&messages);

        let sum: f64 = base
            .iter()
            .filter(|(name, _)| name.ends_with("_count") && *name != TOTAL_COUNT)
            .map(|(_, value)| value)
            .sum();
        assert_eq!(base.get(TOTAL_COUNT), Some(sum));

        for (name, value) in base.iter().filter(|(name, _)| name.ends_with("_count")) {
            assert!(value >= 0.0 && value.fract() == 0.0, "{name} = {value}");
        }
        for (name, value) in base.iter().filter(|(name, _)| name.ends_with("_ratio")) {
            assert!((0.0..=1.0).contains(&value), "{name} = {value}");
        }
    }

    #[test]
    fn test_selected_values_always_finite() {
        let extractor = FeatureExtractor::new();
        let messages: Vec<Message> = (0..50)
            .map(|i| Message::new(format!("Prenda vencida {i}, gota a gota"), "3001234567"))
            .collect();

        let features = extractor.extract(&messages);
        assert!(features.values().iter().all(|v| v.is_finite()));
    }
}
