//! Feature engineering over SMS logs.
//!
//! Stages run in a fixed order, each one a pure function of the previous
//! stage's record:
//!
//! 1. [`extractor`] counts keyword signals per message
//! 2. [`derived`] combines counts into composite indicators
//! 3. [`ratios`] adds a normalized twin for every `_count` variable
//! 4. [`expansion`] adds pairwise ratios over [`BASE_FEATURES`]
//! 5. [`selection`] projects onto [`SELECTED_FEATURES`], the model contract

pub mod derived;
pub mod expansion;
pub mod extractor;
pub mod ratios;
pub mod selection;
pub mod signals;

pub use derived::DerivedMetrics;
pub use expansion::FeatureExpander;
pub use extractor::SignalExtractor;
pub use ratios::RatioComputer;
pub use selection::{FeatureSelector, SelectedFeatures};

use std::collections::HashMap;

/// Suffix marking raw count variables.
pub const COUNT_SUFFIX: &str = "_count";

/// Suffix of the normalized twin of a count variable.
pub const RATIO_SUFFIX: &str = "_ratio";

/// Name of the grand total over all count variables.
pub const TOTAL_COUNT: &str = "total_count";

/// Inputs to pairwise ratio expansion. Pair order follows this list.
pub const BASE_FEATURES: [&str; 15] = [
    "tarjetas_credito_count",
    "zona_premium_count",
    "engagement_score",
    "impuestos_obligaciones_count",
    "credito_formal",
    "servicios_publicos_count",
    "prepago_count",
    "casas_empeno_count",
    "pospago_vs_prepago",
    "emergencia_medica_count",
    "mensajes_positivos_count",
    "vulnerabilidad_financiera",
    "educacion_count",
    "pensiones_cesantias_count",
    "ratio_aprobaciones_rechazos",
];

/// Classifier input columns, in the order the model was trained on.
pub const SELECTED_FEATURES: [&str; 20] = [
    "message_count",
    "nivel_transaccional",
    "engagement_score",
    "score_riesgo",
    "R_tarjetas_credito_count_vs_ratio_aprobaciones_rechazos",
    "R_zona_premium_count_vs_servicios_publicos_count",
    "R_zona_premium_count_vs_mensajes_positivos_count",
    "R_zona_premium_count_vs_vulnerabilidad_financiera",
    "R_engagement_score_vs_impuestos_obligaciones_count",
    "R_credito_formal_vs_tarjetas_credito_count",
    "R_credito_formal_vs_ratio_aprobaciones_rechazos",
    "R_servicios_publicos_count_vs_tarjetas_credito_count",
    "R_casas_empeno_count_vs_credito_formal",
    "R_emergencia_medica_count_vs_mensajes_positivos_count",
    "R_emergencia_medica_count_vs_ratio_aprobaciones_rechazos",
    "R_vulnerabilidad_financiera_vs_credito_formal",
    "R_educacion_count_vs_credito_formal",
    "R_educacion_count_vs_mensajes_positivos_count",
    "R_educacion_count_vs_pensiones_cesantias_count",
    "R_ratio_aprobaciones_rechazos_vs_credito_formal",
];

/// A single-row table of named numeric features.
///
/// Used for every intermediate stage (raw counts, derived metrics, base and
/// expanded records). Absence of a key is meaningful: expansion skips pairs
/// with a missing operand and selection defaults missing columns to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    values: HashMap<String, f64>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with every name set to zero.
    pub fn zeros<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names.into_iter().map(|name| (name.to_string(), 0.0)).collect()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value of `name`, or zero when absent.
    pub fn value(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, &value)| (name.as_str(), value))
    }

    /// Merge `other` into this record, overwriting shared names.
    pub fn extend(&mut self, other: FeatureRecord) {
        self.values.extend(other.values);
    }

    /// Replace every non-finite value with zero.
    pub fn sanitize(&mut self) {
        for value in self.values.values_mut() {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
    }
}

impl FromIterator<(String, f64)> for FeatureRecord {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_lists() {
        assert_eq!(BASE_FEATURES.len(), 15);
        assert_eq!(SELECTED_FEATURES.len(), 20);

        let mut names: Vec<&str> = SELECTED_FEATURES.to_vec();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SELECTED_FEATURES.len());
    }

    #[test]
    fn test_sanitize_replaces_non_finite() {
        let mut record = FeatureRecord::new();
        record.insert("a", f64::INFINITY);
        record.insert("b", f64::NEG_INFINITY);
        record.insert("c", f64::NAN);
        record.insert("d", -2.5);

        record.sanitize();

        assert_eq!(record.get("a"), Some(0.0));
        assert_eq!(record.get("b"), Some(0.0));
        assert_eq!(record.get("c"), Some(0.0));
        assert_eq!(record.get("d"), Some(-2.5));
    }

    #[test]
    fn test_value_defaults_to_zero() {
        let record = FeatureRecord::zeros(["x"]);
        assert_eq!(record.value("x"), 0.0);
        assert_eq!(record.value("missing"), 0.0);
        assert!(!record.contains("missing"));
    }
}
