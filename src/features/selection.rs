//! Projection onto the classifier's input contract.

use super::{FeatureRecord, SELECTED_FEATURES};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// The ordered feature vector handed to the classifier.
///
/// Serializes as a JSON object whose keys follow the column order.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFeatures {
    columns: Vec<(&'static str, f64)>,
    defaulted: Vec<&'static str>,
}

impl SelectedFeatures {
    /// Column names, in model order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|&(name, _)| name)
    }

    /// Column values, in model order.
    pub fn values(&self) -> Vec<f64> {
        self.columns.iter().map(|&(_, value)| value).collect()
    }

    /// Column values as `f32`, the ONNX input type.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.columns.iter().map(|&(_, value)| value as f32).collect()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|&&(column, _)| column == name)
            .map(|&(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.columns.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns that were absent from the expanded record and filled with zero.
    pub fn defaulted(&self) -> &[&'static str] {
        &self.defaulted
    }
}

impl Serialize for SelectedFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Selects a fixed, ordered list of columns.
#[derive(Debug, Clone)]
pub struct FeatureSelector {
    columns: Vec<&'static str>,
}

impl FeatureSelector {
    pub fn new() -> Self {
        Self::with_columns(&SELECTED_FEATURES)
    }

    pub fn with_columns(columns: &[&'static str]) -> Self {
        Self {
            columns: columns.to_vec(),
        }
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Copy each configured column from `expanded`, or zero when absent.
    pub fn select(&self, expanded: &FeatureRecord) -> SelectedFeatures {
        let mut defaulted = Vec::new();
        let columns = self
            .columns
            .iter()
            .map(|&name| match expanded.get(name) {
                Some(value) => (name, value),
                None => {
                    defaulted.push(name);
                    (name, 0.0)
                }
            })
            .collect();

        SelectedFeatures { columns, defaulted }
    }
}

impl Default for FeatureSelector {
    fn default() -> Self {
        Self::new()
    }
}
