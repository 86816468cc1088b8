//! Normalized twins of count variables.

use super::{FeatureRecord, COUNT_SUFFIX, RATIO_SUFFIX, TOTAL_COUNT};

/// Adds `total_count` and one `<name>_ratio` per `<name>_count` variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioComputer;

impl RatioComputer {
    pub fn new() -> Self {
        Self
    }

    /// Compute the grand total and the ratios, inserting them into `record`.
    ///
    /// Only keys present before the call are considered, so `total_count`
    /// never counts itself. When the total is zero every ratio is zero.
    pub fn apply(&self, record: &mut FeatureRecord) {
        let counts: Vec<(String, f64)> = record
            .iter()
            .filter(|(name, _)| name.ends_with(COUNT_SUFFIX))
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        let total: f64 = counts.iter().map(|(_, value)| value).sum();
        record.insert(TOTAL_COUNT, total);

        for (name, value) in counts {
            let ratio = if total > 0.0 { value / total } else { 0.0 };
            record.insert(name.replace(COUNT_SUFFIX, RATIO_SUFFIX), ratio);
        }
    }
}
