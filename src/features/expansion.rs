//! Pairwise ratio expansion over the base feature list.

use super::{FeatureRecord, BASE_FEATURES};

/// Added to every denominator so zero-valued features stay finite.
pub const EPSILON: f64 = 1e-4;

/// Name of the ratio column for the ordered pair `(a, b)`.
pub fn pair_name(a: &str, b: &str) -> String {
    format!("R_{a}_vs_{b}")
}

/// Generates `R_<a>_vs_<b>` for every ordered pair of distinct base features.
#[derive(Debug, Clone)]
pub struct FeatureExpander {
    base: Vec<&'static str>,
}

impl FeatureExpander {
    pub fn new() -> Self {
        Self::with_base(&BASE_FEATURES)
    }

    /// Expander over a custom base list; pairs follow the list order.
    pub fn with_base(base: &[&'static str]) -> Self {
        Self {
            base: base.to_vec(),
        }
    }

    /// Ordered pairs `(a, b)` with `a != b`, in permutation order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.base.iter().enumerate().flat_map(move |(i, &a)| {
            self.base
                .iter()
                .enumerate()
                .filter(move |&(j, _)| j != i)
                .map(move |(_, &b)| (a, b))
        })
    }

    /// Expand `base` into a new record holding every original column plus
    /// the pair ratios.
    ///
    /// A pair is skipped when either operand is absent. Afterwards every
    /// non-finite value in the record is replaced with zero.
    pub fn expand(&self, base: &FeatureRecord) -> FeatureRecord {
        let mut expanded = base.clone();

        for (a, b) in self.pairs() {
            if let (Some(numerator), Some(denominator)) = (base.get(a), base.get(b)) {
                expanded.insert(pair_name(a, b), numerator / (denominator + EPSILON));
            }
        }

        expanded.sanitize();
        expanded
    }
}

impl Default for FeatureExpander {
    fn default() -> Self {
        Self::new()
    }
}
