//! Threshold buckets ("states") used to pick template variants.

use std::collections::BTreeMap;

/// Ordered `(threshold, name)` table built once from configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateTable {
    // Sorted by threshold, highest first.
    entries: Vec<(f64, String)>,
}

impl StateTable {
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut entries: Vec<(f64, String)> = states
            .into_iter()
            .map(|(name, threshold)| (threshold, name.into()))
            .collect();
        // Stable sort keeps the insertion order for equal thresholds.
        entries.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { entries }
    }

    pub fn from_map(states: &BTreeMap<String, f64>) -> Self {
        Self::new(states.iter().map(|(name, threshold)| (name.clone(), *threshold)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Name of the highest threshold not exceeding `value`, or `""`.
    pub fn resolve(&self, value: f64) -> &str {
        self.entries
            .iter()
            .find(|(threshold, _)| value >= *threshold)
            .map(|(_, name)| name.as_str())
            .unwrap_or("")
    }
}
