//! Cross-method comparison: one decile vector per method, plus summary stats.
//!
//! Each method's population is sorted and aggregated independently, so the
//! work fans out across methods with no coordination. Output order always
//! follows input order, whether or not the parallel path is taken.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::deciles::{DecileVector, DECILE_COUNT};
use crate::distribution::SortedDistribution;
use crate::error::AnalysisError;

/// Decile vector of one named method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeciles {
    pub method: String,
    pub deciles: DecileVector,
}

/// Method name → decile vector, in insertion order.
///
/// Method names are unique. Inserting a name that is already present replaces
/// its vector and keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    entries: Vec<MethodDeciles>,
}

impl ComparisonTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the vector for `method`.
    ///
    /// Returns the previous vector if the name was already present.
    pub fn insert(&mut self, method: impl Into<String>, deciles: DecileVector) -> Option<DecileVector> {
        let method = method.into();
        match self.entries.iter_mut().find(|e| e.method == method) {
            Some(entry) => Some(std::mem::replace(&mut entry.deciles, deciles)),
            None => {
                self.entries.push(MethodDeciles { method, deciles });
                None
            }
        }
    }

    pub fn get(&self, method: &str) -> Option<&DecileVector> {
        self.entries
            .iter()
            .find(|e| e.method == method)
            .map(|e| &e.deciles)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.get(method).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodDeciles> {
        self.entries.iter()
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.method.as_str())
    }

    /// Sums of every method at decile `index`, in table order.
    ///
    /// # Panics
    /// If `index >= DECILE_COUNT`.
    pub fn decile_column(&self, index: usize) -> Vec<f64> {
        assert!(index < DECILE_COUNT, "decile index {index} out of range");
        self.entries.iter().map(|e| e.deciles[index]).collect()
    }

    /// Summary statistics of every method, in table order.
    pub fn summaries(&self) -> Vec<(&str, SummaryStats)> {
        self.entries
            .iter()
            .map(|e| (e.method.as_str(), SummaryStats::from_deciles(&e.deciles)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ComparisonTable {
    type Item = &'a MethodDeciles;
    type IntoIter = std::slice::Iter<'a, MethodDeciles>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Min, max, mean and median of the ten decile sums of one method.
///
/// These describe the decile sums, not the raw readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl SummaryStats {
    pub fn from_deciles(deciles: &DecileVector) -> Self {
        summary_stats(deciles)
    }
}

/// Compute [`SummaryStats`] over a decile vector.
///
/// The median is the mean of the 5th and 6th smallest entries, taken from a
/// sorted copy; `deciles` itself is untouched.
pub fn summary_stats(deciles: &DecileVector) -> SummaryStats {
    let mut sorted = *deciles.sums();
    sorted.sort_by(f64::total_cmp);

    let mid = DECILE_COUNT / 2;
    SummaryStats {
        min: sorted[0],
        max: sorted[DECILE_COUNT - 1],
        mean: deciles.total() / DECILE_COUNT as f64,
        median: (sorted[mid - 1] + sorted[mid]) / 2.0,
    }
}

/// Builds a [`ComparisonTable`] from raw per-method readings.
#[derive(Debug, Clone)]
pub struct MethodComparator {
    parallel: bool,
}

impl Default for MethodComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodComparator {
    /// Comparator that aggregates methods in parallel.
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enables or disables parallel aggregation across methods.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sort each method's readings, aggregate them into deciles, and collect
    /// the vectors under the method names.
    ///
    /// A method with no readings contributes ten zeros. Duplicate names keep
    /// the last population supplied, at the position of the first.
    pub fn build<I, S>(&self, per_method: I) -> Result<ComparisonTable, AnalysisError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let inputs: Vec<(String, Vec<f64>)> = per_method
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();

        if inputs.is_empty() {
            return Err(AnalysisError::empty("no methods supplied"));
        }

        let aggregated: Vec<(String, DecileVector)> = if self.parallel {
            inputs
                .into_par_iter()
                .map(|(name, values)| (name, SortedDistribution::new(values).deciles()))
                .collect()
        } else {
            inputs
                .into_iter()
                .map(|(name, values)| (name, SortedDistribution::new(values).deciles()))
                .collect()
        };

        let mut table = ComparisonTable::new();
        for (name, deciles) in aggregated {
            table.insert(name, deciles);
        }
        Ok(table)
    }
}
