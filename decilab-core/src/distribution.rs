//! Sorted per-method value populations.

use serde::{Deserialize, Serialize};

use crate::deciles::{compute_deciles, DecileVector};

/// Ascending, immutable sequence of metric readings for one method.
///
/// Sorting uses `f64::total_cmp` with a stable sort, so equal readings keep
/// their relative input order and the result is fully deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortedDistribution {
    values: Vec<f64>,
}

impl SortedDistribution {
    /// Sort `values` ascending and take ownership of them.
    pub fn new(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        Self { values }
    }

    /// Wrap values that are already ascending. Returns `None` otherwise.
    pub fn from_sorted(values: Vec<f64>) -> Option<Self> {
        if is_ascending(&values) {
            Some(Self { values })
        } else {
            None
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of every reading.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Partition into ten count-based segments and sum each one.
    pub fn deciles(&self) -> DecileVector {
        compute_deciles(&self.values)
    }
}

impl From<Vec<f64>> for SortedDistribution {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

pub(crate) fn is_ascending(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0].total_cmp(&w[1]).is_le())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sorts_ascending() {
        let d = SortedDistribution::new(vec![3.0, 1.0, 2.0, 1.0]);
        assert_eq!(d.values(), &[1.0, 1.0, 2.0, 3.0]);
        assert_eq!(d.len(), 4);
        assert!(!d.is_empty());
    }

    #[test]
    fn from_sorted_rejects_descending() {
        assert!(SortedDistribution::from_sorted(vec![1.0, 2.0, 2.0]).is_some());
        assert!(SortedDistribution::from_sorted(vec![2.0, 1.0]).is_none());
        assert!(SortedDistribution::from_sorted(vec![]).is_some());
    }

    #[test]
    fn negative_and_fractional_values_sort() {
        let d = SortedDistribution::new(vec![0.5, -2.25, 10.0, -0.0, 0.0]);
        assert_eq!(d.values()[0], -2.25);
        assert_eq!(*d.values().last().unwrap(), 10.0);
        assert!((d.total() - 8.25).abs() < 1e-12);
    }

    #[test]
    fn deciles_conserve_total() {
        let d = SortedDistribution::new((1..=37).map(f64::from).collect());
        assert_eq!(d.deciles().total(), d.total());
    }
}
