//! Count-based decile aggregation.
//!
//! A sorted population of N readings is cut into ten contiguous segments by
//! position, not by value: segment `d` covers `[floor(d*N/10), floor((d+1)*N/10))`.
//! The boundaries are computed in integer arithmetic so they are exact for
//! every N. A run of equal readings may therefore straddle two segments.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::distribution::is_ascending;

/// Number of segments a population is cut into.
pub const DECILE_COUNT: usize = 10;

/// The ten per-segment sums of one population.
///
/// Invariant: the entries add up to the sum of the population they were
/// computed from (no reading is dropped or counted twice).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecileVector {
    sums: [f64; DECILE_COUNT],
}

impl DecileVector {
    pub fn from_sums(sums: [f64; DECILE_COUNT]) -> Self {
        Self { sums }
    }

    /// All-zero vector, the result for an empty population.
    pub fn zeros() -> Self {
        Self {
            sums: [0.0; DECILE_COUNT],
        }
    }

    pub fn sums(&self) -> &[f64; DECILE_COUNT] {
        &self.sums
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.sums.iter().copied()
    }

    pub fn total(&self) -> f64 {
        self.sums.iter().sum()
    }

    /// Fraction of the total carried by each decile.
    ///
    /// All zeros when the total is zero.
    pub fn shares(&self) -> [f64; DECILE_COUNT] {
        let total = self.total();
        if total == 0.0 {
            return [0.0; DECILE_COUNT];
        }
        self.sums.map(|s| s / total)
    }
}

impl Index<usize> for DecileVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.sums[index]
    }
}

impl From<[f64; DECILE_COUNT]> for DecileVector {
    fn from(sums: [f64; DECILE_COUNT]) -> Self {
        Self::from_sums(sums)
    }
}

/// Half-open `(start, end)` index ranges of the ten segments of `n` readings.
///
/// Ranges are contiguous: `end(d) == start(d + 1)`, `start(0) == 0` and
/// `end(9) == n`.
pub fn decile_bounds(n: usize) -> [(usize, usize); DECILE_COUNT] {
    let mut bounds = [(0, 0); DECILE_COUNT];
    for (d, bound) in bounds.iter_mut().enumerate() {
        *bound = (boundary(d, n), boundary(d + 1, n));
    }
    bounds
}

/// `floor(d * n / 10)` without going through floating point.
///
/// Splits `n` into quotient and remainder first so large populations cannot
/// overflow the multiplication.
fn boundary(d: usize, n: usize) -> usize {
    let (q, r) = (n / DECILE_COUNT, n % DECILE_COUNT);
    d * q + d * r / DECILE_COUNT
}

/// Sum each of the ten count-based segments of an ascending slice.
///
/// The caller must pass sorted input; this is checked in debug builds only.
/// An empty slice yields ten zeros, and fewer than ten readings leave some
/// segments empty (sum 0) while the others hold exactly one reading.
pub fn compute_deciles(values: &[f64]) -> DecileVector {
    debug_assert!(is_ascending(values), "compute_deciles requires ascending input");

    let mut sums = [0.0; DECILE_COUNT];
    for (sum, (start, end)) in sums.iter_mut().zip(decile_bounds(values.len())) {
        *sum = values[start..end].iter().sum();
    }
    DecileVector { sums }
}
