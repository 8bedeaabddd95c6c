//! DecileLab Core — decile aggregation and cross-method comparison engine.
//!
//! This crate contains the pure numeric heart of the analysis:
//! - Sorted per-method populations ([`SortedDistribution`])
//! - Count-based decile aggregation ([`compute_deciles`])
//! - Per-method comparison tables and summary statistics ([`MethodComparator`])
//! - Inner-join-and-average of two keyed result tables ([`CrossRunAverager`])
//!
//! Nothing here performs I/O. Loading, exporting and reporting live in
//! `decilab-runner`.

pub mod averager;
pub mod comparator;
pub mod deciles;
pub mod distribution;
pub mod error;

pub use averager::{merge, AveragedResultTable, AveragedRow, CrossRunAverager, KeyedResultRow};
pub use comparator::{summary_stats, ComparisonTable, MethodComparator, MethodDeciles, SummaryStats};
pub use deciles::{compute_deciles, decile_bounds, DecileVector, DECILE_COUNT};
pub use distribution::SortedDistribution;
pub use error::AnalysisError;
