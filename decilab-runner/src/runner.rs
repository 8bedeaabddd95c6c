//! Analysis orchestration: load inputs, run the core, assemble reports.
//!
//! Every computation finishes before anything is returned, so a failure never
//! leaves a partially built report behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use decilab_core::{
    AnalysisError, AveragedResultTable, ComparisonTable, CrossRunAverager, MethodComparator,
    SummaryStats,
};

use crate::config::{AnalysisConfig, AveragingSettings, DecileSettings};
use crate::data_loader::{load_long_format, load_methods, load_result_table, MethodValues};
use crate::export::{save_artifacts, save_averaged};

/// Current schema version of persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Per-method line of a decile report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSummary {
    pub method: String,
    /// Number of readings aggregated; `None` when the table was loaded
    /// precomputed.
    pub records: Option<usize>,
    pub stats: SummaryStats,
}

/// Result of a decile analysis: the comparison table and its derived stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecileReport {
    pub schema_version: u32,
    pub generated_at: NaiveDateTime,
    /// BLAKE3 over method names and readings, in load order.
    pub input_hash: String,
    pub table: ComparisonTable,
    pub summaries: Vec<MethodSummary>,
}

impl DecileReport {
    pub fn summary(&self, method: &str) -> Option<&MethodSummary> {
        self.summaries.iter().find(|s| s.method == method)
    }
}

/// Load the configured populations and build a [`DecileReport`].
pub fn run_deciles(settings: &DecileSettings) -> Result<DecileReport> {
    let values = match &settings.long_format {
        Some(src) => load_long_format(&src.path, &src.method_column, &src.value_column)
            .with_context(|| format!("loading {}", src.path.display()))?,
        None => load_methods(&settings.methods, &settings.value_column)
            .context("loading per-method files")?,
    };
    let report = build_report(values, settings.parallel)?;
    log::info!(
        "decile analysis complete: {} methods, input hash {}",
        report.table.len(),
        &report.input_hash[..12]
    );
    Ok(report)
}

/// Aggregate already-loaded populations into a report.
pub fn build_report(values: MethodValues, parallel: bool) -> Result<DecileReport, AnalysisError> {
    let input_hash = compute_input_hash(&values);
    let counts: Vec<(String, usize)> = values
        .iter()
        .map(|(name, v)| (name.clone(), v.len()))
        .collect();

    for (name, n) in &counts {
        if *n == 0 {
            log::warn!("method '{name}' has no readings; its deciles are all zero");
        }
    }

    let table = MethodComparator::new()
        .with_parallelism(parallel)
        .build(values)?;

    // Duplicate names collapse in the table; the last population wins there,
    // so the last count wins here too.
    let summaries = table
        .summaries()
        .into_iter()
        .map(|(method, stats)| MethodSummary {
            method: method.to_string(),
            records: counts
                .iter()
                .rev()
                .find(|(name, _)| name == method)
                .map(|(_, n)| *n),
            stats,
        })
        .collect();

    Ok(DecileReport {
        schema_version: SCHEMA_VERSION,
        generated_at: chrono::Local::now().naive_local(),
        input_hash,
        table,
        summaries,
    })
}

/// Wrap a precomputed comparison table in a report.
pub fn report_from_table(table: ComparisonTable) -> Result<DecileReport, AnalysisError> {
    if table.is_empty() {
        return Err(AnalysisError::EmptyInput {
            what: "decile table has no methods".into(),
        });
    }

    let mut hasher = blake3::Hasher::new();
    for entry in &table {
        hasher.update(entry.method.as_bytes());
        for sum in entry.deciles.iter() {
            hasher.update(&sum.to_le_bytes());
        }
    }

    let summaries = table
        .summaries()
        .into_iter()
        .map(|(method, stats)| MethodSummary {
            method: method.to_string(),
            records: None,
            stats,
        })
        .collect();

    Ok(DecileReport {
        schema_version: SCHEMA_VERSION,
        generated_at: chrono::Local::now().naive_local(),
        input_hash: hasher.finalize().to_hex().to_string(),
        table,
        summaries,
    })
}

/// Load both result tables and average them per size.
pub fn run_averaging(settings: &AveragingSettings) -> Result<AveragedResultTable> {
    let left = load_result_table(&settings.left, &settings.schema)
        .with_context(|| format!("loading {}", settings.left.display()))?;
    let right = load_result_table(&settings.right, &settings.schema)
        .with_context(|| format!("loading {}", settings.right.display()))?;

    let averaged = CrossRunAverager::with_suffixes(&settings.left_suffix, &settings.right_suffix)
        .merge(&left, &right)
        .with_context(|| {
            format!(
                "averaging {} with {}",
                settings.left.display(),
                settings.right.display()
            )
        })?;

    log::info!(
        "averaged {} + {} rows into {} size groups",
        left.len(),
        right.len(),
        averaged.len()
    );
    Ok(averaged)
}

/// Everything one config run produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub deciles: Option<DecileReport>,
    pub averaged: Option<AveragedResultTable>,
    /// Artifact directories written, deciles first.
    pub artifacts: Vec<PathBuf>,
}

/// Run every analysis section of `config`, then export the results.
///
/// Exports start only after all sections have been computed, so a failing
/// section leaves nothing on disk. `output_dir` of `None` skips export.
pub fn run_analysis(config: &AnalysisConfig, output_dir: Option<&Path>) -> Result<AnalysisOutcome> {
    let deciles = config.deciles.as_ref().map(run_deciles).transpose()?;
    let averaged = config.averaging.as_ref().map(run_averaging).transpose()?;

    let mut artifacts = Vec::new();
    if let Some(dir) = output_dir {
        if let Some(report) = &deciles {
            artifacts.push(save_artifacts(report, dir)?);
        }
        if let (Some(table), Some(settings)) = (&averaged, &config.averaging) {
            artifacts.push(save_averaged(table, &settings.schema.size_column, dir)?);
        }
    }

    Ok(AnalysisOutcome {
        deciles,
        averaged,
        artifacts,
    })
}

/// Deterministic BLAKE3 hash over method names and readings in load order.
fn compute_input_hash(values: &MethodValues) -> String {
    let mut hasher = blake3::Hasher::new();
    for (name, readings) in values {
        hasher.update(name.as_bytes());
        hasher.update(&(readings.len() as u64).to_le_bytes());
        for v in readings {
            hasher.update(&v.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
