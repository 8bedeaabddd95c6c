//! Reporting and export: CSV, JSON, and Markdown artifact generation.
//!
//! Provides three export formats for analysis results:
//! - **CSV**: the comparison table as `Method,Decile1..Decile10` (the layout
//!   [`crate::data_loader::load_decile_table`] reads back) and averaged tables
//! - **JSON**: full report serialization with schema versioning
//! - **Markdown**: human-readable decile and averaging reports
//!
//! Persisted reports include a `schema_version` field. Newer versions are
//! rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use decilab_core::{AveragedResultTable, ComparisonTable, DECILE_COUNT};

use crate::data_loader::decile_header;
use crate::runner::{DecileReport, SCHEMA_VERSION};

// ─── CSV export ─────────────────────────────────────────────────────

/// Export a comparison table as CSV, one row per method.
pub fn comparison_to_csv(table: &ComparisonTable) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = Vec::with_capacity(DECILE_COUNT + 1);
    header.push("Method".to_string());
    header.extend((0..DECILE_COUNT).map(decile_header));
    wtr.write_record(&header)?;

    for entry in table {
        let mut record = Vec::with_capacity(DECILE_COUNT + 1);
        record.push(entry.method.clone());
        record.extend(entry.deciles.iter().map(|s| s.to_string()));
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export an averaged table as CSV: the size column, then every field.
///
/// A field absent from a group is written as an empty cell.
pub fn averaged_to_csv(table: &AveragedResultTable, size_column: &str) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec![size_column.to_string()];
    header.extend(table.columns().iter().cloned());
    wtr.write_record(&header)?;

    for row in table.rows() {
        let mut record = vec![row.size.to_string()];
        record.extend(
            table
                .columns()
                .iter()
                .map(|c| row.field(c).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `DecileReport` to pretty JSON.
pub fn export_json(report: &DecileReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize DecileReport to JSON")
}

/// Deserialize a `DecileReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<DecileReport> {
    let report: DecileReport =
        serde_json::from_str(json).context("failed to deserialize DecileReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── Markdown reports ───────────────────────────────────────────────

/// Generate a Markdown report for a decile analysis.
pub fn decile_markdown(report: &DecileReport) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str("# Decile Report\n\n");

    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Generated | {} |\n", report.generated_at.format("%Y-%m-%d %H:%M:%S")));
    md.push_str(&format!("| Methods | {} |\n", report.table.len()));
    md.push_str(&format!("| Input Hash | {} |\n", report.input_hash));
    md.push('\n');

    // Decile sums, one column per method
    md.push_str("## Sum per Decile\n\n");
    md.push_str("| Decile |");
    for method in report.table.methods() {
        md.push_str(&format!(" {method} |"));
    }
    md.push('\n');
    md.push_str("| --- |");
    for _ in report.table.methods() {
        md.push_str(" ---: |");
    }
    md.push('\n');
    for d in 0..DECILE_COUNT {
        md.push_str(&format!("| {}-{}% |", d * 10, (d + 1) * 10));
        for sum in report.table.decile_column(d) {
            md.push_str(&format!(" {} |", format_number(sum)));
        }
        md.push('\n');
    }
    md.push('\n');

    // Share of the total carried by the top decile reads as a skew indicator
    md.push_str("## Summary\n\n");
    md.push_str("| Method | Records | Minimum | Maximum | Mean | Median | Top Decile Share |\n");
    md.push_str("| --- | ---: | ---: | ---: | ---: | ---: | ---: |\n");
    for s in &report.summaries {
        let top_share = report
            .table
            .get(&s.method)
            .map(|dv| dv.shares()[DECILE_COUNT - 1])
            .unwrap_or(0.0);
        md.push_str(&format!(
            "| {} | {} | {} | {} | {:.2} | {} | {:.1}% |\n",
            s.method,
            s.records.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
            format_number(s.stats.min),
            format_number(s.stats.max),
            s.stats.mean,
            format_number(s.stats.median),
            top_share * 100.0
        ));
    }
    md.push('\n');

    md
}

/// Generate a Markdown table of an averaged result table.
pub fn averaged_markdown(table: &AveragedResultTable, size_column: &str) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str("# Averaged Results\n\n");
    md.push_str(&format!("| {size_column} | Rows |"));
    for c in table.columns() {
        md.push_str(&format!(" {c} |"));
    }
    md.push('\n');
    md.push_str("| ---: | ---: |");
    for _ in table.columns() {
        md.push_str(" ---: |");
    }
    md.push('\n');

    for row in table.rows() {
        md.push_str(&format!("| {} | {} |", row.size, row.joined_rows));
        for c in table.columns() {
            match row.field(c) {
                Some(v) => md.push_str(&format!(" {v:.4} |")),
                None => md.push_str(" - |"),
            }
        }
        md.push('\n');
    }
    md.push('\n');

    md
}

/// Integers print without a fractional part; everything else with two decimals.
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a decile analysis.
///
/// Creates a directory named `deciles_{timestamp}/` under `output_dir`
/// containing:
/// - `deciles.csv`: the comparison table
/// - `report.json`: the full `DecileReport`
/// - `report.md`: the Markdown report
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &DecileReport, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(format!(
        "deciles_{}",
        report.generated_at.format("%Y%m%d_%H%M%S")
    ));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("deciles.csv"), comparison_to_csv(&report.table)?)?;
    std::fs::write(run_dir.join("report.json"), export_json(report)?)?;
    std::fs::write(run_dir.join("report.md"), decile_markdown(report))?;

    log::info!("artifacts written to {}", run_dir.display());
    Ok(run_dir)
}

/// Save an averaged table as `averaged.csv` and `averaged.md` under
/// `averaged_{timestamp}/`.
pub fn save_averaged(
    table: &AveragedResultTable,
    size_column: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let run_dir = output_dir.join(format!(
        "averaged_{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("averaged.csv"), averaged_to_csv(table, size_column)?)?;
    std::fs::write(run_dir.join("averaged.md"), averaged_markdown(table, size_column))?;

    log::info!("artifacts written to {}", run_dir.display());
    Ok(run_dir)
}

/// Load a `DecileReport` from an artifact directory's report.json.
pub fn load_artifacts(dir: &Path) -> Result<DecileReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
