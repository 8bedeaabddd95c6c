//! CSV loading for the analysis runner.
//!
//! Every loader validates its input once, here at the boundary: a missing
//! column, a blank cell, or a value that is not a finite number is reported as
//! [`LoadError::Schema`] with the file and line. The core never re-validates.
//!
//! Supported layouts:
//! 1. One file per method with a numeric column (default `SuffixCount`)
//! 2. One long-format file whose rows are tagged with their method
//! 3. A precomputed decile table (`Method,Decile1..Decile10`)
//! 4. Keyed benchmark result tables (`Dataset,KSize,...,ExecutionTime(ms),Variance`)

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use decilab_core::{ComparisonTable, DecileVector, KeyedResultRow, DECILE_COUNT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-method readings in load order.
pub type MethodValues = Vec<(String, Vec<f64>)>;

/// Column read from per-method files when none is configured.
pub const DEFAULT_VALUE_COLUMN: &str = "SuffixCount";

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("schema error in {} line {line}: {message}", .path.display())]
    Schema {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

/// A method name and the file holding its readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSource {
    pub name: String,
    pub path: PathBuf,
}

impl MethodSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Column names of a keyed result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSchema {
    #[serde(default = "default_dataset_column")]
    pub dataset_column: String,
    #[serde(default = "default_size_column")]
    pub size_column: String,
    /// Numeric columns carried into each row, in this order.
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
}

impl Default for ResultSchema {
    fn default() -> Self {
        Self {
            dataset_column: default_dataset_column(),
            size_column: default_size_column(),
            fields: default_fields(),
        }
    }
}

fn default_dataset_column() -> String {
    "Dataset".into()
}

fn default_size_column() -> String {
    "KSize".into()
}

fn default_fields() -> Vec<String> {
    vec!["ExecutionTime(ms)".into(), "Variance".into()]
}

// ─── Per-method files ───────────────────────────────────────────────

/// Read one numeric column from a headered CSV file.
pub fn load_column(path: &Path, column: &str) -> Result<Vec<f64>, LoadError> {
    let mut rdr = open_csv(path)?;
    let idx = column_index(&mut rdr, path, column)?;

    let mut values = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        values.push(parse_number(path, &record, idx, column)?);
    }
    Ok(values)
}

/// Load every method's readings, one file per method.
pub fn load_methods(sources: &[MethodSource], column: &str) -> Result<MethodValues, LoadError> {
    let mut out = Vec::with_capacity(sources.len());
    for src in sources {
        let values = load_column(&src.path, column)?;
        log::info!(
            "loaded {} readings for '{}' from {}",
            values.len(),
            src.name,
            src.path.display()
        );
        out.push((src.name.clone(), values));
    }
    Ok(out)
}

/// Load a single file whose rows are tagged with their method.
///
/// Methods are returned in order of first appearance.
pub fn load_long_format(
    path: &Path,
    method_column: &str,
    value_column: &str,
) -> Result<MethodValues, LoadError> {
    let mut rdr = open_csv(path)?;
    let method_idx = column_index(&mut rdr, path, method_column)?;
    let value_idx = column_index(&mut rdr, path, value_column)?;

    let mut out: MethodValues = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for record in rdr.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        let method = text_field(path, &record, method_idx, method_column)?;
        let value = parse_number(path, &record, value_idx, value_column)?;

        let slot = match slots.get(method) {
            Some(&slot) => slot,
            None => {
                slots.insert(method.to_string(), out.len());
                out.push((method.to_string(), Vec::new()));
                out.len() - 1
            }
        };
        out[slot].1.push(value);
    }

    log::info!(
        "loaded {} methods from long-format file {}",
        out.len(),
        path.display()
    );
    Ok(out)
}

// ─── Decile tables ──────────────────────────────────────────────────

/// Load a precomputed decile table with columns `Method,Decile1..Decile10`.
pub fn load_decile_table(path: &Path) -> Result<ComparisonTable, LoadError> {
    let mut rdr = open_csv(path)?;
    let method_idx = column_index(&mut rdr, path, "Method")?;
    let mut decile_idx = [0usize; DECILE_COUNT];
    for (d, idx) in decile_idx.iter_mut().enumerate() {
        *idx = column_index(&mut rdr, path, &decile_header(d))?;
    }

    let mut table = ComparisonTable::new();
    for record in rdr.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        let method = text_field(path, &record, method_idx, "Method")?;
        let mut sums = [0.0; DECILE_COUNT];
        for (d, sum) in sums.iter_mut().enumerate() {
            *sum = parse_number(path, &record, decile_idx[d], &decile_header(d))?;
        }
        if table.insert(method, DecileVector::from_sums(sums)).is_some() {
            log::warn!(
                "duplicate method '{method}' in {}; keeping the last row",
                path.display()
            );
        }
    }
    Ok(table)
}

/// Header of the `d`-th (zero-based) decile column: `Decile1`..`Decile10`.
pub fn decile_header(d: usize) -> String {
    format!("Decile{}", d + 1)
}

// ─── Result tables ──────────────────────────────────────────────────

/// Load a keyed benchmark result table.
///
/// Columns not named by `schema` (such as an execution type label) are
/// ignored.
pub fn load_result_table(
    path: &Path,
    schema: &ResultSchema,
) -> Result<Vec<KeyedResultRow>, LoadError> {
    let mut rdr = open_csv(path)?;
    let dataset_idx = column_index(&mut rdr, path, &schema.dataset_column)?;
    let size_idx = column_index(&mut rdr, path, &schema.size_column)?;
    let field_idx = schema
        .fields
        .iter()
        .map(|f| column_index(&mut rdr, path, f))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        let dataset = text_field(path, &record, dataset_idx, &schema.dataset_column)?;
        let size = parse_integer(path, &record, size_idx, &schema.size_column)?;

        let mut row = KeyedResultRow::new(dataset, size);
        for (name, &idx) in schema.fields.iter().zip(&field_idx) {
            row = row.with_field(name.clone(), parse_number(path, &record, idx, name)?);
        }
        rows.push(row);
    }

    log::info!("loaded {} result rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ─── Helpers ────────────────────────────────────────────────────────

fn open_csv(path: &Path) -> Result<csv::Reader<File>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn column_index(
    rdr: &mut csv::Reader<File>,
    path: &Path,
    column: &str,
) -> Result<usize, LoadError> {
    let headers = rdr.headers().map_err(|source| csv_error(path, source))?;
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| LoadError::Schema {
            path: path.to_path_buf(),
            line: 1,
            message: format!("missing column '{column}'"),
        })
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn schema_error(path: &Path, record: &csv::StringRecord, message: String) -> LoadError {
    LoadError::Schema {
        path: path.to_path_buf(),
        line: line_of(record),
        message,
    }
}

fn csv_error(path: &Path, source: csv::Error) -> LoadError {
    LoadError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn text_field<'r>(
    path: &Path,
    record: &'r csv::StringRecord,
    idx: usize,
    column: &str,
) -> Result<&'r str, LoadError> {
    match record.get(idx) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(schema_error(path, record, format!("missing value in '{column}'"))),
    }
}

fn parse_number(
    path: &Path,
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
) -> Result<f64, LoadError> {
    let raw = text_field(path, record, idx, column)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(schema_error(
            path,
            record,
            format!("non-finite value '{raw}' in '{column}'"),
        )),
        Err(_) => Err(schema_error(
            path,
            record,
            format!("non-numeric value '{raw}' in '{column}'"),
        )),
    }
}

fn parse_integer(
    path: &Path,
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
) -> Result<i64, LoadError> {
    let raw = text_field(path, record, idx, column)?;
    raw.parse::<i64>().map_err(|_| {
        schema_error(path, record, format!("non-integer value '{raw}' in '{column}'"))
    })
}
