//! Cross-run averaging of keyed benchmark results.
//!
//! Two result tables keyed by (dataset, size) are inner-joined, every joined
//! row is widened with the fields of both sides, and the joined rows are then
//! grouped by size alone. Dataset identity does not survive the grouping.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// One benchmark measurement row keyed by (dataset, size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedResultRow {
    pub dataset: String,
    pub size: i64,
    /// Named numeric fields in column order, e.g. execution time and variance.
    pub fields: Vec<(String, f64)>,
}

impl KeyedResultRow {
    pub fn new(dataset: impl Into<String>, size: i64) -> Self {
        Self {
            dataset: dataset.into(),
            size,
            fields: Vec::new(),
        }
    }

    /// Append a named field (builder style).
    pub fn with_field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn field(&self, name: &str) -> Option<f64> {
        lookup(&self.fields, name)
    }

    fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }
}

/// Mean of every field across the joined rows sharing one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedRow {
    pub size: i64,
    /// Number of joined rows that fell into this group.
    pub joined_rows: usize,
    pub fields: Vec<(String, f64)>,
}

impl AveragedRow {
    pub fn field(&self, name: &str) -> Option<f64> {
        lookup(&self.fields, name)
    }
}

/// Averaged rows in ascending size order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedResultTable {
    columns: Vec<String>,
    rows: Vec<AveragedRow>,
}

impl AveragedResultTable {
    /// Field names in output order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[AveragedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, size: i64) -> Option<&AveragedRow> {
        self.rows.iter().find(|r| r.size == size)
    }
}

/// Joins two result tables and averages them per size.
///
/// A field name carried by both sides of a joined pair is disambiguated with
/// the side's suffix; a name carried by one side only is kept unchanged.
#[derive(Debug, Clone)]
pub struct CrossRunAverager {
    left_suffix: String,
    right_suffix: String,
}

impl Default for CrossRunAverager {
    fn default() -> Self {
        Self::with_suffixes("_a", "_b")
    }
}

impl CrossRunAverager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suffixes(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left_suffix: left.into(),
            right_suffix: right.into(),
        }
    }

    /// Inner-join `left` and `right` on (dataset, size), then average every
    /// field per size.
    ///
    /// A key repeated within a table pairs with every matching row of the
    /// other table. Rows whose key is missing from the other table are
    /// dropped.
    pub fn merge(
        &self,
        left: &[KeyedResultRow],
        right: &[KeyedResultRow],
    ) -> Result<AveragedResultTable, AnalysisError> {
        if left.is_empty() {
            return Err(AnalysisError::empty("left result table has no rows"));
        }
        if right.is_empty() {
            return Err(AnalysisError::empty("right result table has no rows"));
        }

        let mut right_index: HashMap<(&str, i64), Vec<&KeyedResultRow>> = HashMap::new();
        for row in right {
            right_index
                .entry((row.dataset.as_str(), row.size))
                .or_default()
                .push(row);
        }

        let mut columns: Vec<String> = Vec::new();
        let mut groups: BTreeMap<i64, Group> = BTreeMap::new();
        let mut joined = 0usize;

        for l in left {
            let Some(matches) = right_index.get(&(l.dataset.as_str(), l.size)) else {
                continue;
            };
            for r in matches {
                let wide = self.widen(l, r);
                let group = groups.entry(l.size).or_default();
                group.rows += 1;
                for (name, value) in wide {
                    if !columns.contains(&name) {
                        columns.push(name.clone());
                    }
                    let acc = group.sums.entry(name).or_insert((0.0, 0));
                    acc.0 += value;
                    acc.1 += 1;
                }
                joined += 1;
            }
        }

        if joined == 0 {
            return Err(AnalysisError::NoMatchingKeys {
                left_rows: left.len(),
                right_rows: right.len(),
            });
        }

        let rows = groups
            .into_iter()
            .map(|(size, group)| AveragedRow {
                size,
                joined_rows: group.rows,
                fields: columns
                    .iter()
                    .filter_map(|name| {
                        group
                            .sums
                            .get(name)
                            .map(|&(sum, count)| (name.clone(), sum / count as f64))
                    })
                    .collect(),
            })
            .collect();

        Ok(AveragedResultTable { columns, rows })
    }

    fn widen(&self, left: &KeyedResultRow, right: &KeyedResultRow) -> Vec<(String, f64)> {
        let mut wide = Vec::with_capacity(left.fields.len() + right.fields.len());
        for (name, value) in &left.fields {
            let name = if right.has_field(name) {
                format!("{name}{}", self.left_suffix)
            } else {
                name.clone()
            };
            wide.push((name, *value));
        }
        for (name, value) in &right.fields {
            let name = if left.has_field(name) {
                format!("{name}{}", self.right_suffix)
            } else {
                name.clone()
            };
            wide.push((name, *value));
        }
        wide
    }
}

/// [`CrossRunAverager::merge`] with the default `_a` / `_b` suffixes.
pub fn merge(
    left: &[KeyedResultRow],
    right: &[KeyedResultRow],
) -> Result<AveragedResultTable, AnalysisError> {
    CrossRunAverager::default().merge(left, right)
}

#[derive(Debug, Default)]
struct Group {
    rows: usize,
    sums: HashMap<String, (f64, usize)>,
}

fn lookup(fields: &[(String, f64)], name: &str) -> Option<f64> {
    fields.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
}
