//! Serializable analysis configuration.
//!
//! An analysis is described by a TOML file:
//!
//! ```toml
//! [deciles]
//! value_column = "SuffixCount"
//! methods = [
//!     { name = "Identity", path = "identity_data.csv" },
//!     { name = "Random", path = "random_data.csv" },
//! ]
//!
//! [averaging]
//! left = "benchmark_results.csv"
//! right = "benchmark_hash_results.csv"
//! left_suffix = "_benchmark"
//! right_suffix = "_hash"
//!
//! [output]
//! dir = "results"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_loader::{MethodSource, ResultSchema, DEFAULT_VALUE_COLUMN};

/// Errors from reading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration: which analyses to run and where results go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub deciles: Option<DecileSettings>,

    #[serde(default)]
    pub averaging: Option<AveragingSettings>,

    #[serde(default)]
    pub output: OutputSettings,
}

impl AnalysisConfig {
    /// Read, parse and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(format!("serialize config: {e}")))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deciles.is_none() && self.averaging.is_none() {
            return Err(ConfigError::Invalid(
                "config must contain a [deciles] or [averaging] section".into(),
            ));
        }
        if let Some(d) = &self.deciles {
            d.validate()?;
        }
        if let Some(a) = &self.averaging {
            a.validate()?;
        }
        Ok(())
    }
}

/// Where the decile analysis reads its populations from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecileSettings {
    /// One file per method.
    #[serde(default)]
    pub methods: Vec<MethodSource>,

    /// A single file with rows tagged by method. Mutually exclusive with `methods`.
    #[serde(default)]
    pub long_format: Option<LongFormatSource>,

    /// Numeric column read from per-method files.
    #[serde(default = "default_value_column")]
    pub value_column: String,

    /// Aggregate methods in parallel.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl DecileSettings {
    pub fn from_methods(methods: Vec<MethodSource>) -> Self {
        Self {
            methods,
            long_format: None,
            value_column: default_value_column(),
            parallel: true,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.methods.is_empty(), &self.long_format) {
            (true, None) => {
                return Err(ConfigError::Invalid(
                    "[deciles] needs `methods` or `long_format`".into(),
                ))
            }
            (false, Some(_)) => {
                return Err(ConfigError::Invalid(
                    "[deciles] `methods` and `long_format` are mutually exclusive".into(),
                ))
            }
            _ => {}
        }

        let mut seen = HashSet::new();
        for m in &self.methods {
            if m.name.trim().is_empty() {
                return Err(ConfigError::Invalid("method name must not be empty".into()));
            }
            if !seen.insert(m.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate method name '{}'",
                    m.name
                )));
            }
        }
        Ok(())
    }
}

/// A long-format file and the columns naming the method and the reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongFormatSource {
    pub path: PathBuf,
    #[serde(default = "default_method_column")]
    pub method_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
}

/// Inputs of the cross-run averaging step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragingSettings {
    pub left: PathBuf,
    pub right: PathBuf,

    #[serde(default = "default_left_suffix")]
    pub left_suffix: String,

    #[serde(default = "default_right_suffix")]
    pub right_suffix: String,

    #[serde(flatten)]
    pub schema: ResultSchema,
}

impl AveragingSettings {
    pub fn new(left: impl Into<PathBuf>, right: impl Into<PathBuf>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            left_suffix: default_left_suffix(),
            right_suffix: default_right_suffix(),
            schema: ResultSchema::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema.fields.is_empty() {
            return Err(ConfigError::Invalid("[averaging] `fields` must not be empty".into()));
        }
        if self.left_suffix == self.right_suffix {
            return Err(ConfigError::Invalid(
                "[averaging] left and right suffixes must differ".into(),
            ));
        }
        Ok(())
    }
}

/// Output location for exported artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_value_column() -> String {
    DEFAULT_VALUE_COLUMN.into()
}

fn default_method_column() -> String {
    "Method".into()
}

fn default_true() -> bool {
    true
}

fn default_left_suffix() -> String {
    "_a".into()
}

fn default_right_suffix() -> String {
    "_b".into()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}
