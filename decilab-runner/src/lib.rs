//! DecileLab Runner — loading, configuration, orchestration and export.
//!
//! This crate builds on `decilab-core` to provide:
//! - CSV loaders with schema validation at the boundary
//! - TOML analysis configuration
//! - Decile and cross-run averaging runs producing reports
//! - CSV / JSON / Markdown export and artifact bundles
//! - Synthetic FASTA sequence generation for benchmark inputs

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod synthetic;

pub use config::{
    AnalysisConfig, AveragingSettings, ConfigError, DecileSettings, LongFormatSource,
    OutputSettings,
};
pub use data_loader::{
    load_column, load_decile_table, load_long_format, load_methods, load_result_table,
    LoadError, MethodSource, MethodValues, ResultSchema, DEFAULT_VALUE_COLUMN,
};
pub use export::{
    averaged_markdown, averaged_to_csv, comparison_to_csv, decile_markdown, export_json,
    import_json, load_artifacts, save_artifacts, save_averaged,
};
pub use runner::{
    build_report, report_from_table, run_analysis, run_averaging, run_deciles, AnalysisOutcome,
    DecileReport, MethodSummary, SCHEMA_VERSION,
};
pub use synthetic::{generate_sequences, save_fasta, write_fasta, FastaRecord};
