//! DecileLab CLI: decile comparison, averaging and synthetic input commands.
//!
//! Commands:
//! - `deciles`: compare per-method distributions from CSV files or a TOML config
//! - `long`: same comparison from a single long-format CSV
//! - `stats`: summary statistics of a precomputed decile table
//! - `average`: join two benchmark result tables and average per size
//! - `fasta`: write random ACGT sequences for benchmark inputs

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use decilab_runner::{
    averaged_markdown, averaged_to_csv, decile_markdown, generate_sequences, load_decile_table,
    report_from_table, run_analysis, run_averaging, run_deciles, save_artifacts, save_averaged,
    save_fasta, AnalysisConfig, AveragingSettings, DecileReport, DecileSettings,
    LongFormatSource, MethodSource, OutputSettings, ResultSchema, DEFAULT_VALUE_COLUMN,
};

#[derive(Parser)]
#[command(
    name = "decilab",
    about = "DecileLab CLI: compare how methods distribute a per-record metric"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare per-method distributions, one CSV file per method.
    Deciles {
        /// Method and file as NAME=PATH (repeatable).
        #[arg(long = "method", value_name = "NAME=PATH")]
        methods: Vec<String>,

        /// Path to a TOML config file (replaces --method).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Numeric column holding the metric [default: SuffixCount].
        /// Overrides the config's column when given.
        #[arg(long)]
        column: Option<String>,

        /// Aggregate methods sequentially.
        #[arg(long, default_value_t = false)]
        no_parallel: bool,

        /// Output directory for artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the report without writing artifacts.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Compare distributions from one long-format CSV tagged by method.
    Long {
        /// Input CSV file.
        #[arg(long)]
        input: PathBuf,

        /// Column naming the method of each row.
        #[arg(long, default_value = "Method")]
        method_column: String,

        /// Numeric column holding the metric.
        #[arg(long, default_value = DEFAULT_VALUE_COLUMN)]
        value_column: String,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Print the report without writing artifacts.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Summary statistics of a precomputed decile table (Method,Decile1..Decile10).
    Stats {
        /// Decile table CSV.
        #[arg(long)]
        table: PathBuf,
    },
    /// Join two result tables on (dataset, size) and average per size.
    Average {
        /// First result table.
        #[arg(long)]
        left: PathBuf,

        /// Second result table.
        #[arg(long)]
        right: PathBuf,

        /// Suffix for fields of the first table.
        #[arg(long, default_value = "_a")]
        left_suffix: String,

        /// Suffix for fields of the second table.
        #[arg(long, default_value = "_b")]
        right_suffix: String,

        /// Numeric fields to average (comma separated).
        #[arg(long, value_delimiter = ',', default_values_t = ["ExecutionTime(ms)".to_string(), "Variance".to_string()])]
        fields: Vec<String>,

        /// Dataset identifier column.
        #[arg(long, default_value = "Dataset")]
        dataset_column: String,

        /// Size parameter column.
        #[arg(long, default_value = "KSize")]
        size_column: String,

        /// Print CSV instead of Markdown.
        #[arg(long, default_value_t = false)]
        csv: bool,

        /// Also write averaged.csv/averaged.md under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Write random ACGT sequences in FASTA format.
    Fasta {
        /// Number of sequences.
        #[arg(long, default_value_t = 5)]
        count: usize,

        /// Bases per sequence.
        #[arg(long, default_value_t = 50)]
        length: usize,

        /// Seed string; the same seed reproduces the same file.
        #[arg(long, default_value = "decilab")]
        seed: String,

        /// Output FASTA file.
        #[arg(long, default_value = "sequences.fasta")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    dispatch(cli.command)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .format_timestamp(None)
    .target(env_logger::Target::Stderr)
    .init();
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Deciles {
            methods,
            config,
            column,
            no_parallel,
            output_dir,
            dry_run,
        } => run_deciles_cmd(methods, config, column, no_parallel, output_dir, dry_run),
        Commands::Long {
            input,
            method_column,
            value_column,
            output_dir,
            dry_run,
        } => {
            let settings = DecileSettings {
                methods: Vec::new(),
                long_format: Some(LongFormatSource {
                    path: input,
                    method_column,
                    value_column,
                }),
                value_column: DEFAULT_VALUE_COLUMN.into(),
                parallel: true,
            };
            let report = run_deciles(&settings)?;
            finish_decile_report(&report, (!dry_run).then_some(output_dir))
        }
        Commands::Stats { table } => {
            let loaded = load_decile_table(&table)
                .with_context(|| format!("loading {}", table.display()))?;
            let report = report_from_table(loaded)?;
            print_summary(&report);
            Ok(())
        }
        Commands::Average {
            left,
            right,
            left_suffix,
            right_suffix,
            fields,
            dataset_column,
            size_column,
            csv,
            output_dir,
        } => {
            let settings = AveragingSettings {
                left,
                right,
                left_suffix,
                right_suffix,
                schema: ResultSchema {
                    dataset_column,
                    size_column,
                    fields,
                },
            };
            settings.validate()?;
            run_average_cmd(&settings, csv, output_dir)
        }
        Commands::Fasta {
            count,
            length,
            seed,
            output,
        } => {
            let records = generate_sequences(count, length, &seed);
            save_fasta(&records, &output)?;
            println!("Wrote {count} sequences of {length} bases to {}", output.display());
            Ok(())
        }
    }
}

fn run_deciles_cmd(
    methods: Vec<String>,
    config_path: Option<PathBuf>,
    column: Option<String>,
    no_parallel: bool,
    output_dir: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    if config_path.is_some() && !methods.is_empty() {
        bail!("--config and --method are mutually exclusive");
    }

    let mut config = match config_path {
        Some(path) => AnalysisConfig::from_file(&path)?,
        None => {
            if methods.is_empty() {
                bail!("one of --config or --method is required");
            }
            let sources = methods
                .iter()
                .map(|m| parse_method_arg(m))
                .collect::<Result<Vec<_>>>()?;
            AnalysisConfig {
                deciles: Some(DecileSettings::from_methods(sources)),
                averaging: None,
                output: OutputSettings::default(),
            }
        }
    };
    apply_decile_overrides(&mut config, column, no_parallel);
    config.validate()?;

    let out_dir = output_dir.unwrap_or_else(|| config.output.dir.clone());
    let outcome = run_analysis(&config, (!dry_run).then_some(out_dir.as_path()))?;

    if let Some(report) = &outcome.deciles {
        print_summary(report);
        log::debug!("{}", decile_markdown(report));
    }
    if let (Some(table), Some(settings)) = (&outcome.averaged, &config.averaging) {
        print!("{}", averaged_markdown(table, &settings.schema.size_column));
    }
    for dir in &outcome.artifacts {
        println!("Artifacts saved to: {}", dir.display());
    }
    Ok(())
}

/// Command-line flags win over the `[deciles]` section of a config.
fn apply_decile_overrides(config: &mut AnalysisConfig, column: Option<String>, no_parallel: bool) {
    let Some(settings) = config.deciles.as_mut() else {
        return;
    };
    if let Some(column) = column {
        match settings.long_format.as_mut() {
            Some(long) => long.value_column = column,
            None => settings.value_column = column,
        }
    }
    if no_parallel {
        settings.parallel = false;
    }
}

fn run_average_cmd(
    settings: &AveragingSettings,
    csv: bool,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let table = run_averaging(settings)?;
    let size_column = &settings.schema.size_column;

    if csv {
        print!("{}", averaged_to_csv(&table, size_column)?);
    } else {
        print!("{}", averaged_markdown(&table, size_column));
    }

    if let Some(dir) = output_dir {
        let run_dir = save_averaged(&table, size_column, &dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn finish_decile_report(report: &DecileReport, output_dir: Option<PathBuf>) -> Result<()> {
    print_summary(report);
    log::debug!("{}", decile_markdown(report));

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(report, &dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

/// Parse a `NAME=PATH` method argument.
fn parse_method_arg(arg: &str) -> Result<MethodSource> {
    match arg.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok(MethodSource::new(name, path))
        }
        _ => bail!("invalid --method '{arg}', expected NAME=PATH"),
    }
}

fn print_summary(report: &DecileReport) {
    println!();
    println!("=== Decile Comparison ===");
    print!("{:<12}", "Decile");
    for method in report.table.methods() {
        print!(" {:>12}", method);
    }
    println!();
    println!("{}", "-".repeat(12 + 13 * report.table.len()));
    for d in 0..decilab_core::DECILE_COUNT {
        print!("{:<12}", format!("{}-{}%", d * 10, (d + 1) * 10));
        for sum in report.table.decile_column(d) {
            print!(" {:>12}", sum);
        }
        println!();
    }

    for s in &report.summaries {
        println!();
        println!("Method: {}", s.method);
        if let Some(n) = s.records {
            println!("  Records: {n}");
        }
        println!("  Minimum: {}", s.stats.min);
        println!("  Maximum: {}", s.stats.max);
        println!("  Mean:    {:.2}", s.stats.mean);
        println!("  Median:  {}", s.stats.median);
    }
    println!();
}
