//! Integration tests for the runner's analysis pipeline.
//!
//! These tests write small CSV inputs to a temporary directory, drive the
//! runner through a TOML config, and check the exported artifacts.

use std::path::{Path, PathBuf};

use decilab_runner::{
    load_decile_table, report_from_table, run_analysis, run_averaging, run_deciles,
    save_artifacts, save_averaged, AnalysisConfig,
};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn suffix_counts(values: &[u32]) -> String {
    let mut s = String::from("Prefix,SuffixCount\n");
    for (i, v) in values.iter().enumerate() {
        s.push_str(&format!("p{i},{v}\n"));
    }
    s
}

#[test]
fn decile_config_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    // Identity piles suffixes into few buckets; Random spreads them out.
    let mut identity = vec![1u32; 18];
    identity.extend([200, 300]);
    write(root, "identity_data.csv", &suffix_counts(&identity));
    write(root, "random_data.csv", &suffix_counts(&[26; 20]));

    let config_text = format!(
        r#"
[deciles]
methods = [
    {{ name = "Identity", path = "{}" }},
    {{ name = "Random", path = "{}" }},
]

[output]
dir = "{}"
"#,
        root.join("identity_data.csv").display(),
        root.join("random_data.csv").display(),
        root.join("out").display(),
    );
    let config_path = write(root, "analysis.toml", &config_text);
    let config = AnalysisConfig::from_file(&config_path).unwrap();

    let report = run_deciles(config.deciles.as_ref().unwrap()).unwrap();
    assert_eq!(report.table.methods().collect::<Vec<_>>(), ["Identity", "Random"]);

    let identity = report.table.get("Identity").unwrap();
    assert_eq!(identity.total(), 18.0 + 500.0);
    assert_eq!(identity[9], 500.0);
    assert_eq!(report.table.get("Random").unwrap().sums(), &[52.0; 10]);
    assert_eq!(report.summary("Identity").unwrap().records, Some(20));

    // Exported CSV reads back into the same table.
    let run_dir = save_artifacts(&report, &config.output.dir).unwrap();
    let reloaded = load_decile_table(&run_dir.join("deciles.csv")).unwrap();
    assert_eq!(reloaded, report.table);

    let from_table = report_from_table(reloaded).unwrap();
    assert_eq!(from_table.summaries[0].stats, report.summaries[0].stats);
}

#[test]
fn long_format_config_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "all.csv",
        "Method,Count\nZigzag,3\nCyclic,1\nZigzag,7\nCyclic,1\n",
    );

    let config = AnalysisConfig::from_toml(&format!(
        "[deciles]\nlong_format = {{ path = \"{}\", value_column = \"Count\" }}\n",
        root.join("all.csv").display()
    ))
    .unwrap();

    let report = run_deciles(config.deciles.as_ref().unwrap()).unwrap();
    assert_eq!(report.table.methods().collect::<Vec<_>>(), ["Zigzag", "Cyclic"]);
    assert_eq!(report.table.get("Zigzag").unwrap().total(), 10.0);
    assert_eq!(report.table.get("Zigzag").unwrap()[9], 7.0);
}

#[test]
fn schema_error_aborts_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "good.csv", &suffix_counts(&[1, 2, 3]));
    write(root, "bad.csv", "Prefix,SuffixCount\np0,oops\n");

    let config = AnalysisConfig::from_toml(&format!(
        "[deciles]\nmethods = [{{ name = \"Good\", path = \"{}\" }}, {{ name = \"Bad\", path = \"{}\" }}]\n",
        root.join("good.csv").display(),
        root.join("bad.csv").display()
    ))
    .unwrap();

    let err = run_deciles(config.deciles.as_ref().unwrap()).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("schema error"), "unexpected error: {chain}");
    assert!(chain.contains("oops"));
    assert!(!root.join("results").exists());
}

#[test]
fn averaging_config_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "benchmark_results.csv",
        "Dataset,KSize,ExecutionType,ExecutionTime(ms),Variance\n\
         ecoli.fa,21,Identity,10,100\n\
         ecoli.fa,21,Random,20,50\n\
         ecoli.fa,31,Identity,40,10\n\
         yeast.fa,21,Identity,30,200\n",
    );
    write(
        root,
        "benchmark_hash_results.csv",
        "Dataset,KSize,ExecutionTime(ms),Variance\n\
         ecoli.fa,21,5,1\n\
         yeast.fa,21,7,3\n\
         human.fa,31,9,9\n",
    );

    let config = AnalysisConfig::from_toml(&format!(
        r#"
[averaging]
left = "{}"
right = "{}"
left_suffix = "_benchmark"
right_suffix = "_hash"
"#,
        root.join("benchmark_results.csv").display(),
        root.join("benchmark_hash_results.csv").display()
    ))
    .unwrap();
    let settings = config.averaging.as_ref().unwrap();

    let table = run_averaging(settings).unwrap();
    // Size 31 only exists for different datasets on each side.
    assert_eq!(table.len(), 1);
    let row = table.row(21).unwrap();
    assert_eq!(row.joined_rows, 3);
    assert_eq!(row.field("ExecutionTime(ms)_benchmark"), Some(20.0));
    assert_eq!(row.field("Variance_benchmark"), Some(350.0 / 3.0));
    assert_eq!(row.field("ExecutionTime(ms)_hash"), Some(17.0 / 3.0));
    assert_eq!(row.field("Variance_hash"), Some(5.0 / 3.0));

    let out = save_averaged(&table, &settings.schema.size_column, &root.join("out")).unwrap();
    let csv = std::fs::read_to_string(out.join("averaged.csv")).unwrap();
    assert!(csv.starts_with(
        "KSize,ExecutionTime(ms)_benchmark,Variance_benchmark,ExecutionTime(ms)_hash,Variance_hash\n"
    ));
}

#[test]
fn averaging_without_shared_keys_fails() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let header = "Dataset,KSize,ExecutionTime(ms),Variance\n";
    write(root, "a.csv", &format!("{header}x.fa,21,1,1\n"));
    write(root, "b.csv", &format!("{header}y.fa,21,1,1\n"));

    let settings = decilab_runner::AveragingSettings::new(root.join("a.csv"), root.join("b.csv"));
    let err = run_averaging(&settings).unwrap_err();
    assert!(format!("{err:#}").contains("no matching"));
}

fn combined_config(root: &Path, hash_rows: &str) -> AnalysisConfig {
    write(root, "a.csv", &suffix_counts(&[1, 2, 3, 4]));
    let header = "Dataset,KSize,ExecutionTime(ms),Variance\n";
    write(root, "l.csv", &format!("{header}ecoli.fa,21,10,2\n"));
    write(root, "r.csv", &format!("{header}{hash_rows}"));

    AnalysisConfig::from_toml(&format!(
        r#"
[deciles]
methods = [{{ name = "A", path = "{}" }}]

[averaging]
left = "{}"
right = "{}"
"#,
        root.join("a.csv").display(),
        root.join("l.csv").display(),
        root.join("r.csv").display()
    ))
    .unwrap()
}

#[test]
fn failing_averaging_writes_no_decile_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let config = combined_config(root, "human.fa,31,9,9\n");
    let out = root.join("out");

    let err = run_analysis(&config, Some(&out)).unwrap_err();
    assert!(format!("{err:#}").contains("no matching"));

    let written: Vec<_> = std::fs::read_dir(&out)
        .map(|entries| entries.filter_map(|e| e.ok()).collect())
        .unwrap_or_default();
    assert!(written.is_empty(), "artifacts left behind: {written:?}");
}

#[test]
fn combined_config_exports_both_sections() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let config = combined_config(root, "ecoli.fa,21,4,6\n");
    let out = root.join("out");

    let outcome = run_analysis(&config, Some(&out)).unwrap();
    assert_eq!(outcome.deciles.as_ref().unwrap().table.len(), 1);
    let row = outcome.averaged.as_ref().unwrap().row(21).unwrap();
    assert_eq!(row.field("Variance_a"), Some(2.0));
    assert_eq!(row.field("Variance_b"), Some(6.0));

    assert_eq!(outcome.artifacts.len(), 2);
    assert!(outcome.artifacts[0].join("report.json").exists());
    assert!(outcome.artifacts[1].join("averaged.csv").exists());
}

#[test]
fn combined_config_without_output_dir_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let config = combined_config(root, "ecoli.fa,21,4,6\n");

    let outcome = run_analysis(&config, None).unwrap();
    assert!(outcome.artifacts.is_empty());
    assert!(outcome.deciles.is_some() && outcome.averaged.is_some());
}
