//! Unit tests for the `analyze` command, its artifacts, and report rendering.

use super::commands::{input_name, numbered_name, sample_file_name, unique_input_names};
use super::test_helpers::{
    MALFORMED, PATH4, TRIANGLE, analyze_command, create_text_file, render_to_string,
    run_analyze_cli, run_cli_expecting_error, temp_dir,
};
use super::{ArtifactKind, Cli, CliError, Command, OutputFormat, format_metric};

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use netgauge_core::{MetricKind, NetgaugeError, NetgaugeErrorCode, read_gml};
use rstest::rstest;
use serde_json::Value;

use netgauge_test_support::tracing::TraceLog;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
#[case::plain("/data/karate.txt", "karate.txt")]
#[case::no_extension("/data/karate", "karate")]
#[case::relative("graphs/ring.edges", "ring.edges")]
fn input_name_uses_file_name(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(input_name(Path::new(raw)), expected);
}

#[rstest]
#[case::txt("karate.txt", "karate.sample.dot")]
#[case::bare("karate", "karate.sample.dot")]
#[case::dotted("ring.v2.edges", "ring.v2.sample.dot")]
fn sample_file_name_replaces_extension(#[case] name: &str, #[case] expected: &str) {
    assert_eq!(sample_file_name(name), expected);
}

#[rstest]
#[case::with_extension("g.txt", 2, "g-2.txt")]
#[case::compound_extension("g.sample.dot", 3, "g-3.sample.dot")]
#[case::bare("g", 2, "g-2")]
#[case::hidden(".g", 2, ".g-2")]
fn numbered_name_inserts_counter_before_extension(
    #[case] name: &str,
    #[case] n: usize,
    #[case] expected: &str,
) {
    assert_eq!(numbered_name(name, n), expected);
}

#[rstest]
fn repeated_file_names_get_distinct_keys() {
    let paths = [
        PathBuf::from("a/g.txt"),
        PathBuf::from("b/g.txt"),
        PathBuf::from("c/g-2.txt"),
        PathBuf::from("d/h.txt"),
    ];
    assert_eq!(
        unique_input_names(&paths),
        ["g.txt", "g-2.txt", "g-2-2.txt", "h.txt"]
    );
}

#[rstest]
#[case::label("Avg Degree", MetricKind::AvgDegree)]
#[case::id("avg-degree", MetricKind::AvgDegree)]
#[case::mixed_case("k-CORE-nodes", MetricKind::KCoreNodes)]
fn compare_accepts_labels_and_ids(#[case] raw: &str, #[case] expected: MetricKind) -> TestResult {
    let cli = Cli::try_parse_from(["netgauge", "analyze", "--compare", raw, "graph.txt"])?;
    let Command::Analyze(command) = cli.command;
    assert_eq!(command.compare, vec![expected]);
    assert_eq!(command.files, vec![PathBuf::from("graph.txt")]);
    Ok(())
}

#[rstest]
fn compare_rejects_unknown_metric() {
    let parsed = Cli::try_parse_from(["netgauge", "analyze", "--compare", "girth", "g.txt"]);
    assert!(parsed.is_err(), "unknown metric must be rejected");
}

#[rstest]
fn analyze_requires_at_least_one_file() {
    assert!(Cli::try_parse_from(["netgauge", "analyze"]).is_err());
}

#[rstest]
fn parses_numeric_options_and_format() -> TestResult {
    let cli = Cli::try_parse_from([
        "netgauge",
        "analyze",
        "--betweenness-samples",
        "20",
        "--eigenvector-max-iter",
        "50",
        "--sample-size",
        "10",
        "--seed",
        "3",
        "--format",
        "json",
        "a.txt",
        "b.txt",
    ])?;
    let Command::Analyze(command) = cli.command;
    assert_eq!(command.betweenness_samples, 20);
    assert_eq!(command.eigenvector_max_iter, 50);
    assert_eq!(command.sample_size, 10);
    assert_eq!(command.seed, Some(3));
    assert_eq!(command.format, OutputFormat::Json);
    assert_eq!(command.files.len(), 2);
    Ok(())
}

#[rstest]
fn analyze_single_file_reports_metrics() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "triangle.txt", TRIANGLE)?;
    let summary = run_analyze_cli(analyze_command(vec![path]))?;

    assert!(summary.all_succeeded());
    assert!(summary.comparison.is_none(), "one file has nothing to compare");
    let report = summary.outcomes[0].result.as_ref().map_err(|err| err.to_string())?;
    assert_eq!(report.row.nodes, 3);
    assert_eq!(report.row.edges, 3);
    assert_eq!(format_metric(MetricKind::Density, &report.row), "1.0000");
    assert_eq!(format_metric(MetricKind::Diameter, &report.row), "1");
    Ok(())
}

#[rstest]
fn failed_inputs_do_not_stop_the_batch() -> TestResult {
    let dir = temp_dir();
    let good = create_text_file(&dir, "triangle.txt", TRIANGLE)?;
    let bad = create_text_file(&dir, "bad.txt", MALFORMED)?;
    let missing = dir.path().join("missing.txt");
    let other = create_text_file(&dir, "path.txt", PATH4)?;

    let summary = run_analyze_cli(analyze_command(vec![good, bad, missing, other]))?;

    let names: Vec<&str> = summary
        .outcomes
        .iter()
        .map(|outcome| outcome.name.as_str())
        .collect();
    assert_eq!(names, ["triangle.txt", "bad.txt", "missing.txt", "path.txt"]);
    assert_eq!(summary.failed_count(), 2);

    let codes: Vec<Option<NetgaugeErrorCode>> = summary
        .outcomes
        .iter()
        .map(|outcome| outcome.result.as_ref().err().map(NetgaugeError::code))
        .collect();
    assert_eq!(
        codes,
        [
            None,
            Some(NetgaugeErrorCode::LoadFailure),
            Some(NetgaugeErrorCode::OpenFailure),
            None,
        ]
    );

    let table = summary.comparison.as_ref().ok_or("two successes must compare")?;
    assert_eq!(table.rows().len(), 4);
    Ok(())
}

#[rstest]
fn invalid_configuration_aborts_the_run() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "triangle.txt", TRIANGLE)?;
    let mut command = analyze_command(vec![path]);
    command.betweenness_samples = 0;

    let err = run_cli_expecting_error(command, "zero betweenness samples must fail");
    assert!(matches!(
        err,
        CliError::Core(NetgaugeError::InvalidBetweennessSamples { got: 0 })
    ));
    Ok(())
}

#[rstest]
fn zero_sample_size_is_rejected() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "triangle.txt", TRIANGLE)?;
    let mut command = analyze_command(vec![path]);
    command.sample_size = 0;

    let err = run_cli_expecting_error(command, "zero sample size must fail");
    assert!(matches!(
        err,
        CliError::Core(NetgaugeError::InvalidSampleSize { .. })
    ));
    Ok(())
}

#[rstest]
fn writes_gml_and_sample_artifacts() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "triangle.txt", TRIANGLE)?;
    let out = dir.path().join("out");
    let mut command = analyze_command(vec![path]);
    command.gml_dir = Some(out.join("gml"));
    command.sample_dir = Some(out.join("samples"));

    let summary = run_analyze_cli(command)?;

    let kinds: Vec<ArtifactKind> = summary.artifacts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, [ArtifactKind::Gml, ArtifactKind::SampleDot]);

    let gml_path = out.join("gml").join("triangle.gml");
    assert_eq!(summary.artifacts[0].path, gml_path);
    let network = read_gml(fs::read(&gml_path)?.as_slice())?;
    assert_eq!(network.node_count(), 3);
    assert_eq!(network.edge_count(), 3);

    let dot = fs::read_to_string(out.join("samples").join("triangle.sample.dot"))?;
    assert!(dot.starts_with("graph {"), "unexpected dot output: {dot}");
    Ok(())
}

#[rstest]
fn same_named_inputs_keep_separate_artifacts() -> TestResult {
    let dir = temp_dir();
    fs::create_dir_all(dir.path().join("a"))?;
    fs::create_dir_all(dir.path().join("b"))?;
    let first = create_text_file(&dir, "a/g.txt", TRIANGLE)?;
    let second = create_text_file(&dir, "b/g.txt", PATH4)?;
    let out = dir.path().join("out");
    let mut command = analyze_command(vec![first, second]);
    command.gml_dir = Some(out.clone());
    command.sample_dir = Some(out.clone());

    let summary = run_analyze_cli(command)?;

    let names: Vec<&str> = summary
        .outcomes
        .iter()
        .map(|outcome| outcome.name.as_str())
        .collect();
    assert_eq!(names, ["g.txt", "g-2.txt"]);
    let table = summary.comparison.as_ref().ok_or("two successes must compare")?;
    let rows: Vec<&str> = table.rows().iter().map(|row| row.name.as_str()).collect();
    assert_eq!(rows, names);

    let paths: Vec<PathBuf> = summary.artifacts.iter().map(|a| a.path.clone()).collect();
    assert_eq!(
        paths,
        [
            out.join("g.gml"),
            out.join("g.sample.dot"),
            out.join("g-2.gml"),
            out.join("g-2.sample.dot"),
        ]
    );
    let triangle = read_gml(fs::read(out.join("g.gml"))?.as_slice())?;
    let path = read_gml(fs::read(out.join("g-2.gml"))?.as_slice())?;
    assert_eq!(triangle.node_count(), 3);
    assert_eq!(path.node_count(), 4);
    Ok(())
}

#[rstest]
fn distinct_names_with_the_same_gml_name_do_not_collide() -> TestResult {
    let dir = temp_dir();
    let bare = create_text_file(&dir, "g", TRIANGLE)?;
    let txt = create_text_file(&dir, "g.txt", PATH4)?;
    let out = dir.path().join("gml");
    let mut command = analyze_command(vec![bare, txt]);
    command.gml_dir = Some(out.clone());

    let summary = run_analyze_cli(command)?;

    let paths: Vec<PathBuf> = summary.artifacts.iter().map(|a| a.path.clone()).collect();
    assert_eq!(paths, [out.join("g.gml"), out.join("g-2.gml")]);
    assert_eq!(read_gml(fs::read(&paths[0])?.as_slice())?.node_count(), 3);
    assert_eq!(read_gml(fs::read(&paths[1])?.as_slice())?.node_count(), 4);
    Ok(())
}

#[rstest]
fn artifacts_skip_failed_inputs() -> TestResult {
    let dir = temp_dir();
    let bad = create_text_file(&dir, "bad.txt", MALFORMED)?;
    let mut command = analyze_command(vec![bad]);
    command.gml_dir = Some(dir.path().join("gml"));

    let summary = run_analyze_cli(command)?;

    assert!(summary.artifacts.is_empty());
    assert!(!dir.path().join("gml").join("bad.gml").exists());
    Ok(())
}

#[rstest]
fn human_report_lists_metrics_and_comparison() -> TestResult {
    let dir = temp_dir();
    let triangle = create_text_file(&dir, "triangle.txt", TRIANGLE)?;
    let path = create_text_file(&dir, "path.txt", PATH4)?;
    let mut command = analyze_command(vec![triangle, path]);
    command.compare = vec![MetricKind::Density];

    let rendered = render_to_string(&run_analyze_cli(command)?)?;

    assert!(rendered.contains("== triangle.txt =="));
    assert!(rendered.contains("== path.txt =="));
    for kind in MetricKind::ALL {
        assert!(rendered.contains(kind.label()), "missing {}", kind.label());
    }
    assert!(rendered.contains("Comparison: Density"));
    Ok(())
}

#[rstest]
fn human_report_shows_error_codes() -> TestResult {
    let dir = temp_dir();
    let bad = create_text_file(&dir, "bad.txt", MALFORMED)?;

    let rendered = render_to_string(&run_analyze_cli(analyze_command(vec![bad]))?)?;

    assert!(rendered.contains("error [NETGAUGE_LOAD_FAILURE]"), "{rendered}");
    Ok(())
}

#[rstest]
fn json_report_is_a_single_document() -> TestResult {
    let dir = temp_dir();
    let triangle = create_text_file(&dir, "triangle.txt", TRIANGLE)?;
    let path = create_text_file(&dir, "path.txt", PATH4)?;
    let bad = create_text_file(&dir, "bad.txt", MALFORMED)?;
    let mut command = analyze_command(vec![triangle, path, bad]);
    command.format = OutputFormat::Json;

    let rendered = render_to_string(&run_analyze_cli(command)?)?;
    let document: Value = serde_json::from_str(&rendered)?;

    let statuses: Vec<&str> = document["files"]
        .as_array()
        .ok_or("files must be an array")?
        .iter()
        .filter_map(|file| file["status"].as_str())
        .collect();
    assert_eq!(statuses, ["ok", "ok", "failed"]);
    assert_eq!(document["files"][0]["metrics"]["Nodes"], 3);
    assert_eq!(document["files"][0]["gml_file"], "triangle.gml");
    assert_eq!(document["files"][2]["code"], "NETGAUGE_LOAD_FAILURE");
    assert!(document["comparison"]["bars"].is_object());
    Ok(())
}

#[rstest]
fn run_records_cli_spans() -> TestResult {
    let dir = temp_dir();
    let good = create_text_file(&dir, "triangle.txt", TRIANGLE)?;
    let missing = dir.path().join("missing.txt");

    let (result, log) = TraceLog::capture(|| run_analyze_cli(analyze_command(vec![good, missing])));
    result?;

    let run = log.span("cli.run").ok_or("cli.run span missing")?;
    assert_eq!(run.field("command"), Some("analyze"));
    let analyze = log.span("cli.analyze").ok_or("cli.analyze span missing")?;
    assert_eq!(analyze.parent, Some("cli.run"));
    assert_eq!(analyze.field("files"), Some("2"));
    assert_eq!(analyze.field("failed"), Some("1"));
    Ok(())
}
