//! E2E CLI tests covering:
//! - `meshstat analyze` in text, pretty and JSON modes
//! - `meshstat coefficient` lookups and the not-found error contract
//! - `meshstat stats` JSON shape
//! - Load failures (self-loop, blank line, missing file) and their codes
//! - Config resolution (`meshstat.toml`, `--config`, `FORMAT`, `--no-header`)
//!
//! Each test runs the `meshstat` binary in an isolated temp directory with
//! a private config home so no user config leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const KITE: &str = "from to\nA B\nB C\nA C\nC D\nE\n";

fn meshstat_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("meshstat"));
    cmd.current_dir(dir);
    cmd.env("MESHSTAT_LOG", "error");
    cmd.env("HOME", dir);
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd.env_remove("FORMAT");
    cmd.env_remove("MESHSTAT_TIMING");
    cmd
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = meshstat_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("meshstat should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_json_reports_kite_metrics() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    let json = run_json(dir.path(), &["analyze", "kite.txt"]);
    assert_eq!(json["nodes"], 5);
    assert_eq!(json["edges"], 4);
    assert_eq!(json["undirected_edges"], 4);

    let average = json["average_clustering"].as_f64().expect("average");
    assert!((average - (7.0 / 3.0) / 5.0).abs() < 1e-9);

    let centralization = json["freeman_centralization"].as_f64().expect("defined");
    assert!((centralization - 7.0 / 12.0).abs() < 1e-9);

    let top = json["top"].as_array().expect("top array");
    let labels: Vec<&str> = top.iter().filter_map(|r| r["node"].as_str()).collect();
    assert_eq!(labels, vec!["A", "B", "C", "D", "E"]);
}

#[test]
fn analyze_top_limits_pairs() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    let json = run_json(dir.path(), &["analyze", "kite.txt", "--top", "2"]);
    assert_eq!(json["top"].as_array().expect("top").len(), 2);
}

#[test]
fn analyze_text_when_piped() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    meshstat_cmd(dir.path())
        .args(["analyze", "kite.txt"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("nodes 5\nedges 4\n"))
        .stdout(predicate::str::ends_with("top E\t0.000000\nfreeman_centralization 0.583333\n"));
}

#[test]
fn analyze_pretty_format() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    meshstat_cmd(dir.path())
        .args(["--format", "pretty", "analyze", "kite.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph: kite.txt"))
        .stdout(predicate::str::contains("Top 5 clustering coefficients"));
}

#[test]
fn analyze_two_nodes_centralization_undefined() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "pair.csv", "source,target\nA,B\n");

    let json = run_json(dir.path(), &["analyze", "pair.csv"]);
    assert!(json["freeman_centralization"].is_null());
    assert_eq!(json["centralization_error"]["error_code"], "E3001");

    meshstat_cmd(dir.path())
        .args(["analyze", "pair.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("freeman_centralization undefined"));
}

#[test]
fn analyze_header_only_file_is_empty_graph() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "empty.csv", "source,target\n");

    let json = run_json(dir.path(), &["analyze", "empty.csv"]);
    assert_eq!(json["nodes"], 0);
    assert_eq!(json["average_clustering"], 0.0);
    assert!(json["top"].as_array().expect("top").is_empty());
}

// ---------------------------------------------------------------------------
// coefficient
// ---------------------------------------------------------------------------

#[test]
fn coefficient_known_node() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    let json = run_json(dir.path(), &["coefficient", "kite.txt", "C"]);
    assert_eq!(json["node"], "C");
    assert_eq!(json["degree"], 3);
    let c = json["coefficient"].as_f64().expect("coefficient");
    assert!((c - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn coefficient_isolated_node_is_zero() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    meshstat_cmd(dir.path())
        .args(["coefficient", "kite.txt", "E"])
        .assert()
        .success()
        .stdout("E\t0.000000\n");
}

#[test]
fn coefficient_unknown_node_fails_with_code() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    meshstat_cmd(dir.path())
        .args(["coefficient", "kite.txt", "Z"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("E2001"))
        .stderr(predicate::str::contains("`Z`"));
}

// ---------------------------------------------------------------------------
// stats
// ---------------------------------------------------------------------------

#[test]
fn stats_json_shape() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    let json = run_json(dir.path(), &["stats", "kite.txt"]);
    assert_eq!(json["node_count"], 5);
    assert_eq!(json["component_count"], 2);
    assert_eq!(json["isolated_node_count"], 1);
    assert_eq!(json["max_degree"], 3);
    assert_eq!(json["degrees"]["min_degree"], 0);
    assert!(
        json["content_hash"]
            .as_str()
            .expect("hash")
            .starts_with("blake3:")
    );
}

#[test]
fn stats_hash_is_stable_across_runs() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    let first = run_json(dir.path(), &["stats", "kite.txt"]);
    let second = run_json(dir.path(), &["stats", "kite.txt"]);
    assert_eq!(first["content_hash"], second["content_hash"]);
}

// ---------------------------------------------------------------------------
// Load failures
// ---------------------------------------------------------------------------

#[test]
fn self_loop_fails_load() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "loop.csv", "h\nA,B\nB,B\n");

    meshstat_cmd(dir.path())
        .args(["analyze", "loop.csv"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("E1004"))
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn blank_line_fails_load() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "blank.csv", "h\nA,B\n   \nC,D\n");

    meshstat_cmd(dir.path())
        .args(["stats", "blank.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1003"));
}

#[test]
fn missing_file_fails_load() {
    let dir = TempDir::new().expect("tempdir");

    meshstat_cmd(dir.path())
        .args(["analyze", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn json_mode_error_is_structured() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "loop.csv", "h\nA,A\n");

    meshstat_cmd(dir.path())
        .args(["analyze", "loop.csv", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error_code\": \"E1004\""));
}

// ---------------------------------------------------------------------------
// Config resolution
// ---------------------------------------------------------------------------

#[test]
fn project_config_sets_output_and_top() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);
    write_file(
        dir.path(),
        "meshstat.toml",
        "output = \"json\"\n\n[report]\ntop = 1\n",
    );

    let output = meshstat_cmd(dir.path())
        .args(["analyze", "kite.txt"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("config selects JSON");
    assert_eq!(json["top"].as_array().expect("top").len(), 1);
}

#[test]
fn format_env_beats_config() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);
    write_file(dir.path(), "meshstat.toml", "output = \"json\"\n");

    meshstat_cmd(dir.path())
        .env("FORMAT", "text")
        .args(["analyze", "kite.txt"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("nodes 5"));
}

#[test]
fn loader_config_skips_blank_lines() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "blank.csv", "h\nA,B\n\nB,C\n");
    write_file(
        dir.path(),
        "alt.toml",
        "[loader]\nskip_blank_lines = true\n",
    );

    let json = run_json(dir.path(), &["--config", "alt.toml", "stats", "blank.csv"]);
    assert_eq!(json["node_count"], 3);
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    meshstat_cmd(dir.path())
        .args(["--config", "absent.toml", "analyze", "kite.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}

#[test]
fn no_header_keeps_first_line() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "raw.csv", "A,B\nB,C\n");

    let with_header = run_json(dir.path(), &["stats", "raw.csv"]);
    assert_eq!(with_header["node_count"], 2);

    let without = run_json(dir.path(), &["stats", "raw.csv", "--no-header"]);
    assert_eq!(without["node_count"], 3);
}

// ---------------------------------------------------------------------------
// Timing and completions
// ---------------------------------------------------------------------------

#[test]
fn timing_report_goes_to_stderr() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "kite.txt", KITE);

    meshstat_cmd(dir.path())
        .args(["--timing", "analyze", "kite.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("timing").not())
        .stderr(predicate::str::contains("graph.load"))
        .stderr(predicate::str::contains("metrics.clustering"));
}

#[test]
fn completions_generate_script() {
    let dir = TempDir::new().expect("tempdir");

    meshstat_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("meshstat"));
}
