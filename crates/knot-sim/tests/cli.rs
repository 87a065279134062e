use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn knot_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_knot-sim"))
        .args(args)
        .output()
        .expect("failed to spawn knot-sim")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "knot-sim failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

#[test]
fn build_prints_a_report_with_provenance() {
    let output = knot_sim(&["build", "--crossings", "3", "--seed", "11"]);
    let report = stdout_json(&output);
    assert_eq!(report["provenance"]["num_crossings"], 3);
    assert_eq!(report["provenance"]["seed"], 11);
    assert!(report["report"]["attempts"].as_u64().unwrap() >= 1);
    assert_eq!(report["provenance"]["diagram_hash"].as_str().unwrap().len(), 64);
    assert_eq!(report["diagram"]["nodes"].as_array().unwrap().len(), 3);
}

#[test]
fn build_is_reproducible_per_seed() {
    let first = stdout_json(&knot_sim(&["build", "--crossings", "4", "--seed", "3"]));
    let second = stdout_json(&knot_sim(&["build", "--crossings", "4", "--seed", "3"]));
    assert_eq!(
        first["provenance"]["diagram_hash"],
        second["provenance"]["diagram_hash"]
    );
}

#[test]
fn batch_member_rebuilds_from_its_recorded_seed() {
    let batch = stdout_json(&knot_sim(&[
        "build",
        "--crossings",
        "3",
        "--seed",
        "21",
        "--count",
        "3",
    ]));
    let member = &batch[2]["provenance"];
    assert_ne!(member["seed"], 21);
    let seed = member["seed"].as_u64().unwrap().to_string();
    let single = stdout_json(&knot_sim(&["build", "--crossings", "3", "--seed", &seed]));
    assert_eq!(single["provenance"]["diagram_hash"], member["diagram_hash"]);
}

#[test]
fn config_file_supplies_defaults_and_flags_override() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("build.yaml");
    fs::write(&config, "num_crossings: 2\nseed: 5\n").unwrap();

    let report = stdout_json(&knot_sim(&["build", "--config", path_str(&config)]));
    assert_eq!(report["provenance"]["num_crossings"], 2);
    assert_eq!(report["provenance"]["seed"], 5);

    let report = stdout_json(&knot_sim(&[
        "build",
        "--config",
        path_str(&config),
        "--crossings",
        "3",
    ]));
    assert_eq!(report["provenance"]["num_crossings"], 3);
}

#[test]
fn batch_writes_one_file_per_diagram() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("run");
    let reports = stdout_json(&knot_sim(&[
        "build",
        "--crossings",
        "2",
        "--count",
        "3",
        "--out",
        path_str(&out),
    ]));
    assert_eq!(reports.as_array().unwrap().len(), 3);
    for index in 0..3 {
        let written = fs::read_to_string(out.join(format!("diagram-{index}.json"))).unwrap();
        let diagram: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(diagram, reports[index]["diagram"]);
    }
    let report: Value =
        serde_json::from_str(&fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
    assert_eq!(report, reports);
}

#[test]
fn build_then_resolve_then_validate() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("run");
    stdout_json(&knot_sim(&[
        "build",
        "--crossings",
        "3",
        "--seed",
        "21",
        "--out",
        path_str(&out),
    ]));
    let diagram = out.join("diagram-0.json");
    let resolved = dir.path().join("resolved.json");

    let summary = stdout_json(&knot_sim(&[
        "resolve",
        "--input",
        path_str(&diagram),
        "--crossing",
        "1",
        "--smoothing",
        "horizontal",
        "--out",
        path_str(&resolved),
    ]));
    assert_eq!(summary["crossings_before"], 3);
    assert_eq!(summary["crossings_after"], 2);
    assert_eq!(summary["smoothing"], "horizontal");

    let verdict = stdout_json(&knot_sim(&["validate", "--input", path_str(&resolved)]));
    assert_eq!(verdict["planar"], true);
    assert_eq!(verdict["crossings"], 2);
    assert_eq!(verdict["diagram_hash"], summary["diagram_hash"]);
}

#[test]
fn missing_crossing_count_fails() {
    let output = knot_sim(&["build"]);
    assert!(!output.status.success());
}

#[test]
fn unknown_crossing_fails_resolution() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("run");
    stdout_json(&knot_sim(&["build", "--crossings", "2", "--out", path_str(&out)]));
    let output = knot_sim(&[
        "resolve",
        "--input",
        path_str(&out.join("diagram-0.json")),
        "--crossing",
        "9",
        "--smoothing",
        "a",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown-node"));
}
