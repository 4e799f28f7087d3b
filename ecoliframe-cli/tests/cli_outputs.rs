mod common;

use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

use crate::common::{read_json, run_ecoliframe};

#[test]
fn default_run_writes_all_artifacts() {
    let dir = tempdir().unwrap();
    run_ecoliframe(dir.path(), &[]).unwrap();

    for name in [
        "variability_metrics.csv",
        "simulation_table.csv",
        "validation_results.json",
        "simulation_summary.txt",
    ] {
        assert!(dir.path().join(name).is_file(), "missing {name}");
    }

    let table = fs::read_to_string(dir.path().join("simulation_table.csv")).unwrap();
    let mut lines = table.lines();
    assert_eq!(
        lines.next(),
        Some("cycle,nutrient_level,AAA_efficiency,GAT_efficiency,CGT_efficiency,CTG_efficiency")
    );
    assert_eq!(lines.count(), 200);

    let variability = fs::read_to_string(dir.path().join("variability_metrics.csv")).unwrap();
    assert!(variability.starts_with("codon,variance,Fano_factor,CV,CRI"));

    let validation = read_json(&dir.path().join("validation_results.json"));
    let report = validation.as_object().unwrap();
    assert_eq!(report.len(), 4);
    for key in ["variance", "Fano_factor", "CV", "CRI"] {
        assert!(report.contains_key(key));
    }

    let summary = fs::read_to_string(dir.path().join("simulation_summary.txt")).unwrap();
    assert!(summary.starts_with("### Simulation Summary ###"));
    assert!(summary.contains("Validation Metrics:"));
}

#[test]
fn same_seed_same_table() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    run_ecoliframe(first.path(), &[]).unwrap();
    run_ecoliframe(second.path(), &[]).unwrap();

    let a = fs::read_to_string(first.path().join("simulation_table.csv")).unwrap();
    let b = fs::read_to_string(second.path().join("simulation_table.csv")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn json_format_and_metric_subset() {
    let dir = tempdir().unwrap();
    run_ecoliframe(dir.path(), &["-f", "json", "--metrics", "CV,CRI,bogus"]).unwrap();

    let variability = read_json(&dir.path().join("variability_metrics.json"));
    let rows = variability.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].get("CV").is_some());
    assert!(rows[0].get("variance").is_none());

    let table = read_json(&dir.path().join("simulation_table.json"));
    assert_eq!(table.as_array().unwrap().len(), 200);

    let validation = read_json(&dir.path().join("validation_results.json"));
    assert_eq!(validation.as_object().unwrap().len(), 2);
}

#[test]
fn config_file_with_cli_override() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("params.csv");
    fs::write(
        &config_path,
        "num_cycles,30\nrobust_codons,\"AAA\"\nsensitive_codons,\"CGT,GGG\"\n",
    )
    .unwrap();
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("ecoliframe").unwrap();
    cmd.arg("-q")
        .arg("-c")
        .arg(&config_path)
        .arg("-n")
        .arg("12")
        .arg("-o")
        .arg(&out);
    cmd.assert().success();

    let table = fs::read_to_string(out.join("simulation_table.csv")).unwrap();
    let mut lines = table.lines();
    assert_eq!(
        lines.next(),
        Some("cycle,nutrient_level,AAA_efficiency,CGT_efficiency,GGG_efficiency")
    );
    assert_eq!(lines.count(), 12);
}

#[test]
fn reference_file_is_used_for_validation() {
    let dir = tempdir().unwrap();
    let reference = dir.path().join("reference.csv");
    fs::write(&reference, "codon,CV\nAAA,0.1\nGAT,0.2\nCGT,0.3\nCTG,0.4\n").unwrap();
    let out = dir.path().join("out");
    let reference_arg = reference.to_str().unwrap();
    run_ecoliframe(&out, &["-r", reference_arg]).unwrap();

    let validation = read_json(&out.join("validation_results.json"));
    assert_eq!(
        validation["variance"],
        "Metric missing in simulation or experimental data."
    );
}

#[test]
fn replicates_get_their_own_directories() {
    let dir = tempdir().unwrap();
    run_ecoliframe(dir.path(), &["--replicates", "3", "-t", "2"]).unwrap();
    for replicate in 1..=3 {
        let sub = dir.path().join(format!("replicate_{replicate:03}"));
        assert!(sub.join("simulation_summary.txt").is_file());
    }
    let a = fs::read_to_string(dir.path().join("replicate_001/simulation_table.csv")).unwrap();
    let b = fs::read_to_string(dir.path().join("replicate_002/simulation_table.csv")).unwrap();
    assert_ne!(a, b);
}

#[test]
fn normalized_trace_stays_in_unit_interval() {
    let dir = tempdir().unwrap();
    run_ecoliframe(dir.path(), &["--normalize-trace"]).unwrap();
    let table = fs::read_to_string(dir.path().join("simulation_table.csv")).unwrap();
    for line in table.lines().skip(1) {
        for field in line.split(',').skip(2) {
            let value: f64 = field.parse().unwrap();
            assert!((0.0..=1.0).contains(&value), "{value}");
        }
    }
}

#[test]
fn invalid_parameters_fail() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("ecoliframe").unwrap();
    cmd.arg("-q")
        .arg("--stress-probability")
        .arg("1.5")
        .arg("-o")
        .arg(dir.path());
    cmd.assert().failure();

    let mut cmd = Command::cargo_bin("ecoliframe").unwrap();
    cmd.arg("-q")
        .arg("--robust")
        .arg("AAA")
        .arg("--sensitive")
        .arg("AAA")
        .arg("-o")
        .arg(dir.path());
    cmd.assert().failure();

    let mut cmd = Command::cargo_bin("ecoliframe").unwrap();
    cmd.arg("-q").arg("--metrics").arg("entropy").arg("-o").arg(dir.path());
    cmd.assert().failure();
}
