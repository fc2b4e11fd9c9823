use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

fn parameters_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("parameters.json")
}

#[test]
fn test_cli_reports_turns_and_writes_report() {
    let temp_dir = tempdir().unwrap();
    let output = assert_cmd::cargo::cargo_bin_cmd!("herd_immunity")
        .args(["100", "0.5", "Ebola", "1.0", "1.0"])
        .arg("--output-dir")
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("The simulation has ended after "));
    assert!(stdout.trim_end().ends_with(" turns."));

    let report = fs::read_to_string(
        temp_dir
            .path()
            .join("Ebola_simulation_pop_100_vp_0.5_infected_1.txt"),
    )
    .unwrap();
    assert!(report.starts_with("Population size: 100\tVaccination percentage: 0.5\tVirus: Ebola"));
}

#[test]
fn test_cli_with_config_file() {
    let temp_dir = tempdir().unwrap();
    assert_cmd::cargo::cargo_bin_cmd!("herd_immunity")
        .arg("--config")
        .arg(parameters_fixture())
        .arg("--output-dir")
        .arg(temp_dir.path())
        .arg("--step-csv")
        .assert()
        .success();

    let stem = "Measles_simulation_pop_500_vp_0.8_infected_5";
    assert!(temp_dir.path().join(format!("{stem}.txt")).is_file());
    assert!(temp_dir.path().join(format!("{stem}_steps.csv")).is_file());
}

#[test]
fn test_cli_refuses_to_overwrite() {
    let temp_dir = tempdir().unwrap();
    let run = || {
        assert_cmd::cargo::cargo_bin_cmd!("herd_immunity")
            .args(["50", "0.9", "Flu", "0.5", "0.5", "--output-dir"])
            .arg(temp_dir.path())
            .output()
            .unwrap()
    };
    assert!(run().status.success());

    let second = run();
    assert!(!second.status.success());
    let stderr = String::from_utf8(second.stderr).unwrap();
    assert!(stderr.contains("already exists"));

    assert_cmd::cargo::cargo_bin_cmd!("herd_immunity")
        .args(["50", "0.9", "Flu", "0.5", "0.5", "--force-overwrite", "--output-dir"])
        .arg(temp_dir.path())
        .assert()
        .success();
}

#[test]
fn test_cli_missing_arguments() {
    assert_cmd::cargo::cargo_bin_cmd!("herd_immunity")
        .args(["100", "0.5"])
        .assert()
        .failure();
}

#[test]
fn test_cli_log_level_goes_to_stderr() {
    let temp_dir = tempdir().unwrap();
    let output = assert_cmd::cargo::cargo_bin_cmd!("herd_immunity")
        .args(["20", "0.0", "Ebola", "1.0", "1.0", "--log-level", "info", "--output-dir"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stderr.contains("herd_immunity::simulation - Running Ebola simulation"));
}
