use assert_cmd::Command;
use predicates::prelude::*;

fn mga() -> Command {
    Command::cargo_bin("mga").expect("binary builds")
}

#[test]
fn cases_lists_flyby_pairs() {
    mga()
        .arg("cases")
        .assert()
        .success()
        .stdout(predicate::str::contains("Venus/Earth"))
        .stdout(predicate::str::contains("Mars/Venus"));
}

#[test]
fn run_prints_summary_and_writes_artifacts() {
    let dir = tempfile::tempdir().expect("temp dir");
    mga()
        .args(["run", "--step", "40000", "--samples", "64", "--output"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Earth -> Venus -> Venus -> Earth -> Jupiter"))
        .stdout(predicate::str::contains("Total Δv"))
        .stdout(predicate::str::contains("Capture Δv"));

    assert!(dir.path().join("summary.json").exists());
    assert!(dir.path().join("leg3_numerical.csv").exists());
    let summary: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("summary.json")).expect("summary"),
    )
    .expect("valid json");
    assert!(summary["total_delta_v_km_s"].as_f64().is_some());
}

#[test]
fn unwritable_output_is_reported_once_per_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "").expect("blocker file");
    let output = mga()
        .env("RUST_LOG", "warn")
        .args(["run", "--step", "40000", "--samples", "64", "--output"])
        .arg(&blocker)
        .output()
        .expect("runs");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Artifacts       : 0 written"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("summary.json").count(), 1, "{stderr}");
}

#[test]
fn infeasible_case_fails_without_partial_result() {
    // Earth/Venus with the default durations needs a sub-surface Venus pass.
    mga()
        .args(["run", "--case", "2", "--step", "40000", "--samples", "64", "--sequential"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Total").not())
        .stderr(predicate::str::contains("infeasible"));
}

#[test]
fn invalid_case_fails() {
    mga()
        .args(["run", "--case", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("case selector"));
}

#[test]
fn scenario_file_is_loaded() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("scenario.toml");
    std::fs::write(
        &path,
        "analytic_samples_per_leg = 64\n\n[integrator]\nstep_seconds = 40000.0\n",
    )
    .expect("write scenario");
    mga()
        .arg("run")
        .arg("--scenario")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Propagated leg 3"));
}

#[test]
fn missing_scenario_reports_path() {
    mga()
        .args(["run", "--scenario", "does/not/exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does/not/exist.toml"));
}
