use std::fs;

use mga_trajectory::config::ScenarioConfig;
use mga_trajectory::dynamics::BodyEnvironment;
use mga_trajectory::transfer::{run_scenario, write_artifacts};

fn quick_scenario() -> ScenarioConfig {
    let mut scenario = ScenarioConfig::default();
    scenario.integrator.step_seconds = 40_000.0;
    scenario.analytic_samples_per_leg = 64;
    scenario
}

#[test]
fn artifacts_are_written_per_leg() {
    let environment = BodyEnvironment::with_defaults();
    let report = run_scenario(&quick_scenario(), &environment).expect("pipeline runs");
    let dir = tempfile::tempdir().expect("temp dir");

    let artifacts = write_artifacts(&report, dir.path());
    assert_eq!(artifacts.len(), 4 * 5 + 1);
    assert!(artifacts.iter().all(|a| a.is_ok()));

    for leg in 0..4 {
        for kind in ["analytic", "forward", "backward", "numerical", "dependent"] {
            let path = dir.path().join(format!("leg{leg}_{kind}.csv"));
            assert!(path.exists(), "missing {}", path.display());
        }
    }

    let mut reader =
        csv::Reader::from_path(dir.path().join("leg2_dependent.csv")).expect("dependent table");
    let headers = reader.headers().expect("header").clone();
    assert_eq!(headers.get(0), Some("epoch_s"));
    assert_eq!(headers.len(), 5);
    let rows = reader.records().count();
    let reconciled = report.reconciled[2].as_ref().expect("leg reconciles");
    assert_eq!(rows, reconciled.merged.len());

    let mut reader =
        csv::Reader::from_path(dir.path().join("leg0_numerical.csv")).expect("numerical table");
    let first: f64 = reader
        .records()
        .next()
        .expect("row")
        .expect("valid row")[0]
        .parse()
        .expect("numeric epoch");
    assert_eq!(first, report.definition.legs[0].start_epoch_s);

    let summary: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("summary.json")).expect("summary"),
    )
    .expect("valid json");
    let total = summary["total_delta_v_km_s"].as_f64().expect("total");
    assert_eq!(total, report.result().total_delta_v_km_s);
    assert!(summary["capture_delta_v_km_s"].as_f64().is_some());
    assert_eq!(summary["maneuvers"].as_array().map(Vec::len), Some(5));
    assert_eq!(summary["legs"].as_array().map(Vec::len), Some(4));
    assert_eq!(summary["legs"][3]["leg_type"], "capture");
    assert!(summary["numerical_seconds"].as_f64().is_some());
}

#[test]
fn unwritable_destination_is_reported_per_artifact() {
    let environment = BodyEnvironment::with_defaults();
    let report = run_scenario(&quick_scenario(), &environment).expect("pipeline runs");
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, b"occupied").expect("blocker file");

    let artifacts = write_artifacts(&report, &blocker);
    assert_eq!(artifacts.len(), 21);
    assert!(artifacts.iter().all(|a| !a.is_ok()));
    assert!(report.result().total_delta_v_km_s.is_finite());
}
