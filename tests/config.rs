use std::fs;

use mga_trajectory::config::{
    ConfigError, IntegratorSchemeConfig, ScenarioConfig, default_bodies, default_min_periapsis_km,
    load_bodies, load_scenario, merge_bodies,
};

#[test]
fn default_catalog_carries_minimum_periapsis_table() {
    let bodies = default_bodies();
    assert_eq!(bodies.len(), 9);
    assert_eq!(default_min_periapsis_km("venus"), Some(6_251.8));
    assert_eq!(default_min_periapsis_km("Jupiter"), Some(72_000.0));
    assert_eq!(default_min_periapsis_km("Sun"), None);
    for body in &bodies {
        if let Some(rp) = body.min_periapsis_km {
            assert!(rp > body.radius_km, "{}", body.name);
        }
    }
}

#[test]
fn scenario_toml_overrides_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("scenario.toml");
    fs::write(
        &path,
        r#"
parameters = [-1851.0, 94.0, 382.0, 56.0, 701.0, 2.0]
analytic_samples_per_leg = 250
parallel = false

[integrator]
scheme = "runge_kutta38"
step_seconds = 500.0

[min_periapsis_overrides_km]
Venus = 7000.0
"#,
    )
    .expect("write scenario");

    let scenario = load_scenario(&path).expect("valid scenario");
    assert_eq!(scenario.parameters.len(), 6);
    assert_eq!(scenario.analytic_samples_per_leg, 250);
    assert!(!scenario.parallel);
    assert_eq!(scenario.integrator.scheme, IntegratorSchemeConfig::RungeKutta38);
    assert_eq!(scenario.integrator.step_seconds, 500.0);
    assert_eq!(scenario.integrator.max_steps, 2_000_000);
    assert_eq!(scenario.min_periapsis_overrides_km.get("Venus"), Some(&7_000.0));
    assert_eq!(scenario.central_body, "Sun");
    assert_eq!(scenario.capture, ScenarioConfig::default().capture);
}

#[test]
fn scenario_yaml_is_accepted() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("scenario.yaml");
    fs::write(
        &path,
        "leading_bodies: [Earth]\ntrailing_bodies: []\nparameters: [0.0, 100.0, 150.0, 300.0, 4]\n",
    )
    .expect("write scenario");
    let scenario = load_scenario(&path).expect("valid scenario");
    assert_eq!(scenario.leading_bodies, vec!["Earth".to_string()]);
    assert!(scenario.trailing_bodies.is_empty());
}

#[test]
fn body_catalog_loads_and_merges() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bodies.yaml");
    fs::write(
        &path,
        "- name: Venus\n  mu_km3_s2: 324858.592\n  radius_km: 6051.8\n  min_periapsis_km: 8000.0\n\
         - name: Ceres\n  mu_km3_s2: 62.6284\n  radius_km: 469.7\n",
    )
    .expect("write bodies");

    let overrides = load_bodies(&path).expect("valid catalog");
    assert_eq!(overrides.len(), 2);
    let merged = merge_bodies(default_bodies(), overrides);
    assert_eq!(merged.len(), 10);
    let venus = merged.iter().find(|b| b.is_named("VENUS")).expect("venus");
    assert_eq!(venus.min_periapsis_km, Some(8_000.0));
}

#[test]
fn body_directory_of_toml_files_loads_sorted() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("b_mars.toml"),
        "name = \"Mars\"\nmu_km3_s2 = 42828.375214\nradius_km = 3396.19\n",
    )
    .expect("write mars");
    fs::write(
        dir.path().join("a_earth.toml"),
        "name = \"Earth\"\nmu_km3_s2 = 398600.435507\nradius_km = 6378.137\n",
    )
    .expect("write earth");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write notes");

    let bodies = load_bodies(dir.path()).expect("valid directory");
    let names: Vec<&str> = bodies.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Earth", "Mars"]);
}

#[test]
fn invalid_body_values_are_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "name = \"Bad\"\nmu_km3_s2 = -1.0\nradius_km = 10.0\n").expect("write");
    match load_bodies(&path) {
        Err(ConfigError::InvalidBody { name, field, .. }) => {
            assert_eq!(name, "Bad");
            assert_eq!(field, "gravitational parameter");
        }
        other => panic!("expected invalid body, got {other:?}"),
    }
}
