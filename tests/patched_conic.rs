use mga_trajectory::config::ScenarioConfig;
use mga_trajectory::dynamics::BodyEnvironment;
use mga_trajectory::impulsive::FlybyError;
use mga_trajectory::transfer::{
    LegType, ManeuverKind, PatchedConicProblem, TrajectoryError, TransferDefinition,
    solve_patched_conic,
};

fn solve(
    scenario: &ScenarioConfig,
) -> Result<mga_trajectory::transfer::PatchedConicSolution, TrajectoryError> {
    let environment = BodyEnvironment::with_defaults();
    let definition = TransferDefinition::from_scenario(scenario, &environment)?;
    solve_patched_conic(
        &PatchedConicProblem {
            sequence: &definition.sequence,
            legs: &definition.legs,
            central_body: &definition.central_body,
            capture_orbit: definition.capture_orbit,
            departure_orbit: definition.departure_orbit,
            samples_per_leg: definition.samples_per_leg,
        },
        &environment,
    )
}

#[test]
fn default_scenario_has_four_typed_legs() {
    let environment = BodyEnvironment::with_defaults();
    let definition = TransferDefinition::from_scenario(&ScenarioConfig::default(), &environment)
        .expect("default scenario is valid");
    let types: Vec<LegType> = definition.legs.iter().map(|l| l.leg_type).collect();
    assert_eq!(
        types,
        vec![
            LegType::Departure,
            LegType::Swingby,
            LegType::Swingby,
            LegType::Capture
        ]
    );
    assert_eq!(definition.legs.len(), definition.sequence.len() - 1);
    assert!(definition.legs.windows(2).all(|w| w[0].end_epoch_s == w[1].start_epoch_s));
    assert_eq!(definition.legs[1].min_periapsis_km, 6_251.8);
}

#[test]
fn default_scenario_budget_excludes_departure() {
    let solution = solve(&ScenarioConfig::default()).expect("default scenario solves");
    let result = &solution.result;

    let kinds: Vec<ManeuverKind> = result.maneuvers.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ManeuverKind::Departure,
            ManeuverKind::Flyby,
            ManeuverKind::Flyby,
            ManeuverKind::Flyby,
            ManeuverKind::Capture
        ]
    );
    assert!(result.total_delta_v_km_s.is_finite());
    let capture = result.capture_delta_v().expect("capture configured");
    assert!(capture.is_finite() && capture > 0.0);

    let expected: f64 = result
        .maneuvers
        .iter()
        .filter(|m| m.kind != ManeuverKind::Departure)
        .map(|m| m.delta_v_km_s)
        .sum();
    assert!((result.total_delta_v_km_s - expected).abs() < 1e-12);

    let departure = result.departure_delta_v().expect("departure reported");
    assert!(departure > 5.0 && departure < 20.0, "departure v_inf {departure}");
    assert!(
        result.total_delta_v_km_s > 0.5 && result.total_delta_v_km_s < 10.0,
        "total {}",
        result.total_delta_v_km_s
    );

    for flyby in result.maneuvers.iter().filter(|m| m.kind == ManeuverKind::Flyby) {
        let rp = flyby.periapsis_radius_km.expect("swing-by periapsis");
        assert!(rp >= 6_251.8, "{} swing-by at {rp} km", flyby.body);
    }
    assert_eq!(solution.histories.len(), 4);
    assert!(solution.histories.iter().all(|h| h.len() == 500));
}

#[test]
fn analytic_histories_span_their_legs() {
    let environment = BodyEnvironment::with_defaults();
    let scenario = ScenarioConfig::default();
    let definition =
        TransferDefinition::from_scenario(&scenario, &environment).expect("valid scenario");
    let solution = solve(&scenario).expect("solves");
    for (leg, history) in definition.legs.iter().zip(&solution.histories) {
        let first = history.first().expect("non-empty");
        let last = history.last().expect("non-empty");
        assert_eq!(first.epoch_s, leg.start_epoch_s);
        assert_eq!(last.epoch_s, leg.end_epoch_s);
        assert!(history.samples.windows(2).all(|w| w[1].epoch_s > w[0].epoch_s));
    }
}

#[test]
fn solving_is_idempotent() {
    let a = solve(&ScenarioConfig::default()).expect("solves");
    let b = solve(&ScenarioConfig::default()).expect("solves");
    assert_eq!(a.result, b.result);
    assert_eq!(a.histories, b.histories);
}

#[test]
fn without_capture_the_sentinel_is_nan() {
    let scenario = ScenarioConfig {
        capture: None,
        ..ScenarioConfig::default()
    };
    let solution = solve(&scenario).expect("solves");
    let result = &solution.result;
    assert!(result.capture_delta_v_km_s.is_nan());
    assert_eq!(result.capture_delta_v(), None);
    assert!(result.maneuvers.iter().all(|m| m.kind != ManeuverKind::Capture));
    let flybys: f64 = result
        .maneuvers
        .iter()
        .filter(|m| m.kind == ManeuverKind::Flyby)
        .map(|m| m.delta_v_km_s)
        .sum();
    assert!((result.total_delta_v_km_s - flybys).abs() < 1e-12);
}

#[test]
fn departure_orbit_turns_excess_speed_into_escape_burn() {
    let plain = solve(&ScenarioConfig::default()).expect("solves");
    let scenario = ScenarioConfig {
        departure: Some(mga_trajectory::config::OrbitShapeConfig {
            semi_major_axis_km: 6_678.0,
            eccentricity: 0.0,
        }),
        ..ScenarioConfig::default()
    };
    let parked = solve(&scenario).expect("solves");
    let v_inf = plain.result.departure_delta_v().expect("departure");
    let escape = parked.result.departure_delta_v().expect("departure");
    let mu: f64 = 398_600.435_507;
    let expected = (v_inf * v_inf + 2.0 * mu / 6_678.0).sqrt() - (mu / 6_678.0).sqrt();
    assert!((escape - expected).abs() < 1e-9);
    assert_eq!(plain.result.total_delta_v_km_s, parked.result.total_delta_v_km_s);
}

#[test]
fn swing_by_below_physical_radius_is_infeasible() {
    let mut scenario = ScenarioConfig::default();
    // Shorter Venus-Venus resonance demands a deep second Venus pass.
    scenario.parameters[2] = 360.0;
    scenario
        .min_periapsis_overrides_km
        .insert("Venus".to_string(), 1_000.0);

    match solve(&scenario) {
        Err(TrajectoryError::InfeasibleLeg {
            leg, body, source, ..
        }) => {
            assert_eq!(leg, 2);
            assert_eq!(body, "Venus");
            match source {
                FlybyError::Infeasible {
                    required_periapsis_km,
                    bound_km,
                    ..
                } => {
                    assert_eq!(bound_km, 6_051.8);
                    assert!(required_periapsis_km < bound_km);
                }
                other => panic!("unexpected flyby error {other:?}"),
            }
        }
        other => panic!("expected an infeasible swing-by, got {other:?}"),
    }
}

#[test]
fn invalid_case_selector_is_a_configuration_error() {
    let mut scenario = ScenarioConfig::default();
    if let Some(last) = scenario.parameters.last_mut() {
        *last = 9.0;
    }
    assert!(matches!(
        solve(&scenario),
        Err(TrajectoryError::Configuration(_))
    ));
}

#[test]
fn unknown_body_is_an_environment_error() {
    let scenario = ScenarioConfig {
        trailing_bodies: vec!["Vulcan".to_string()],
        ..ScenarioConfig::default()
    };
    assert!(matches!(
        solve(&scenario),
        Err(TrajectoryError::Environment { leg: 3, .. })
    ));
}
