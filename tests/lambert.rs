use mga_trajectory::core::state;
use mga_trajectory::core::vector::{distance, dot, norm};
use mga_trajectory::impulsive::lambert::{self, LambertPath, LambertSolverError};
use mga_trajectory::orbits::propagate;

const MU_SUN: f64 = 1.327_124_400_18e11; // km^3 / s^2
const AU_KM: f64 = 149_597_870.7; // km

#[test]
fn lambert_quarter_orbit_matches_expected_velocity() {
    let r1 = [AU_KM, 0.0, 0.0];
    let r2 = [0.0, AU_KM, 0.0];
    let tof = (std::f64::consts::PI / 2.0) * (AU_KM.powi(3) / MU_SUN).sqrt();

    let (v1, v2) = lambert::solve(r1, r2, tof, MU_SUN, true).expect("lambert solve");

    let expected_speed = (MU_SUN / AU_KM).sqrt();
    assert!(
        (dot(&v1, &[0.0, 1.0, 0.0]) / norm(&v1)).abs() > 0.99,
        "expected near tangential velocity at departure: {:?}",
        v1
    );
    assert!(
        (dot(&v2, &[-1.0, 0.0, 0.0]) / norm(&v2)).abs() > 0.99,
        "expected near tangential velocity at arrival: {:?}",
        v2
    );
    assert!((norm(&v1) - expected_speed).abs() < 0.5);
    assert!((norm(&v2) - expected_speed).abs() < 0.5);
}

#[test]
fn prograde_branch_follows_angular_momentum() {
    let r1 = [AU_KM, 0.0, 0.0];
    assert_eq!(
        lambert::prograde_path(&r1, &[0.0, AU_KM, 0.0]),
        LambertPath::Short
    );
    assert_eq!(
        lambert::prograde_path(&r1, &[0.0, -AU_KM, 0.0]),
        LambertPath::Long
    );
}

#[test]
fn prograde_arc_is_consistent_with_kepler_propagation() {
    let angle = 200f64.to_radians();
    let r1 = [AU_KM, 0.0, 0.0];
    let r2 = [1.4 * AU_KM * angle.cos(), 1.4 * AU_KM * angle.sin(), 0.05 * AU_KM];
    let tof = 300.0 * 86_400.0;

    let arc = lambert::solve_prograde(r1, r2, tof, MU_SUN).expect("converges");
    assert_eq!(arc.path, LambertPath::Long);
    // Prograde: positive angular momentum about +z.
    let h_z = r1[0] * arc.departure_velocity_km_s[1] - r1[1] * arc.departure_velocity_km_s[0];
    assert!(h_z > 0.0);

    let start = state::join(&r1, &arc.departure_velocity_km_s);
    let end = propagate(&start, tof, MU_SUN).expect("kepler converges");
    assert!(
        distance(&state::position(&end), &r2) < 1e-6 * AU_KM,
        "arc misses target by {} km",
        distance(&state::position(&end), &r2)
    );
    assert!(distance(&state::velocity(&end), &arc.arrival_velocity_km_s) < 1e-6);
}

#[test]
fn degenerate_inputs_are_rejected() {
    let r1 = [AU_KM, 0.0, 0.0];
    let r2 = [0.0, AU_KM, 0.0];
    assert!(matches!(
        lambert::solve_prograde(r1, r2, 0.0, MU_SUN),
        Err(LambertSolverError::Degenerate(_))
    ));
    assert!(matches!(
        lambert::solve_prograde([0.0; 3], r2, 1.0e7, MU_SUN),
        Err(LambertSolverError::Degenerate(_))
    ));
}
