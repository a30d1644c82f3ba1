use lambert_bate::get_velocities;
use mga_core::vector::{Vector3, cross, norm};
use thiserror::Error;

const TOLERANCE: f64 = 1e-8;
const MAX_ITERATIONS: usize = 500;

#[derive(Debug, Error)]
pub enum LambertSolverError {
    #[error("lambert solver failed: {0}")]
    Failure(String),
    #[error("lambert inputs are degenerate: {0}")]
    Degenerate(&'static str),
}

/// Transfer branch of a zero-revolution Lambert arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambertPath {
    Short,
    Long,
}

/// Lambert arc between two positions with its boundary velocities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertArc {
    pub departure_position_km: Vector3,
    pub departure_velocity_km_s: Vector3,
    pub arrival_position_km: Vector3,
    pub arrival_velocity_km_s: Vector3,
    pub time_of_flight_s: f64,
    pub path: LambertPath,
}

pub fn solve(
    r1_km: [f64; 3],
    r2_km: [f64; 3],
    time_of_flight_s: f64,
    mu_km3_s2: f64,
    short: bool,
) -> Result<([f64; 3], [f64; 3]), LambertSolverError> {
    get_velocities(
        r1_km,
        r2_km,
        time_of_flight_s,
        mu_km3_s2,
        short,
        TOLERANCE,
        MAX_ITERATIONS,
    )
    .map_err(|e| LambertSolverError::Failure(format!("{e:?}")))
}

/// Branch that keeps the transfer prograde about the +z axis of the frame.
pub fn prograde_path(r1_km: &Vector3, r2_km: &Vector3) -> LambertPath {
    if cross(r1_km, r2_km)[2] >= 0.0 {
        LambertPath::Short
    } else {
        LambertPath::Long
    }
}

/// Solve the zero-revolution prograde Lambert arc and validate its output.
pub fn solve_prograde(
    r1_km: Vector3,
    r2_km: Vector3,
    time_of_flight_s: f64,
    mu_km3_s2: f64,
) -> Result<LambertArc, LambertSolverError> {
    if !(time_of_flight_s.is_finite() && time_of_flight_s > 0.0) {
        return Err(LambertSolverError::Degenerate("time of flight must be positive"));
    }
    if norm(&r1_km) == 0.0 || norm(&r2_km) == 0.0 {
        return Err(LambertSolverError::Degenerate("position at the attracting centre"));
    }
    let path = prograde_path(&r1_km, &r2_km);
    let (v1, v2) = solve(
        r1_km,
        r2_km,
        time_of_flight_s,
        mu_km3_s2,
        path == LambertPath::Short,
    )?;
    if !v1.iter().chain(v2.iter()).all(|c| c.is_finite()) {
        return Err(LambertSolverError::Failure(
            "non-finite boundary velocity".to_string(),
        ));
    }
    Ok(LambertArc {
        departure_position_km: r1_km,
        departure_velocity_km_s: v1,
        arrival_position_km: r2_km,
        arrival_velocity_km_s: v2,
        time_of_flight_s,
        path,
    })
}
