//! Universal-variable two-body propagation.

use std::f64::consts::TAU;

use mga_core::state::{self, State6};
use mga_core::vector::{add, dot, norm, scale};
use thiserror::Error;

const MAX_ITERATIONS: usize = 200;
const TOLERANCE: f64 = 1e-12;

#[derive(Debug, Error, PartialEq)]
pub enum KeplerError {
    #[error("universal Kepler equation did not converge for dt = {dt_s} s")]
    NoConvergence { dt_s: f64 },
    #[error("degenerate two-body state: {0}")]
    Degenerate(&'static str),
    #[error("invalid target orbit (a = {semi_major_axis_km} km, e = {eccentricity})")]
    InvalidOrbit {
        semi_major_axis_km: f64,
        eccentricity: f64,
    },
}

/// Stumpff functions `(C(z), S(z))`.
pub fn stumpff(z: f64) -> (f64, f64) {
    if z.abs() < 1e-6 {
        let c = 0.5 - z / 24.0 + z * z / 720.0;
        let s = 1.0 / 6.0 - z / 120.0 + z * z / 5_040.0;
        (c, s)
    } else if z > 0.0 {
        let sz = z.sqrt();
        ((1.0 - sz.cos()) / z, (sz - sz.sin()) / (sz * sz * sz))
    } else {
        let sz = (-z).sqrt();
        ((sz.cosh() - 1.0) / -z, (sz.sinh() - sz) / (sz * sz * sz))
    }
}

/// Propagate a state `dt_s` seconds (either sign) on the conic about `mu_km3_s2`.
pub fn propagate(initial: &State6, dt_s: f64, mu_km3_s2: f64) -> Result<State6, KeplerError> {
    if dt_s == 0.0 {
        return Ok(*initial);
    }
    let r0_vec = state::position(initial);
    let v0_vec = state::velocity(initial);
    let r0 = norm(&r0_vec);
    let v0 = norm(&v0_vec);
    if r0 == 0.0 || !state::is_finite(initial) {
        return Err(KeplerError::Degenerate("position at the attracting centre"));
    }

    let sqrt_mu = mu_km3_s2.sqrt();
    let vr0 = dot(&r0_vec, &v0_vec) / r0;
    let alpha = 2.0 / r0 - v0 * v0 / mu_km3_s2;

    // Whole revolutions contribute nothing on a closed orbit.
    let mut dt = dt_s;
    if alpha > 1e-12 {
        let period = TAU / (sqrt_mu * alpha.powf(1.5));
        dt %= period;
    }

    let mut chi = sqrt_mu * alpha.abs() * dt;
    if alpha <= 1e-12 {
        chi = dt.signum() * (sqrt_mu * dt.abs() / r0).max(1e-3);
    }
    let mut converged = false;
    for _ in 0..MAX_ITERATIONS {
        let z = alpha * chi * chi;
        let (c, s) = stumpff(z);
        let f = r0 * vr0 / sqrt_mu * chi * chi * c
            + (1.0 - alpha * r0) * chi.powi(3) * s
            + r0 * chi
            - sqrt_mu * dt;
        let df = r0 * vr0 / sqrt_mu * chi * (1.0 - alpha * chi * chi * s)
            + (1.0 - alpha * r0) * chi * chi * c
            + r0;
        let step = f / df;
        chi -= step;
        if !chi.is_finite() {
            break;
        }
        if step.abs() <= TOLERANCE * chi.abs().max(1.0) {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(KeplerError::NoConvergence { dt_s });
    }

    let z = alpha * chi * chi;
    let (c, s) = stumpff(z);
    let f = 1.0 - chi * chi / r0 * c;
    let g = dt - chi.powi(3) / sqrt_mu * s;
    let r_vec = add(&scale(&r0_vec, f), &scale(&v0_vec, g));
    let r = norm(&r_vec);
    if r == 0.0 {
        return Err(KeplerError::Degenerate("propagated through the attracting centre"));
    }
    let fdot = sqrt_mu / (r * r0) * (alpha * chi.powi(3) * s - chi);
    let gdot = 1.0 - chi * chi / r * c;
    let v_vec = add(&scale(&r0_vec, fdot), &scale(&v0_vec, gdot));
    Ok(state::join(&r_vec, &v_vec))
}
