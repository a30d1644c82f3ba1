//! Powered swing-by matching of incoming and outgoing hyperbolic excess velocities.
//!
//! The burn is applied at periapsis. The periapsis radius is the one whose combined
//! half-turns of the incoming and outgoing hyperbolae equal the required bending:
//!
//! `asin(1 / (1 + rp·a²/μ)) + asin(1 / (1 + rp·b²/μ)) = δ`
//!
//! where `a`, `b` are the incoming/outgoing excess speeds and `δ` the angle between
//! the excess vectors. The cost is the difference of the two periapsis speeds.

use mga_core::vector::{Vector3, angle_between, norm};
use thiserror::Error;

const TURN_EPSILON: f64 = 1e-12;
const BISECTION_ITERATIONS: usize = 200;
const BRACKET_DOUBLINGS: usize = 2_000;

#[derive(Debug, Error, PartialEq)]
pub enum FlybyError {
    #[error(
        "swing-by needs periapsis {required_periapsis_km:.1} km below the admissible {bound_km:.1} km (turn {turn_angle_rad:.4} rad)"
    )]
    Infeasible {
        required_periapsis_km: f64,
        bound_km: f64,
        turn_angle_rad: f64,
    },
    #[error("invalid swing-by input: {0}")]
    InvalidInput(&'static str),
}

/// Result of a powered swing-by match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoweredFlyby {
    /// `f64::INFINITY` when no bending is needed.
    pub periapsis_radius_km: f64,
    pub turn_angle_rad: f64,
    pub v_inf_in_km_s: f64,
    pub v_inf_out_km_s: f64,
    pub delta_v_km_s: f64,
}

/// Match `v_inf_in` to `v_inf_out` about a body of gravitational parameter `mu_km3_s2`.
///
/// `periapsis_bound_km` is the smallest admissible periapsis radius; a required
/// periapsis below it is reported as [`FlybyError::Infeasible`], never clamped.
pub fn powered_flyby(
    v_inf_in: &Vector3,
    v_inf_out: &Vector3,
    mu_km3_s2: f64,
    periapsis_bound_km: f64,
) -> Result<PoweredFlyby, FlybyError> {
    if !(mu_km3_s2.is_finite() && mu_km3_s2 > 0.0) {
        return Err(FlybyError::InvalidInput("gravitational parameter must be positive"));
    }
    if !(periapsis_bound_km.is_finite() && periapsis_bound_km > 0.0) {
        return Err(FlybyError::InvalidInput("periapsis bound must be positive"));
    }
    let a = norm(v_inf_in);
    let b = norm(v_inf_out);
    if !(a.is_finite() && b.is_finite()) || a == 0.0 || b == 0.0 {
        return Err(FlybyError::InvalidInput("excess speeds must be finite and non-zero"));
    }
    let turn = angle_between(v_inf_in, v_inf_out);

    if turn < TURN_EPSILON {
        return Ok(PoweredFlyby {
            periapsis_radius_km: f64::INFINITY,
            turn_angle_rad: turn,
            v_inf_in_km_s: a,
            v_inf_out_km_s: b,
            delta_v_km_s: (b - a).abs(),
        });
    }

    let residual = |rp: f64| {
        (1.0 / (1.0 + rp * a * a / mu_km3_s2)).asin()
            + (1.0 / (1.0 + rp * b * b / mu_km3_s2)).asin()
            - turn
    };

    // The achievable bending decreases monotonically with rp.
    if residual(periapsis_bound_km) < 0.0 {
        let required = bisect(&residual, 0.0, periapsis_bound_km);
        return Err(FlybyError::Infeasible {
            required_periapsis_km: required,
            bound_km: periapsis_bound_km,
            turn_angle_rad: turn,
        });
    }

    let mut hi = periapsis_bound_km;
    for _ in 0..BRACKET_DOUBLINGS {
        if residual(hi) <= 0.0 {
            break;
        }
        hi *= 2.0;
    }
    let rp = bisect(&residual, periapsis_bound_km, hi);

    let periapsis_in = (a * a + 2.0 * mu_km3_s2 / rp).sqrt();
    let periapsis_out = (b * b + 2.0 * mu_km3_s2 / rp).sqrt();
    Ok(PoweredFlyby {
        periapsis_radius_km: rp,
        turn_angle_rad: turn,
        v_inf_in_km_s: a,
        v_inf_out_km_s: b,
        delta_v_km_s: (periapsis_out - periapsis_in).abs(),
    })
}

/// Root of a decreasing function bracketed by `[lo, hi]`.
fn bisect<F: Fn(f64) -> f64>(f: &F, mut lo: f64, mut hi: f64) -> f64 {
    for _ in 0..BISECTION_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if f(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= 1e-12 * hi.max(1.0) {
            break;
        }
    }
    0.5 * (lo + hi)
}
