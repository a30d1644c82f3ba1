//! Orbit utility helpers: two-body propagation and patched-conic escape/capture estimates.

pub mod kepler;

pub use kepler::{KeplerError, propagate};

/// Closed conic described by semi-major axis and eccentricity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicOrbit {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
}

impl ConicOrbit {
    pub fn circular(radius_km: f64) -> Self {
        Self {
            semi_major_axis_km: radius_km,
            eccentricity: 0.0,
        }
    }

    pub fn periapsis_radius_km(&self) -> f64 {
        self.semi_major_axis_km * (1.0 - self.eccentricity)
    }

    /// Speed at periapsis from the vis-viva relation.
    pub fn periapsis_speed(&self, mu_km3_s2: f64) -> f64 {
        let rp = self.periapsis_radius_km();
        (mu_km3_s2 * (2.0 / rp - 1.0 / self.semi_major_axis_km)).sqrt()
    }

    fn validate(&self) -> Result<(), KeplerError> {
        let a = self.semi_major_axis_km;
        let e = self.eccentricity;
        if !(a.is_finite() && a > 0.0) || !(0.0..1.0).contains(&e) {
            return Err(KeplerError::InvalidOrbit {
                semi_major_axis_km: a,
                eccentricity: e,
            });
        }
        Ok(())
    }
}

/// Speed at periapsis radius `rp` on a hyperbola with excess speed `vinf`.
#[inline]
pub fn hyperbolic_periapsis_speed(mu_km3_s2: f64, periapsis_km: f64, vinf_km_s: f64) -> f64 {
    (vinf_km_s * vinf_km_s + 2.0 * mu_km3_s2 / periapsis_km).sqrt()
}

/// Patched-conic escape delta-v from a bound parking orbit, burn at its periapsis.
pub fn escape_delta_v(
    mu_km3_s2: f64,
    orbit: &ConicOrbit,
    vinf_km_s: f64,
) -> Result<f64, KeplerError> {
    periapsis_burn(mu_km3_s2, orbit, vinf_km_s)
}

/// Patched-conic insertion delta-v onto a bound target orbit, burn at its periapsis.
pub fn capture_delta_v(
    mu_km3_s2: f64,
    orbit: &ConicOrbit,
    vinf_km_s: f64,
) -> Result<f64, KeplerError> {
    periapsis_burn(mu_km3_s2, orbit, vinf_km_s)
}

fn periapsis_burn(mu_km3_s2: f64, orbit: &ConicOrbit, vinf_km_s: f64) -> Result<f64, KeplerError> {
    orbit.validate()?;
    let rp = orbit.periapsis_radius_km();
    let hyperbolic = hyperbolic_periapsis_speed(mu_km3_s2, rp, vinf_km_s);
    Ok((hyperbolic - orbit.periapsis_speed(mu_km3_s2)).abs())
}
