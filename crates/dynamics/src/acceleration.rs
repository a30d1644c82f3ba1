//! Gravitational perturber selection and force evaluation per trajectory leg.

use mga_core::state::{self, State6};
use mga_core::vector::{Vector3, norm, scale, sub};

use crate::environment::{EnvironmentError, EnvironmentProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityKind {
    /// Attracting body of the leg's reference frame.
    Central,
    /// Point-mass perturbation of a flyby body, direct and indirect terms.
    PointMass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GravitySource {
    pub body: String,
    pub kind: GravityKind,
}

/// Perturbation set acting on the propagated body during one leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegAccelerationModel {
    pub leg_index: usize,
    pub propagated_body: String,
    pub sources: Vec<GravitySource>,
}

/// Build one perturbation set per leg.
///
/// Leg `i` feels the central body plus the point masses of `sequence[i]` and
/// `sequence[i + 1]`; a body already present (same name, case-insensitive) is not
/// added twice.
pub fn build_leg_acceleration_models(
    leg_count: usize,
    central_body: &str,
    propagated_body: &str,
    sequence: &[String],
) -> Vec<LegAccelerationModel> {
    (0..leg_count)
        .map(|leg_index| {
            let mut sources = vec![GravitySource {
                body: central_body.to_string(),
                kind: GravityKind::Central,
            }];
            for body in sequence.iter().skip(leg_index).take(2) {
                let present = sources
                    .iter()
                    .any(|s| s.body.trim().eq_ignore_ascii_case(body.trim()));
                if !present {
                    sources.push(GravitySource {
                        body: body.clone(),
                        kind: GravityKind::PointMass,
                    });
                }
            }
            LegAccelerationModel {
                leg_index,
                propagated_body: propagated_body.to_string(),
                sources,
            }
        })
        .collect()
}

impl LegAccelerationModel {
    pub fn body_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.body.as_str())
    }

    pub fn central_body(&self) -> Option<&str> {
        self.sources
            .iter()
            .find(|s| s.kind == GravityKind::Central)
            .map(|s| s.body.as_str())
    }

    /// Total gravitational acceleration (km/s²) on a spacecraft at `position_km`.
    ///
    /// Point masses contribute their direct attraction minus the attraction they exert
    /// on the central body, since the frame is centred on it.
    pub fn acceleration(
        &self,
        environment: &dyn EnvironmentProvider,
        epoch_s: f64,
        position_km: &Vector3,
    ) -> Result<Vector3, EnvironmentError> {
        let central_position = match self.central_body() {
            Some(body) => Some(state::position(&environment.state(body, epoch_s)?)),
            None => None,
        };
        let mut total = [0.0; 3];
        for source in &self.sources {
            let mu = environment.gravitational_parameter(&source.body)?;
            let body_position = state::position(&environment.state(&source.body, epoch_s)?);
            let relative = sub(position_km, &body_position);
            let r = norm(&relative);
            let mut contribution = scale(&relative, -mu / (r * r * r));
            if let (GravityKind::PointMass, Some(centre)) = (source.kind, central_position) {
                let offset = sub(&body_position, &centre);
                let d = norm(&offset);
                contribution = sub(&contribution, &scale(&offset, mu / (d * d * d)));
            }
            for k in 0..3 {
                total[k] += contribution[k];
            }
        }
        Ok(total)
    }

    /// Time derivative of a Cartesian state under this model.
    pub fn derivative(
        &self,
        environment: &dyn EnvironmentProvider,
        epoch_s: f64,
        state: &State6,
    ) -> Result<State6, EnvironmentError> {
        let acc = self.acceleration(environment, epoch_s, &state::position(state))?;
        Ok(state::join(&state::velocity(state), &acc))
    }
}
