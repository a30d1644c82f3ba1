use std::sync::Arc;

use log::debug;
use mga_config::{BodyConfig, default_bodies};
use mga_core::state::{self, State6};
use mga_ephemeris::{Ephemeris, EphemerisError, MeanElementEphemeris};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("body `{0}` is missing from the body catalog")]
    UnknownBody(String),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

/// Read-only view of the bodies a trajectory is flown through.
pub trait EnvironmentProvider: Send + Sync {
    fn gravitational_parameter(&self, body: &str) -> Result<f64, EnvironmentError>;

    /// Physical radius in kilometres.
    fn radius(&self, body: &str) -> Result<f64, EnvironmentError>;

    /// Heliocentric state at `epoch_s` seconds past J2000.
    fn state(&self, body: &str, epoch_s: f64) -> Result<State6, EnvironmentError>;

    /// Catalogued minimum swing-by periapsis, if the environment carries one.
    fn min_periapsis(&self, _body: &str) -> Option<f64> {
        None
    }
}

/// Body catalog combined with an ephemeris source.
#[derive(Clone)]
pub struct BodyEnvironment {
    bodies: Vec<BodyConfig>,
    ephemeris: Arc<dyn Ephemeris>,
}

impl BodyEnvironment {
    pub fn new(bodies: Vec<BodyConfig>, ephemeris: Arc<dyn Ephemeris>) -> Self {
        debug!(
            "environment with {} bodies on the {} ephemeris",
            bodies.len(),
            ephemeris.name()
        );
        Self { bodies, ephemeris }
    }

    /// Built-in catalog with the mean-element planetary ephemeris.
    pub fn with_defaults() -> Self {
        Self::new(default_bodies(), Arc::new(MeanElementEphemeris::new()))
    }

    pub fn bodies(&self) -> &[BodyConfig] {
        &self.bodies
    }

    pub fn ephemeris_name(&self) -> &'static str {
        self.ephemeris.name()
    }

    fn body(&self, name: &str) -> Result<&BodyConfig, EnvironmentError> {
        self.bodies
            .iter()
            .find(|b| b.is_named(name))
            .ok_or_else(|| EnvironmentError::UnknownBody(name.to_string()))
    }
}

impl std::fmt::Debug for BodyEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyEnvironment")
            .field("bodies", &self.bodies.len())
            .field("ephemeris", &self.ephemeris.name())
            .finish()
    }
}

impl EnvironmentProvider for BodyEnvironment {
    fn gravitational_parameter(&self, body: &str) -> Result<f64, EnvironmentError> {
        Ok(self.body(body)?.mu_km3_s2)
    }

    fn radius(&self, body: &str) -> Result<f64, EnvironmentError> {
        Ok(self.body(body)?.radius_km)
    }

    fn state(&self, body: &str, epoch_s: f64) -> Result<State6, EnvironmentError> {
        let sv = self.ephemeris.state_vector(body, epoch_s)?;
        Ok(state::join(&sv.position_km, &sv.velocity_km_s))
    }

    fn min_periapsis(&self, body: &str) -> Option<f64> {
        self.body(body).ok().and_then(|b| b.min_periapsis_km)
    }
}
