//! Error taxonomy of the transfer pipeline.

use std::fmt;

use mga_dynamics::{EnvironmentError, IntegrationFailure, InterpolationError};
use mga_impulsive::{FlybyError, LambertSolverError};
use mga_orbits::KeplerError;
use thiserror::Error;

/// Inputs that cannot describe a valid transfer.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("case selector {value} is not an integer in 0..={max}")]
    InvalidCaseSelector { value: f64, max: usize },
    #[error("parameter vector has {found} entries, expected {expected}")]
    ParameterCount { expected: usize, found: usize },
    #[error("malformed body sequence: {reason}")]
    MalformedSequence { reason: String },
    #[error("leg {leg} epochs are not increasing (start {start_s} s, end {end_s} s)")]
    NonIncreasingEpochs { leg: usize, start_s: f64, end_s: f64 },
    #[error("leg types are inconsistent with the sequence: {reason}")]
    InvalidLegTypes { reason: String },
    #[error("capture leg requested without a capture orbit")]
    MissingCaptureOrbit,
    #[error("invalid {which} orbit: {source}")]
    InvalidOrbit {
        which: &'static str,
        #[source]
        source: KeplerError,
    },
    #[error("invalid setting `{name}`: {value}")]
    InvalidSetting { name: &'static str, value: f64 },
}

/// Fatal failures of the patched-conic phase.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("leg {leg}: lambert arc from epoch {epoch_s} s did not converge: {source}")]
    SolverConvergence {
        leg: usize,
        epoch_s: f64,
        #[source]
        source: LambertSolverError,
    },
    #[error("leg {leg}: analytic propagation failed at epoch {epoch_s} s: {source}")]
    AnalyticPropagation {
        leg: usize,
        epoch_s: f64,
        #[source]
        source: KeplerError,
    },
    #[error("leg {leg}: swing-by of {body} at epoch {epoch_s} s is infeasible: {source}")]
    InfeasibleLeg {
        leg: usize,
        body: String,
        epoch_s: f64,
        #[source]
        source: FlybyError,
    },
    #[error("leg {leg}: environment lookup for {body} at epoch {epoch_s} s failed: {source}")]
    Environment {
        leg: usize,
        body: String,
        epoch_s: f64,
        #[source]
        source: EnvironmentError,
    },
}

/// Integration direction away from the leg midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Backward => f.write_str("backward"),
        }
    }
}

/// Failure confined to the numerical reconciliation of one leg.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    #[error("leg {leg}: no analytic history or acceleration model available")]
    MissingInput { leg: usize },
    #[error("leg {leg}: midpoint seed interpolation at {epoch_s} s failed: {source}")]
    Interpolation {
        leg: usize,
        epoch_s: f64,
        #[source]
        source: InterpolationError,
    },
    #[error("leg {leg}: {direction} integration failed: {source}")]
    Integration {
        leg: usize,
        direction: Direction,
        #[source]
        source: IntegrationFailure,
    },
    #[error("leg {leg}: distance to {body} at {epoch_s} s unavailable: {source}")]
    DependentVariable {
        leg: usize,
        body: String,
        epoch_s: f64,
        #[source]
        source: EnvironmentError,
    },
}

impl ReconciliationError {
    pub fn leg(&self) -> usize {
        match self {
            ReconciliationError::MissingInput { leg }
            | ReconciliationError::Interpolation { leg, .. }
            | ReconciliationError::Integration { leg, .. }
            | ReconciliationError::DependentVariable { leg, .. } => *leg,
        }
    }

    /// Epoch of the failure, `NaN` when none applies.
    pub fn epoch_s(&self) -> f64 {
        match self {
            ReconciliationError::MissingInput { .. } => f64::NAN,
            ReconciliationError::Interpolation { epoch_s, .. }
            | ReconciliationError::DependentVariable { epoch_s, .. } => *epoch_s,
            ReconciliationError::Integration { source, .. } => source.epoch_s(),
        }
    }
}
