//! Patched-conic solution of a multi-leg gravity-assist chain.
//!
//! Every leg is a zero-revolution prograde Lambert arc between the departure body at
//! the leg start and the arrival body at the leg end. Interior bodies are matched by
//! powered swing-bys; a capture leg ends with an insertion burn at periapsis of the
//! target orbit. The departure manoeuvre is reported but not counted in the total.

use log::debug;
use mga_core::state::{self, State6};
use mga_core::vector::{Vector3, norm, sub};
use mga_dynamics::EnvironmentProvider;
use mga_impulsive::flyby::powered_flyby;
use mga_impulsive::lambert::{LambertArc, solve_prograde};
use mga_orbits::{ConicOrbit, capture_delta_v, escape_delta_v, propagate};
use serde::Serialize;

use crate::error::{ConfigurationError, TrajectoryError};
use crate::legs::{BodySequence, Leg, LegType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverKind {
    Departure,
    Flyby,
    Capture,
}

/// Impulsive velocity change applied at a sequence body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Maneuver {
    pub leg_index: usize,
    pub kind: ManeuverKind,
    pub body: String,
    pub epoch_s: f64,
    pub position_km: Vector3,
    pub delta_v_km_s: f64,
    /// Swing-by periapsis radius; `None` for departure and capture burns.
    pub periapsis_radius_km: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSample {
    pub epoch_s: f64,
    pub state: State6,
}

/// Time-ordered states of the propagated body over one leg.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegStateHistory {
    pub leg_index: usize,
    pub samples: Vec<StateSample>,
}

impl LegStateHistory {
    pub fn from_pairs(leg_index: usize, pairs: impl IntoIterator<Item = (f64, State6)>) -> Self {
        Self {
            leg_index,
            samples: pairs
                .into_iter()
                .map(|(epoch_s, state)| StateSample { epoch_s, state })
                .collect(),
        }
    }

    pub fn pairs(&self) -> Vec<(f64, State6)> {
        self.samples.iter().map(|s| (s.epoch_s, s.state)).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&StateSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&StateSample> {
        self.samples.last()
    }
}

/// Velocity-change budget of a patched-conic trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryResult {
    /// Sum of all non-departure manoeuvres (km/s).
    pub total_delta_v_km_s: f64,
    /// Capture insertion cost, `NaN` when the trajectory has no capture leg.
    pub capture_delta_v_km_s: f64,
    pub maneuvers: Vec<Maneuver>,
}

impl TrajectoryResult {
    pub fn capture_delta_v(&self) -> Option<f64> {
        (!self.capture_delta_v_km_s.is_nan()).then_some(self.capture_delta_v_km_s)
    }

    pub fn departure_delta_v(&self) -> Option<f64> {
        self.maneuvers
            .iter()
            .find(|m| m.kind == ManeuverKind::Departure)
            .map(|m| m.delta_v_km_s)
    }
}

/// Inputs of the patched-conic solver.
#[derive(Debug, Clone)]
pub struct PatchedConicProblem<'a> {
    pub sequence: &'a BodySequence,
    pub legs: &'a [Leg],
    pub central_body: &'a str,
    pub capture_orbit: Option<ConicOrbit>,
    pub departure_orbit: Option<ConicOrbit>,
    /// Analytic samples per leg, both leg boundaries included.
    pub samples_per_leg: usize,
}

/// Budget, Lambert arcs, and analytic histories of a solved trajectory.
#[derive(Debug, Clone)]
pub struct PatchedConicSolution {
    pub result: TrajectoryResult,
    pub arcs: Vec<LambertArc>,
    pub histories: Vec<LegStateHistory>,
}

struct LegEndpoints {
    arc: LambertArc,
    departure_body_state: State6,
    arrival_body_state: State6,
}

impl LegEndpoints {
    fn v_inf_out(&self) -> Vector3 {
        sub(
            &self.arc.departure_velocity_km_s,
            &state::velocity(&self.departure_body_state),
        )
    }

    fn v_inf_in(&self) -> Vector3 {
        sub(
            &self.arc.arrival_velocity_km_s,
            &state::velocity(&self.arrival_body_state),
        )
    }
}

pub fn solve_patched_conic(
    problem: &PatchedConicProblem<'_>,
    environment: &dyn EnvironmentProvider,
) -> Result<PatchedConicSolution, TrajectoryError> {
    validate_problem(problem)?;
    let central = problem.central_body;
    let mu_central = lookup(0, central, f64::NAN, || {
        environment.gravitational_parameter(central)
    })?;

    let mut endpoints = Vec::with_capacity(problem.legs.len());
    for leg in problem.legs {
        endpoints.push(solve_leg(leg, central, mu_central, environment)?);
    }

    let mut maneuvers = Vec::with_capacity(problem.legs.len() + 1);
    for (leg, ends) in problem.legs.iter().zip(&endpoints) {
        let body = &leg.departure_body;
        let epoch_s = leg.start_epoch_s;
        let position_km = state::position(&ends.departure_body_state);
        let mu = lookup(leg.index, body, epoch_s, || {
            environment.gravitational_parameter(body)
        })?;
        let maneuver = if leg.index == 0 {
            let v_inf = norm(&ends.v_inf_out());
            let delta_v_km_s = match &problem.departure_orbit {
                Some(orbit) => escape_delta_v(mu, orbit, v_inf).map_err(|source| {
                    ConfigurationError::InvalidOrbit {
                        which: "departure",
                        source,
                    }
                })?,
                None => v_inf,
            };
            debug!("leg 0: departure from {body}, v_inf {v_inf:.4} km/s");
            Maneuver {
                leg_index: 0,
                kind: ManeuverKind::Departure,
                body: body.clone(),
                epoch_s,
                position_km,
                delta_v_km_s,
                periapsis_radius_km: None,
            }
        } else {
            let radius = lookup(leg.index, body, epoch_s, || environment.radius(body))?;
            let bound = leg.min_periapsis_km.max(radius);
            let incoming = endpoints[leg.index - 1].v_inf_in();
            let flyby = powered_flyby(&incoming, &ends.v_inf_out(), mu, bound).map_err(
                |source| TrajectoryError::InfeasibleLeg {
                    leg: leg.index,
                    body: body.clone(),
                    epoch_s,
                    source,
                },
            )?;
            debug!(
                "leg {}: swing-by of {body}, rp {:.1} km, dv {:.4} km/s",
                leg.index, flyby.periapsis_radius_km, flyby.delta_v_km_s
            );
            Maneuver {
                leg_index: leg.index,
                kind: ManeuverKind::Flyby,
                body: body.clone(),
                epoch_s,
                position_km,
                delta_v_km_s: flyby.delta_v_km_s,
                periapsis_radius_km: Some(flyby.periapsis_radius_km),
            }
        };
        maneuvers.push(maneuver);
    }

    let mut capture_delta_v_km_s = f64::NAN;
    if let (Some(last), Some(ends)) = (problem.legs.last(), endpoints.last()) {
        if last.leg_type == LegType::Capture {
            let orbit = problem
                .capture_orbit
                .ok_or(ConfigurationError::MissingCaptureOrbit)?;
            let body = &last.arrival_body;
            let mu = lookup(last.index, body, last.end_epoch_s, || {
                environment.gravitational_parameter(body)
            })?;
            let v_inf = norm(&ends.v_inf_in());
            capture_delta_v_km_s = capture_delta_v(mu, &orbit, v_inf).map_err(|source| {
                ConfigurationError::InvalidOrbit {
                    which: "capture",
                    source,
                }
            })?;
            debug!(
                "leg {}: capture at {body}, v_inf {v_inf:.4} km/s, dv {capture_delta_v_km_s:.4} km/s",
                last.index
            );
            maneuvers.push(Maneuver {
                leg_index: last.index,
                kind: ManeuverKind::Capture,
                body: body.clone(),
                epoch_s: last.end_epoch_s,
                position_km: state::position(&ends.arrival_body_state),
                delta_v_km_s: capture_delta_v_km_s,
                periapsis_radius_km: None,
            });
        }
    }

    let total_delta_v_km_s = maneuvers
        .iter()
        .filter(|m| m.kind != ManeuverKind::Departure)
        .map(|m| m.delta_v_km_s)
        .sum();

    let mut histories = Vec::with_capacity(problem.legs.len());
    for (leg, ends) in problem.legs.iter().zip(&endpoints) {
        histories.push(sample_leg(
            leg,
            &ends.arc,
            central,
            mu_central,
            problem.samples_per_leg,
            environment,
        )?);
    }

    Ok(PatchedConicSolution {
        result: TrajectoryResult {
            total_delta_v_km_s,
            capture_delta_v_km_s,
            maneuvers,
        },
        arcs: endpoints.into_iter().map(|e| e.arc).collect(),
        histories,
    })
}

fn validate_problem(problem: &PatchedConicProblem<'_>) -> Result<(), ConfigurationError> {
    if problem.legs.len() != problem.sequence.leg_count() {
        return Err(ConfigurationError::MalformedSequence {
            reason: format!(
                "{} legs for a sequence of {} bodies",
                problem.legs.len(),
                problem.sequence.len()
            ),
        });
    }
    for (position, (leg, pair)) in problem
        .legs
        .iter()
        .zip(problem.sequence.bodies().windows(2))
        .enumerate()
    {
        if leg.index != position || leg.departure_body != pair[0] || leg.arrival_body != pair[1] {
            return Err(ConfigurationError::MalformedSequence {
                reason: format!("leg {} does not connect {} and {}", leg.index, pair[0], pair[1]),
            });
        }
    }
    if problem.samples_per_leg < 2 {
        return Err(ConfigurationError::InvalidSetting {
            name: "analytic samples per leg",
            value: problem.samples_per_leg as f64,
        });
    }
    Ok(())
}

fn lookup<T>(
    leg: usize,
    body: &str,
    epoch_s: f64,
    query: impl FnOnce() -> Result<T, mga_dynamics::EnvironmentError>,
) -> Result<T, TrajectoryError> {
    query().map_err(|source| TrajectoryError::Environment {
        leg,
        body: body.to_string(),
        epoch_s,
        source,
    })
}

fn relative_state(
    leg: usize,
    body: &str,
    central: &str,
    epoch_s: f64,
    environment: &dyn EnvironmentProvider,
) -> Result<State6, TrajectoryError> {
    let body_state = lookup(leg, body, epoch_s, || environment.state(body, epoch_s))?;
    let central_state = lookup(leg, central, epoch_s, || environment.state(central, epoch_s))?;
    let mut relative = body_state;
    for k in 0..6 {
        relative[k] -= central_state[k];
    }
    Ok(relative)
}

fn solve_leg(
    leg: &Leg,
    central: &str,
    mu_central: f64,
    environment: &dyn EnvironmentProvider,
) -> Result<LegEndpoints, TrajectoryError> {
    let departure_body_state = relative_state(
        leg.index,
        &leg.departure_body,
        central,
        leg.start_epoch_s,
        environment,
    )?;
    let arrival_body_state = relative_state(
        leg.index,
        &leg.arrival_body,
        central,
        leg.end_epoch_s,
        environment,
    )?;
    let arc = solve_prograde(
        state::position(&departure_body_state),
        state::position(&arrival_body_state),
        leg.duration_s(),
        mu_central,
    )
    .map_err(|source| TrajectoryError::SolverConvergence {
        leg: leg.index,
        epoch_s: leg.start_epoch_s,
        source,
    })?;
    Ok(LegEndpoints {
        arc,
        departure_body_state,
        arrival_body_state,
    })
}

/// Kepler-propagate the Lambert arc on an even epoch grid spanning the leg.
fn sample_leg(
    leg: &Leg,
    arc: &LambertArc,
    central: &str,
    mu_central: f64,
    samples: usize,
    environment: &dyn EnvironmentProvider,
) -> Result<LegStateHistory, TrajectoryError> {
    let initial = state::join(&arc.departure_position_km, &arc.departure_velocity_km_s);
    let spacing = leg.duration_s() / (samples - 1) as f64;
    let mut history = LegStateHistory {
        leg_index: leg.index,
        samples: Vec::with_capacity(samples),
    };
    for k in 0..samples {
        let epoch_s = if k + 1 == samples {
            leg.end_epoch_s
        } else {
            leg.start_epoch_s + k as f64 * spacing
        };
        let relative = propagate(&initial, epoch_s - leg.start_epoch_s, mu_central).map_err(
            |source| TrajectoryError::AnalyticPropagation {
                leg: leg.index,
                epoch_s,
                source,
            },
        )?;
        let mut absolute = lookup(leg.index, central, epoch_s, || {
            environment.state(central, epoch_s)
        })?;
        for n in 0..6 {
            absolute[n] += relative[n];
        }
        history.samples.push(StateSample {
            epoch_s,
            state: absolute,
        });
    }
    Ok(history)
}
