//! End-to-end pipeline: scenario decoding, patched-conic solve, and reconciliation.

use std::time::{Duration, Instant};

use log::info;
use mga_config::{
    IntegratorSchemeConfig, OrbitShapeConfig, ScenarioConfig, default_min_periapsis_km,
};
use mga_dynamics::{
    EnvironmentProvider, IntegratorSettings, LagrangeInterpolator, LegAccelerationModel,
    RungeKuttaScheme, build_leg_acceleration_models,
};
use mga_orbits::ConicOrbit;

use crate::error::{ConfigurationError, ReconciliationError, TrajectoryError};
use crate::legs::{BodySequence, Leg, build_legs, case_sequence, decode_parameters, leg_types};
use crate::patched_conic::{
    PatchedConicProblem, PatchedConicSolution, TrajectoryResult, solve_patched_conic,
};
use crate::reconcile::{ReconcileSettings, ReconciledLeg, reconcile_legs};

/// Fully validated description of one transfer.
#[derive(Debug, Clone)]
pub struct TransferDefinition {
    pub sequence: BodySequence,
    pub legs: Vec<Leg>,
    pub central_body: String,
    pub propagated_body: String,
    pub capture_orbit: Option<ConicOrbit>,
    pub departure_orbit: Option<ConicOrbit>,
    pub samples_per_leg: usize,
    pub reconcile: ReconcileSettings,
}

impl TransferDefinition {
    /// Decode a scenario manifest against the bodies known to `environment`.
    pub fn from_scenario(
        scenario: &ScenarioConfig,
        environment: &dyn EnvironmentProvider,
    ) -> Result<Self, TrajectoryError> {
        let body_count = scenario.leading_bodies.len() + 2 + scenario.trailing_bodies.len();
        let leg_count = body_count - 1;
        let parameters = decode_parameters(&scenario.parameters, leg_count)?;
        let sequence = case_sequence(
            parameters.case_index,
            &scenario.leading_bodies,
            &scenario.trailing_bodies,
        )?;

        let min_periapsis: Vec<f64> = sequence
            .bodies()
            .iter()
            .map(|body| resolve_min_periapsis(scenario, environment, body))
            .collect();
        let types = leg_types(leg_count, scenario.capture.is_some());
        let legs = build_legs(
            &sequence,
            &types,
            parameters.start_epoch_s,
            &parameters.durations_s,
            &min_periapsis,
        )?;

        let integrator = &scenario.integrator;
        if !(integrator.step_seconds.is_finite() && integrator.step_seconds > 0.0) {
            return Err(ConfigurationError::InvalidSetting {
                name: "integrator step",
                value: integrator.step_seconds,
            }
            .into());
        }
        if integrator.max_steps == 0 {
            return Err(ConfigurationError::InvalidSetting {
                name: "integrator max steps",
                value: 0.0,
            }
            .into());
        }
        if scenario.analytic_samples_per_leg < LagrangeInterpolator::DEFAULT_ORDER {
            return Err(ConfigurationError::InvalidSetting {
                name: "analytic samples per leg",
                value: scenario.analytic_samples_per_leg as f64,
            }
            .into());
        }
        let scheme = match integrator.scheme {
            IntegratorSchemeConfig::RungeKutta4 => RungeKuttaScheme::RungeKutta4,
            IntegratorSchemeConfig::RungeKutta38 => RungeKuttaScheme::RungeKutta38,
        };

        Ok(Self {
            sequence,
            legs,
            central_body: scenario.central_body.clone(),
            propagated_body: scenario.propagated_body.clone(),
            capture_orbit: scenario.capture.map(conic),
            departure_orbit: scenario.departure.map(conic),
            samples_per_leg: scenario.analytic_samples_per_leg,
            reconcile: ReconcileSettings {
                integrator: IntegratorSettings {
                    scheme,
                    step_s: integrator.step_seconds,
                    max_steps: integrator.max_steps,
                },
                interpolation_order: LagrangeInterpolator::DEFAULT_ORDER,
                parallel: scenario.parallel,
            },
        })
    }

    /// Distinct sequence bodies followed by the central body.
    pub fn monitored_bodies(&self) -> Vec<String> {
        let mut bodies = self.sequence.unique_bodies();
        if !bodies
            .iter()
            .any(|b| b.eq_ignore_ascii_case(&self.central_body))
        {
            bodies.push(self.central_body.clone());
        }
        bodies
    }

    pub fn acceleration_models(&self) -> Vec<LegAccelerationModel> {
        build_leg_acceleration_models(
            self.legs.len(),
            &self.central_body,
            &self.propagated_body,
            self.sequence.bodies(),
        )
    }
}

fn conic(shape: OrbitShapeConfig) -> ConicOrbit {
    ConicOrbit {
        semi_major_axis_km: shape.semi_major_axis_km,
        eccentricity: shape.eccentricity,
    }
}

/// Override, then catalog, then built-in default; zero leaves only the physical radius.
fn resolve_min_periapsis(
    scenario: &ScenarioConfig,
    environment: &dyn EnvironmentProvider,
    body: &str,
) -> f64 {
    scenario
        .min_periapsis_overrides_km
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(body))
        .map(|(_, rp)| *rp)
        .or_else(|| environment.min_periapsis(body))
        .or_else(|| default_min_periapsis_km(body))
        .unwrap_or(0.0)
}

/// Outcome of a pipeline run.
#[derive(Debug)]
pub struct TransferReport {
    pub definition: TransferDefinition,
    pub models: Vec<LegAccelerationModel>,
    pub solution: PatchedConicSolution,
    pub reconciled: Vec<Result<ReconciledLeg, ReconciliationError>>,
    /// Wall-clock time of the numerical phase.
    pub numerical_duration: Duration,
}

impl TransferReport {
    pub fn result(&self) -> &TrajectoryResult {
        &self.solution.result
    }

    pub fn failed_legs(&self) -> impl Iterator<Item = &ReconciliationError> {
        self.reconciled.iter().filter_map(|r| r.as_ref().err())
    }
}

/// Solve the patched-conic trajectory and reconcile it numerically.
///
/// Configuration, Lambert, and swing-by failures abort the run; integration failures
/// are recorded per leg in [`TransferReport::reconciled`].
pub fn run(
    definition: TransferDefinition,
    environment: &dyn EnvironmentProvider,
) -> Result<TransferReport, TrajectoryError> {
    info!(
        "solving {} legs through {}",
        definition.legs.len(),
        definition.sequence.bodies().join("-")
    );
    let solution = solve_patched_conic(
        &PatchedConicProblem {
            sequence: &definition.sequence,
            legs: &definition.legs,
            central_body: &definition.central_body,
            capture_orbit: definition.capture_orbit,
            departure_orbit: definition.departure_orbit,
            samples_per_leg: definition.samples_per_leg,
        },
        environment,
    )?;
    info!(
        "patched conic total dv {:.6} km/s",
        solution.result.total_delta_v_km_s
    );

    let models = definition.acceleration_models();
    let monitored = definition.monitored_bodies();
    let started = Instant::now();
    let reconciled = reconcile_legs(
        &definition.legs,
        &solution.histories,
        &models,
        &monitored,
        environment,
        &definition.reconcile,
    );
    let numerical_duration = started.elapsed();
    info!(
        "numerical reconciliation finished in {:.3} s ({} of {} legs succeeded)",
        numerical_duration.as_secs_f64(),
        reconciled.iter().filter(|r| r.is_ok()).count(),
        reconciled.len()
    );

    Ok(TransferReport {
        definition,
        models,
        solution,
        reconciled,
        numerical_duration,
    })
}

/// Decode `scenario` and run the full pipeline.
pub fn run_scenario(
    scenario: &ScenarioConfig,
    environment: &dyn EnvironmentProvider,
) -> Result<TransferReport, TrajectoryError> {
    let definition = TransferDefinition::from_scenario(scenario, environment)?;
    run(definition, environment)
}
