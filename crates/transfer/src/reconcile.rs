//! Numerical reconciliation of the analytic legs.
//!
//! Each leg is seeded at its time midpoint from the analytic history and integrated
//! forward to the leg end and backward to the leg start under its own acceleration
//! model. Legs are independent: a failure is reported for its leg only.

use std::collections::BTreeMap;

use log::{debug, warn};
use mga_core::state::{self, State6};
use mga_core::vector::distance;
use mga_dynamics::{
    EnvironmentProvider, IntegratorSettings, LagrangeInterpolator, LegAccelerationModel,
    integrate,
};
use rayon::prelude::*;

use crate::error::{Direction, ReconciliationError};
use crate::legs::Leg;
use crate::patched_conic::LegStateHistory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileSettings {
    /// Integrator settings; the sign of the step is ignored.
    pub integrator: IntegratorSettings,
    pub interpolation_order: usize,
    pub parallel: bool,
}

/// Distances from the propagated body to each monitored body at one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct DependentVariableSample {
    pub epoch_s: f64,
    pub distances_km: BTreeMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct ReconciledLeg {
    pub leg_index: usize,
    pub midpoint_epoch_s: f64,
    pub seed_state: State6,
    /// Midpoint to leg end.
    pub forward: LegStateHistory,
    /// Midpoint to leg start, in integration order.
    pub backward: LegStateHistory,
    /// Leg start to leg end with a single midpoint sample.
    pub merged: LegStateHistory,
    pub monitored_bodies: Vec<String>,
    pub dependent_variables: Vec<DependentVariableSample>,
}

/// Reconcile every leg; the output keeps leg order.
pub fn reconcile_legs(
    legs: &[Leg],
    analytic: &[LegStateHistory],
    models: &[LegAccelerationModel],
    monitored_bodies: &[String],
    environment: &dyn EnvironmentProvider,
    settings: &ReconcileSettings,
) -> Vec<Result<ReconciledLeg, ReconciliationError>> {
    let run = |leg: &Leg| {
        let outcome = match (analytic.get(leg.index), models.get(leg.index)) {
            (Some(history), Some(model)) => {
                reconcile_leg(leg, history, model, monitored_bodies, environment, settings)
            }
            _ => Err(ReconciliationError::MissingInput { leg: leg.index }),
        };
        if let Err(err) = &outcome {
            warn!("{err}");
        }
        outcome
    };
    if settings.parallel {
        legs.par_iter().map(run).collect()
    } else {
        legs.iter().map(run).collect()
    }
}

pub fn reconcile_leg(
    leg: &Leg,
    analytic: &LegStateHistory,
    model: &LegAccelerationModel,
    monitored_bodies: &[String],
    environment: &dyn EnvironmentProvider,
    settings: &ReconcileSettings,
) -> Result<ReconciledLeg, ReconciliationError> {
    let midpoint_epoch_s = leg.midpoint_epoch_s();
    let interpolation = |source| ReconciliationError::Interpolation {
        leg: leg.index,
        epoch_s: midpoint_epoch_s,
        source,
    };
    let interpolator = LagrangeInterpolator::new(&analytic.pairs(), settings.interpolation_order)
        .map_err(interpolation)?;
    let seed_state = interpolator
        .interpolate(midpoint_epoch_s)
        .map_err(interpolation)?;

    let derivative = |epoch_s: f64, y: &State6| model.derivative(environment, epoch_s, y);
    let forward_settings = IntegratorSettings {
        step_s: settings.integrator.step_s.abs(),
        ..settings.integrator
    };
    let forward = integrate(
        derivative,
        midpoint_epoch_s,
        &seed_state,
        leg.end_epoch_s,
        &forward_settings,
    )
    .map_err(|source| ReconciliationError::Integration {
        leg: leg.index,
        direction: Direction::Forward,
        source,
    })?;
    let backward = integrate(
        derivative,
        midpoint_epoch_s,
        &seed_state,
        leg.start_epoch_s,
        &forward_settings.reversed(),
    )
    .map_err(|source| ReconciliationError::Integration {
        leg: leg.index,
        direction: Direction::Backward,
        source,
    })?;

    let merged: Vec<(f64, State6)> = backward
        .iter()
        .rev()
        .chain(forward.iter().skip(1))
        .copied()
        .collect();

    let mut dependent_variables = Vec::with_capacity(merged.len());
    for (epoch_s, spacecraft) in &merged {
        let position = state::position(spacecraft);
        let mut distances_km = BTreeMap::new();
        for body in monitored_bodies {
            let body_state = environment.state(body, *epoch_s).map_err(|source| {
                ReconciliationError::DependentVariable {
                    leg: leg.index,
                    body: body.clone(),
                    epoch_s: *epoch_s,
                    source,
                }
            })?;
            distances_km.insert(
                body.clone(),
                distance(&position, &state::position(&body_state)),
            );
        }
        dependent_variables.push(DependentVariableSample {
            epoch_s: *epoch_s,
            distances_km,
        });
    }

    debug!(
        "leg {}: {} forward and {} backward steps about midpoint {midpoint_epoch_s} s",
        leg.index,
        forward.len() - 1,
        backward.len() - 1
    );

    Ok(ReconciledLeg {
        leg_index: leg.index,
        midpoint_epoch_s,
        seed_state,
        forward: LegStateHistory::from_pairs(leg.index, forward),
        backward: LegStateHistory::from_pairs(leg.index, backward),
        merged: LegStateHistory::from_pairs(leg.index, merged),
        monitored_bodies: monitored_bodies.to_vec(),
        dependent_variables,
    })
}
