//! Stateless fixed-step explicit Runge–Kutta integration.
//!
//! The same entry point integrates forward or backward in time: the sign of the step
//! must match the direction from the initial to the final epoch. The last step is
//! shortened so the history ends exactly on the final epoch.

use log::trace;
use mga_core::state::{self, State6};
use thiserror::Error;

use crate::environment::EnvironmentError;

/// Coefficients of an explicit Runge–Kutta method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButcherTableau {
    pub name: &'static str,
    /// Strictly lower-triangular stage coefficients, row `i` has `i` entries.
    pub a: &'static [&'static [f64]],
    pub b: &'static [f64],
    pub c: &'static [f64],
}

impl ButcherTableau {
    pub const RK4: ButcherTableau = ButcherTableau {
        name: "rk4",
        a: &[&[], &[0.5], &[0.0, 0.5], &[0.0, 0.0, 1.0]],
        b: &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
        c: &[0.0, 0.5, 0.5, 1.0],
    };

    /// Kutta's 3/8 rule.
    pub const RK38: ButcherTableau = ButcherTableau {
        name: "rk38",
        a: &[&[], &[1.0 / 3.0], &[-1.0 / 3.0, 1.0], &[1.0, -1.0, 1.0]],
        b: &[1.0 / 8.0, 3.0 / 8.0, 3.0 / 8.0, 1.0 / 8.0],
        c: &[0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0],
    };

    pub fn stages(&self) -> usize {
        self.b.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RungeKuttaScheme {
    #[default]
    RungeKutta4,
    RungeKutta38,
}

impl RungeKuttaScheme {
    pub fn tableau(self) -> &'static ButcherTableau {
        match self {
            RungeKuttaScheme::RungeKutta4 => &ButcherTableau::RK4,
            RungeKuttaScheme::RungeKutta38 => &ButcherTableau::RK38,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorSettings {
    pub scheme: RungeKuttaScheme,
    /// Signed step in seconds.
    pub step_s: f64,
    pub max_steps: usize,
}

impl IntegratorSettings {
    /// Same settings with the step sign flipped.
    pub fn reversed(&self) -> Self {
        Self {
            step_s: -self.step_s,
            ..*self
        }
    }
}

#[derive(Debug, Error)]
pub enum IntegrationFailure {
    #[error("integration step must be finite and non-zero, got {step_s}")]
    InvalidStep { step_s: f64 },
    #[error("step {step_s} s points away from the target epoch {target_s} (start {start_s})")]
    DirectionMismatch {
        step_s: f64,
        start_s: f64,
        target_s: f64,
    },
    #[error("non-finite state at epoch {epoch_s} s")]
    NonFinite { epoch_s: f64 },
    #[error("step limit of {max_steps} reached at epoch {epoch_s} s")]
    StepLimit { max_steps: usize, epoch_s: f64 },
    #[error("environment query failed at epoch {epoch_s} s: {source}")]
    Environment {
        epoch_s: f64,
        #[source]
        source: EnvironmentError,
    },
}

impl IntegrationFailure {
    /// Epoch at which the failure was detected.
    pub fn epoch_s(&self) -> f64 {
        match self {
            IntegrationFailure::InvalidStep { .. } => f64::NAN,
            IntegrationFailure::DirectionMismatch { start_s, .. } => *start_s,
            IntegrationFailure::NonFinite { epoch_s }
            | IntegrationFailure::StepLimit { epoch_s, .. }
            | IntegrationFailure::Environment { epoch_s, .. } => *epoch_s,
        }
    }
}

/// Integrate `derivative` from `(start_s, initial)` to `target_s`.
///
/// Returns every accepted `(epoch, state)` pair in integration order, starting with the
/// untouched initial state and ending exactly on `target_s`.
pub fn integrate<F>(
    derivative: F,
    start_s: f64,
    initial: &State6,
    target_s: f64,
    settings: &IntegratorSettings,
) -> Result<Vec<(f64, State6)>, IntegrationFailure>
where
    F: Fn(f64, &State6) -> Result<State6, EnvironmentError>,
{
    let step_s = settings.step_s;
    if !(step_s.is_finite() && step_s != 0.0) {
        return Err(IntegrationFailure::InvalidStep { step_s });
    }
    if !state::is_finite(initial) {
        return Err(IntegrationFailure::NonFinite { epoch_s: start_s });
    }
    let mut history = vec![(start_s, *initial)];
    if target_s == start_s {
        return Ok(history);
    }
    if (target_s - start_s).signum() != step_s.signum() {
        return Err(IntegrationFailure::DirectionMismatch {
            step_s,
            start_s,
            target_s,
        });
    }

    let tableau = settings.scheme.tableau();
    let direction = step_s.signum();
    let mut epoch = start_s;
    let mut current = *initial;
    let mut steps = 0usize;
    while epoch != target_s {
        if steps >= settings.max_steps {
            return Err(IntegrationFailure::StepLimit {
                max_steps: settings.max_steps,
                epoch_s: epoch,
            });
        }
        steps += 1;
        let nominal = start_s + steps as f64 * step_s;
        let (next_epoch, h) = if direction * (target_s - nominal) <= 1e-9 * step_s.abs() {
            (target_s, target_s - epoch)
        } else {
            (nominal, nominal - epoch)
        };
        current = rk_step(tableau, &derivative, epoch, &current, h)?;
        if !state::is_finite(&current) {
            return Err(IntegrationFailure::NonFinite {
                epoch_s: next_epoch,
            });
        }
        epoch = next_epoch;
        history.push((epoch, current));
    }
    trace!(
        "{} integrated {steps} steps from {start_s} s to {target_s} s",
        tableau.name
    );
    Ok(history)
}

fn rk_step<F>(
    tableau: &ButcherTableau,
    derivative: &F,
    epoch: f64,
    y: &State6,
    h: f64,
) -> Result<State6, IntegrationFailure>
where
    F: Fn(f64, &State6) -> Result<State6, EnvironmentError>,
{
    let mut k: Vec<State6> = Vec::with_capacity(tableau.stages());
    for (stage, row) in tableau.a.iter().enumerate() {
        let mut stage_state = *y;
        for (j, coeff) in row.iter().enumerate() {
            if *coeff != 0.0 {
                for n in 0..6 {
                    stage_state[n] += h * coeff * k[j][n];
                }
            }
        }
        let stage_epoch = epoch + tableau.c[stage] * h;
        let slope = derivative(stage_epoch, &stage_state).map_err(|source| {
            IntegrationFailure::Environment {
                epoch_s: stage_epoch,
                source,
            }
        })?;
        k.push(slope);
    }
    let mut next = *y;
    for (weight, slope) in tableau.b.iter().zip(&k) {
        for n in 0..6 {
            next[n] += h * weight * slope[n];
        }
    }
    Ok(next)
}
