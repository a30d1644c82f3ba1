//! Fixed-order Lagrange interpolation of sampled state histories.

use mga_core::state::State6;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InterpolationError {
    #[error("epoch {epoch_s} s outside the sampled span [{start_s}, {end_s}]")]
    OutOfRange {
        epoch_s: f64,
        start_s: f64,
        end_s: f64,
    },
    #[error("{available} samples cannot support an order-{required} interpolator")]
    InsufficientSamples { required: usize, available: usize },
    #[error("sample epochs must be strictly increasing (index {index})")]
    NonMonotonic { index: usize },
}

/// Lagrange interpolator over a window of `order` samples centred on the query epoch.
#[derive(Debug, Clone)]
pub struct LagrangeInterpolator {
    epochs: Vec<f64>,
    states: Vec<State6>,
    order: usize,
}

impl LagrangeInterpolator {
    pub const DEFAULT_ORDER: usize = 8;

    pub fn new(samples: &[(f64, State6)], order: usize) -> Result<Self, InterpolationError> {
        if order < 2 || samples.len() < order {
            return Err(InterpolationError::InsufficientSamples {
                required: order.max(2),
                available: samples.len(),
            });
        }
        if let Some(index) = samples.windows(2).position(|w| !(w[1].0 > w[0].0)) {
            return Err(InterpolationError::NonMonotonic { index: index + 1 });
        }
        Ok(Self {
            epochs: samples.iter().map(|(t, _)| *t).collect(),
            states: samples.iter().map(|(_, s)| *s).collect(),
            order,
        })
    }

    pub fn span(&self) -> (f64, f64) {
        (self.epochs[0], self.epochs[self.epochs.len() - 1])
    }

    pub fn interpolate(&self, epoch_s: f64) -> Result<State6, InterpolationError> {
        let (start_s, end_s) = self.span();
        if !(epoch_s >= start_s && epoch_s <= end_s) {
            return Err(InterpolationError::OutOfRange {
                epoch_s,
                start_s,
                end_s,
            });
        }
        let upper = self.epochs.partition_point(|t| *t <= epoch_s);
        if upper > 0 && self.epochs[upper - 1] == epoch_s {
            return Ok(self.states[upper - 1]);
        }
        let first = upper
            .saturating_sub(self.order / 2)
            .min(self.epochs.len() - self.order);
        let window = first..first + self.order;

        let mut result = [0.0; 6];
        for i in window.clone() {
            let mut weight = 1.0;
            for j in window.clone() {
                if j != i {
                    weight *= (epoch_s - self.epochs[j]) / (self.epochs[i] - self.epochs[j]);
                }
            }
            for n in 0..6 {
                result[n] += weight * self.states[i][n];
            }
        }
        Ok(result)
    }
}
