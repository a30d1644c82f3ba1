//! Dynamical model of the workspace: environment lookups, per-leg gravitational
//! acceleration models, fixed-step Runge–Kutta integration, and Lagrange interpolation.

pub mod acceleration;
pub mod environment;
pub mod integrator;
pub mod interpolation;

pub use acceleration::{
    GravityKind, GravitySource, LegAccelerationModel, build_leg_acceleration_models,
};
pub use environment::{BodyEnvironment, EnvironmentError, EnvironmentProvider};
pub use integrator::{
    ButcherTableau, IntegrationFailure, IntegratorSettings, RungeKuttaScheme, integrate,
};
pub use interpolation::{InterpolationError, LagrangeInterpolator};
