//! Impulsive transfer utilities: Lambert arcs and powered swing-by matching.

pub mod flyby;
pub mod lambert;

pub use flyby::{FlybyError, PoweredFlyby, powered_flyby};
pub use lambert::{LambertArc, LambertPath, LambertSolverError, solve as lambert_solve};
