//! Multi-leg gravity-assist transfer design: patched-conic solution of a body
//! sequence and numerical reconciliation of every leg.

pub mod artifacts;
pub mod error;
pub mod legs;
pub mod patched_conic;
pub mod pipeline;
pub mod reconcile;

pub use facade::*;
pub use mga_dynamics as dynamics;
pub use mga_impulsive as impulsive;

mod facade;
