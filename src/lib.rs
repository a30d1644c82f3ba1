//! Multi-leg gravity-assist trajectory design.
//!
//! The member crates are re-exported under short module names so front-ends and
//! tests depend on a single package.

pub use mga_config as config;
pub use mga_core as core;
pub use mga_dynamics as dynamics;
pub use mga_ephemeris as ephemeris;
pub use mga_export as export;
pub use mga_impulsive as impulsive;
pub use mga_orbits as orbits;
pub use mga_transfer as transfer;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
