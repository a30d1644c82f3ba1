//! Ephemeris access for the trajectory workspace.
//!
//! Every consumer talks to the [`Ephemeris`] trait; the bundled implementation is the
//! analytic mean-element model in [`mean_elements`], which needs no kernel files.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use thiserror::Error;

pub mod mean_elements;

pub use mean_elements::MeanElementEphemeris;

/// Position and velocity of a body relative to the ephemeris origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

impl StateVector {
    /// State of a body resting at the origin.
    pub const ORIGIN: StateVector = StateVector {
        position_km: [0.0; 3],
        velocity_km_s: [0.0; 3],
    };
}

/// Errors surfaced while querying an ephemeris.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("body `{name}` is not covered by the {source_name} ephemeris")]
    UnknownBody {
        name: String,
        source_name: &'static str,
    },
    #[error("epoch {epoch_s} s past J2000 lies outside the {source_name} validity span")]
    EpochOutOfRange {
        epoch_s: f64,
        source_name: &'static str,
    },
    #[error("invalid epoch string `{epoch}`")]
    InvalidEpoch { epoch: String },
    #[error("kepler equation did not converge for `{name}` at {epoch_s} s past J2000")]
    KeplerNonConvergence { name: String, epoch_s: f64 },
}

/// Read-only, thread-safe source of body states in a heliocentric inertial frame.
pub trait Ephemeris: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// State of `target` at `epoch_s` seconds past J2000 (TDB).
    fn state_vector(&self, target: &str, epoch_s: f64) -> Result<StateVector, EphemerisError>;
}

/// Normalize a body name for lookups: trims, uppercases, and drops a trailing barycenter tag.
pub fn normalize_target_name(name: &str) -> String {
    let upper = name.trim().to_ascii_uppercase();
    match upper.strip_suffix(" BARYCENTER") {
        Some(stripped) => stripped.trim().to_string(),
        None => upper,
    }
}

fn j2000() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

/// Convert a calendar epoch (`YYYY-MM-DDTHH:MM:SS[.fff]` or `YYYY-MM-DD`) into seconds past J2000.
///
/// The calendar string is read on the TDB scale; no leap-second bookkeeping is applied.
pub fn epoch_seconds(epoch: &str) -> Result<f64, EphemerisError> {
    let trimmed = epoch.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map(|d| d.and_time(Default::default()))
        })
        .map_err(|_| EphemerisError::InvalidEpoch {
            epoch: epoch.to_string(),
        })?;
    let delta = parsed - j2000();
    Ok(delta.num_milliseconds() as f64 / 1_000.0)
}

/// Format seconds past J2000 as a TDB calendar string.
pub fn format_epoch(epoch_s: f64) -> Result<String, EphemerisError> {
    let invalid = || EphemerisError::InvalidEpoch {
        epoch: epoch_s.to_string(),
    };
    if !epoch_s.is_finite() {
        return Err(invalid());
    }
    let millis = (epoch_s * 1_000.0).round() as i64;
    let delta = TimeDelta::try_milliseconds(millis).ok_or_else(invalid)?;
    let stamp = j2000().checked_add_signed(delta).ok_or_else(invalid)?;
    Ok(format!("{} TDB", stamp.format("%Y-%m-%dT%H:%M:%S%.3f")))
}
