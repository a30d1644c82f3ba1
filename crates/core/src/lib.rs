//! Core constants, time conversions, and shared vector primitives for the trajectory workspace.

/// Physical constants expressed in kilometre/second units (unless stated otherwise).
pub mod constants {
    /// Kilometres per astronomical unit.
    pub const AU_KM: f64 = 149_597_870.7;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Seconds per Julian century (36 525 days).
    pub const SECONDS_PER_JULIAN_CENTURY: f64 = 36_525.0 * SECONDS_PER_DAY;
    /// Heliocentric gravitational parameter (km^3/s^2).
    pub const MU_SUN: f64 = 1.327_124_400_18e11;
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::{SECONDS_PER_DAY, SECONDS_PER_JULIAN_CENTURY};

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Julian centuries elapsed since J2000 for an epoch in seconds past J2000.
    #[inline]
    pub fn julian_centuries(seconds_past_j2000: f64) -> f64 {
        seconds_past_j2000 / SECONDS_PER_JULIAN_CENTURY
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in kilometres or km/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Distance between two points.
    #[inline]
    pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
        norm(&sub(a, b))
    }

    /// Angle between two non-zero vectors (radians, in `[0, π]`).
    pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
        let denom = norm(a) * norm(b);
        if denom == 0.0 {
            return 0.0;
        }
        (dot(a, b) / denom).clamp(-1.0, 1.0).acos()
    }
}

/// Six-dimensional Cartesian state (position km, velocity km/s).
pub mod state {
    use super::vector::Vector3;

    /// Position followed by velocity.
    pub type State6 = [f64; 6];

    /// Pack position and velocity into a single state.
    #[inline]
    pub fn join(position: &Vector3, velocity: &Vector3) -> State6 {
        [
            position[0],
            position[1],
            position[2],
            velocity[0],
            velocity[1],
            velocity[2],
        ]
    }

    /// Position part of a state.
    #[inline]
    pub fn position(state: &State6) -> Vector3 {
        [state[0], state[1], state[2]]
    }

    /// Velocity part of a state.
    #[inline]
    pub fn velocity(state: &State6) -> Vector3 {
        [state[3], state[4], state[5]]
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(state: &State6) -> bool {
        state.iter().all(|c| c.is_finite())
    }
}
