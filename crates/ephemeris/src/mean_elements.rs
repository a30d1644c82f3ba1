//! Approximate planetary positions from JPL mean Keplerian elements.
//!
//! Elements and rates follow the "Keplerian Elements for Approximate Positions of the
//! Major Planets" table (E. M. Standish), heliocentric ecliptic J2000, valid 1800–2050.
//! Velocities are the two-body velocities of the osculating ellipse about the Sun.

use std::f64::consts::{PI, TAU};

use mga_core::constants::{AU_KM, MU_SUN};
use mga_core::time::julian_centuries;

use crate::{Ephemeris, EphemerisError, StateVector, normalize_target_name};

const SOURCE_NAME: &str = "mean-element";
const MIN_CENTURIES: f64 = -2.0;
const MAX_CENTURIES: f64 = 0.51;
const KEPLER_TOLERANCE: f64 = 1.0e-14;
const KEPLER_MAX_ITER: usize = 60;

/// Mean elements at J2000 and their rates per Julian century.
#[derive(Debug, Clone, Copy)]
pub struct PlanetElements {
    pub name: &'static str,
    /// Semi-major axis (AU) and rate.
    pub a: [f64; 2],
    /// Eccentricity and rate.
    pub e: [f64; 2],
    /// Inclination (deg) and rate.
    pub i: [f64; 2],
    /// Mean longitude (deg) and rate.
    pub l: [f64; 2],
    /// Longitude of perihelion (deg) and rate.
    pub long_peri: [f64; 2],
    /// Longitude of the ascending node (deg) and rate.
    pub long_node: [f64; 2],
}

pub const PLANET_ELEMENTS: &[PlanetElements] = &[
    PlanetElements {
        name: "MERCURY",
        a: [0.387_099_27, 0.000_000_37],
        e: [0.205_635_93, 0.000_019_06],
        i: [7.004_979_02, -0.005_947_49],
        l: [252.250_323_50, 149_472.674_111_75],
        long_peri: [77.457_796_28, 0.160_476_89],
        long_node: [48.330_765_93, -0.125_340_81],
    },
    PlanetElements {
        name: "VENUS",
        a: [0.723_335_66, 0.000_003_90],
        e: [0.006_776_72, -0.000_041_07],
        i: [3.394_676_05, -0.000_788_90],
        l: [181.979_099_50, 58_517.815_387_29],
        long_peri: [131.602_467_18, 0.002_683_29],
        long_node: [76.679_842_55, -0.277_694_18],
    },
    PlanetElements {
        name: "EARTH",
        a: [1.000_002_61, 0.000_005_62],
        e: [0.016_711_23, -0.000_043_92],
        i: [-0.000_015_31, -0.012_946_68],
        l: [100.464_571_66, 35_999.372_449_81],
        long_peri: [102.937_681_93, 0.323_273_64],
        long_node: [0.0, 0.0],
    },
    PlanetElements {
        name: "MARS",
        a: [1.523_710_34, 0.000_018_47],
        e: [0.093_394_10, 0.000_078_82],
        i: [1.849_691_42, -0.008_131_31],
        l: [-4.553_432_05, 19_140.302_684_99],
        long_peri: [-23.943_629_59, 0.444_410_88],
        long_node: [49.559_538_91, -0.292_573_43],
    },
    PlanetElements {
        name: "JUPITER",
        a: [5.202_887_00, -0.000_116_07],
        e: [0.048_386_24, -0.000_132_53],
        i: [1.304_396_95, -0.001_837_14],
        l: [34.396_440_51, 3_034.746_127_75],
        long_peri: [14.728_479_83, 0.212_526_68],
        long_node: [100.473_909_09, 0.204_691_06],
    },
    PlanetElements {
        name: "SATURN",
        a: [9.536_675_94, -0.001_250_60],
        e: [0.053_861_79, -0.000_509_91],
        i: [2.485_991_87, 0.001_936_09],
        l: [49.954_244_23, 1_222.493_622_01],
        long_peri: [92.598_878_31, -0.418_972_16],
        long_node: [113.662_424_48, -0.288_677_94],
    },
    PlanetElements {
        name: "URANUS",
        a: [19.189_164_64, -0.001_961_76],
        e: [0.047_257_44, -0.000_043_97],
        i: [0.772_637_83, -0.002_429_39],
        l: [313.238_104_51, 428.482_027_85],
        long_peri: [170.954_276_30, 0.408_052_81],
        long_node: [74.016_925_03, 0.042_405_89],
    },
    PlanetElements {
        name: "NEPTUNE",
        a: [30.069_922_76, 0.000_262_91],
        e: [0.008_590_48, 0.000_051_05],
        i: [1.770_043_47, 0.000_353_72],
        l: [-55.120_029_69, 218.459_453_25],
        long_peri: [44.964_762_27, -0.322_414_64],
        long_node: [131.784_225_74, -0.005_086_64],
    },
];

/// Heliocentric analytic ephemeris; the Sun sits at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanElementEphemeris;

impl MeanElementEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Elements for a body, if it is one of the tabulated planets.
    pub fn elements(name: &str) -> Option<&'static PlanetElements> {
        let key = normalize_target_name(name);
        let key = if key == "EARTH-MOON" || key == "EMB" {
            "EARTH".to_string()
        } else {
            key
        };
        PLANET_ELEMENTS.iter().find(|p| p.name == key)
    }
}

impl Ephemeris for MeanElementEphemeris {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn state_vector(&self, target: &str, epoch_s: f64) -> Result<StateVector, EphemerisError> {
        let t = julian_centuries(epoch_s);
        if !(MIN_CENTURIES..=MAX_CENTURIES).contains(&t) {
            return Err(EphemerisError::EpochOutOfRange {
                epoch_s,
                source_name: SOURCE_NAME,
            });
        }
        if normalize_target_name(target) == "SUN" {
            return Ok(StateVector::ORIGIN);
        }
        let elements =
            Self::elements(target).ok_or_else(|| EphemerisError::UnknownBody {
                name: target.to_string(),
                source_name: SOURCE_NAME,
            })?;
        elements
            .state_at(t)
            .ok_or_else(|| EphemerisError::KeplerNonConvergence {
                name: target.to_string(),
                epoch_s,
            })
    }
}

impl PlanetElements {
    /// Heliocentric ecliptic state at `t` Julian centuries past J2000.
    fn state_at(&self, t: f64) -> Option<StateVector> {
        let a = (self.a[0] + self.a[1] * t) * AU_KM;
        let e = self.e[0] + self.e[1] * t;
        let inc = (self.i[0] + self.i[1] * t).to_radians();
        let mean_longitude = (self.l[0] + self.l[1] * t).to_radians();
        let long_peri = (self.long_peri[0] + self.long_peri[1] * t).to_radians();
        let raan = (self.long_node[0] + self.long_node[1] * t).to_radians();

        let arg_peri = long_peri - raan;
        let mean_anomaly = wrap_pi(mean_longitude - long_peri);
        let ecc_anomaly = solve_kepler(mean_anomaly, e)?;

        let nu = 2.0
            * f64::atan2(
                (1.0 + e).sqrt() * (0.5 * ecc_anomaly).sin(),
                (1.0 - e).sqrt() * (0.5 * ecc_anomaly).cos(),
            );
        let p = a * (1.0 - e * e);
        let r = p / (1.0 + e * nu.cos());
        let h = (MU_SUN * p).sqrt();

        let pos_pf = [r * nu.cos(), r * nu.sin()];
        let vel_pf = [-MU_SUN / h * nu.sin(), MU_SUN / h * (e + nu.cos())];

        let (so, co) = raan.sin_cos();
        let (sw, cw) = arg_peri.sin_cos();
        let (si, ci) = inc.sin_cos();
        let rot = [
            [co * cw - so * sw * ci, -co * sw - so * cw * ci],
            [so * cw + co * sw * ci, -so * sw + co * cw * ci],
            [sw * si, cw * si],
        ];

        let mut position_km = [0.0; 3];
        let mut velocity_km_s = [0.0; 3];
        for k in 0..3 {
            position_km[k] = rot[k][0] * pos_pf[0] + rot[k][1] * pos_pf[1];
            velocity_km_s[k] = rot[k][0] * vel_pf[0] + rot[k][1] * vel_pf[1];
        }
        Some(StateVector {
            position_km,
            velocity_km_s,
        })
    }
}

fn wrap_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

fn solve_kepler(mean_anomaly: f64, e: f64) -> Option<f64> {
    let mut ecc = if e < 0.8 { mean_anomaly } else { PI };
    for _ in 0..KEPLER_MAX_ITER {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            return Some(ecc);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kepler_solution_satisfies_equation() {
        for &(m, e) in &[(0.3, 0.0167), (-2.9, 0.2056), (3.1, 0.0934)] {
            let ecc = solve_kepler(m, e).expect("converges");
            assert!((ecc - e * ecc.sin() - m).abs() < 1e-12);
        }
    }

    #[test]
    fn wrap_pi_keeps_range() {
        for angle in [-10.0, -PI, 0.0, 3.5, 12.0] {
            let w = wrap_pi(angle);
            assert!(w > -PI - 1e-12 && w <= PI + 1e-12, "{w}");
            assert!(((w - angle) / TAU - ((w - angle) / TAU).round()).abs() < 1e-12);
        }
    }
}
