//! Leg bookkeeping: body sequences, leg typing, and parameter-vector decoding.

use mga_core::time::days_to_seconds;
use serde::Serialize;

use crate::error::ConfigurationError;

/// Intermediate flyby pairs selectable through the last entry of the parameter vector.
pub const TRANSFER_CASES: [(&str, &str); 7] = [
    ("Earth", "Earth"),
    ("Venus", "Earth"),
    ("Earth", "Venus"),
    ("Venus", "Mars"),
    ("Earth", "Mars"),
    ("Mars", "Mars"),
    ("Mars", "Venus"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegType {
    Departure,
    Swingby,
    Capture,
}

/// Ordered bodies visited by the trajectory; at least two entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodySequence {
    bodies: Vec<String>,
}

impl BodySequence {
    pub fn new(bodies: Vec<String>) -> Result<Self, ConfigurationError> {
        if bodies.len() < 2 {
            return Err(ConfigurationError::MalformedSequence {
                reason: format!("{} bodies given, at least 2 required", bodies.len()),
            });
        }
        if let Some(index) = bodies.iter().position(|b| b.trim().is_empty()) {
            return Err(ConfigurationError::MalformedSequence {
                reason: format!("entry {index} is empty"),
            });
        }
        Ok(Self { bodies })
    }

    pub fn bodies(&self) -> &[String] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn leg_count(&self) -> usize {
        self.bodies.len() - 1
    }

    /// Distinct bodies in order of first appearance (case-insensitive).
    pub fn unique_bodies(&self) -> Vec<String> {
        let mut unique: Vec<String> = Vec::new();
        for body in &self.bodies {
            if !unique.iter().any(|u| u.eq_ignore_ascii_case(body)) {
                unique.push(body.clone());
            }
        }
        unique
    }
}

/// One Lambert arc between consecutive sequence bodies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub index: usize,
    pub departure_body: String,
    pub arrival_body: String,
    pub leg_type: LegType,
    pub start_epoch_s: f64,
    pub end_epoch_s: f64,
    /// Smallest admissible swing-by periapsis at the departure body.
    pub min_periapsis_km: f64,
}

impl Leg {
    pub fn duration_s(&self) -> f64 {
        self.end_epoch_s - self.start_epoch_s
    }

    pub fn midpoint_epoch_s(&self) -> f64 {
        (self.start_epoch_s + self.end_epoch_s) / 2.0
    }
}

/// Leg types for `leg_count` legs: departure first, swing-bys in between, and a capture
/// leg last when a capture orbit is configured. A single leg is always a departure leg.
pub fn leg_types(leg_count: usize, capture: bool) -> Vec<LegType> {
    (0..leg_count)
        .map(|i| {
            if i == 0 {
                LegType::Departure
            } else if capture && i + 1 == leg_count {
                LegType::Capture
            } else {
                LegType::Swingby
            }
        })
        .collect()
}

/// Decoded parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionParameters {
    pub start_epoch_s: f64,
    pub durations_s: Vec<f64>,
    pub case_index: usize,
}

/// Decode `[start, d1, ..., dn, case]` (days past J2000 / days) for `leg_count` legs.
pub fn decode_parameters(
    parameters: &[f64],
    leg_count: usize,
) -> Result<MissionParameters, ConfigurationError> {
    let expected = leg_count + 2;
    if parameters.len() != expected {
        return Err(ConfigurationError::ParameterCount {
            expected,
            found: parameters.len(),
        });
    }
    let selector = parameters[expected - 1];
    let case_index = case_index(selector)?;
    Ok(MissionParameters {
        start_epoch_s: days_to_seconds(parameters[0]),
        durations_s: parameters[1..=leg_count]
            .iter()
            .map(|d| days_to_seconds(*d))
            .collect(),
        case_index,
    })
}

/// Validate a case selector and return its table index.
pub fn case_index(selector: f64) -> Result<usize, ConfigurationError> {
    let max = TRANSFER_CASES.len() - 1;
    if selector.is_finite() && selector.fract() == 0.0 && (0.0..=max as f64).contains(&selector) {
        Ok(selector as usize)
    } else {
        Err(ConfigurationError::InvalidCaseSelector {
            value: selector,
            max,
        })
    }
}

/// Body sequence `leading + case pair + trailing`.
pub fn case_sequence(
    case_index: usize,
    leading: &[String],
    trailing: &[String],
) -> Result<BodySequence, ConfigurationError> {
    let (first, second) =
        TRANSFER_CASES
            .get(case_index)
            .ok_or(ConfigurationError::InvalidCaseSelector {
                value: case_index as f64,
                max: TRANSFER_CASES.len() - 1,
            })?;
    let mut bodies = leading.to_vec();
    bodies.push(first.to_string());
    bodies.push(second.to_string());
    bodies.extend(trailing.iter().cloned());
    BodySequence::new(bodies)
}

/// Assemble legs from a sequence, per-leg types, a start epoch, and leg durations.
///
/// `min_periapsis_km` holds one entry per sequence body.
pub fn build_legs(
    sequence: &BodySequence,
    types: &[LegType],
    start_epoch_s: f64,
    durations_s: &[f64],
    min_periapsis_km: &[f64],
) -> Result<Vec<Leg>, ConfigurationError> {
    let leg_count = sequence.leg_count();
    if durations_s.len() != leg_count {
        return Err(ConfigurationError::ParameterCount {
            expected: leg_count,
            found: durations_s.len(),
        });
    }
    if min_periapsis_km.len() != sequence.len() {
        return Err(ConfigurationError::MalformedSequence {
            reason: format!(
                "{} minimum periapsis radii for {} bodies",
                min_periapsis_km.len(),
                sequence.len()
            ),
        });
    }
    validate_leg_types(types, leg_count)?;
    if !start_epoch_s.is_finite() {
        return Err(ConfigurationError::InvalidSetting {
            name: "start epoch",
            value: start_epoch_s,
        });
    }

    let bodies = sequence.bodies();
    let mut legs = Vec::with_capacity(leg_count);
    let mut epoch = start_epoch_s;
    for (index, duration) in durations_s.iter().enumerate() {
        let end = epoch + duration;
        if !(duration.is_finite() && end > epoch) {
            return Err(ConfigurationError::NonIncreasingEpochs {
                leg: index,
                start_s: epoch,
                end_s: end,
            });
        }
        legs.push(Leg {
            index,
            departure_body: bodies[index].clone(),
            arrival_body: bodies[index + 1].clone(),
            leg_type: types[index],
            start_epoch_s: epoch,
            end_epoch_s: end,
            min_periapsis_km: min_periapsis_km[index],
        });
        epoch = end;
    }
    Ok(legs)
}

fn validate_leg_types(types: &[LegType], leg_count: usize) -> Result<(), ConfigurationError> {
    let invalid = |reason: String| Err(ConfigurationError::InvalidLegTypes { reason });
    if types.len() != leg_count {
        return invalid(format!("{} types for {leg_count} legs", types.len()));
    }
    if types.first() != Some(&LegType::Departure) {
        return invalid("the first leg must be a departure leg".to_string());
    }
    for (index, leg_type) in types.iter().enumerate().skip(1) {
        let last = index + 1 == leg_count;
        match leg_type {
            LegType::Departure => return invalid(format!("leg {index} cannot be a departure leg")),
            LegType::Capture if !last => {
                return invalid(format!("leg {index} is a capture leg but not the last leg"));
            }
            _ => {}
        }
    }
    Ok(())
}
