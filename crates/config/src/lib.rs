//! Configuration models and loaders for the gravity-assist trajectory workspace.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Physical description of a body parsed from catalogs.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub mu_km3_s2: f64,
    pub radius_km: f64,
    /// Smallest periapsis radius allowed during a swing-by of this body.
    #[serde(default)]
    pub min_periapsis_km: Option<f64>,
}

impl BodyConfig {
    fn new(name: &str, mu_km3_s2: f64, radius_km: f64, min_periapsis_km: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            mu_km3_s2,
            radius_km,
            min_periapsis_km,
        }
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

/// Built-in catalog: the Sun and the eight planets.
pub fn default_bodies() -> Vec<BodyConfig> {
    vec![
        BodyConfig::new("Sun", 1.327_124_400_18e11, 695_700.0, None),
        BodyConfig::new("Mercury", 22_031.868_551, 2_439.7, Some(2_639.7)),
        BodyConfig::new("Venus", 324_858.592, 6_051.8, Some(6_251.8)),
        BodyConfig::new("Earth", 398_600.435_507, 6_378.137, Some(6_578.1)),
        BodyConfig::new("Mars", 42_828.375_214, 3_396.19, Some(3_596.2)),
        BodyConfig::new("Jupiter", 126_686_531.9, 71_492.0, Some(72_000.0)),
        BodyConfig::new("Saturn", 37_931_206.234, 60_268.0, Some(61_000.0)),
        BodyConfig::new("Uranus", 5_793_951.256, 25_559.0, Some(26_000.0)),
        BodyConfig::new("Neptune", 6_835_099.97, 24_764.0, Some(25_000.0)),
    ]
}

/// Default minimum swing-by periapsis radius for a named body, if tabulated.
pub fn default_min_periapsis_km(name: &str) -> Option<f64> {
    default_bodies()
        .into_iter()
        .find(|b| b.is_named(name))
        .and_then(|b| b.min_periapsis_km)
}

/// Target conic at departure or capture, expressed by semi-major axis and eccentricity.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct OrbitShapeConfig {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
}

/// Fixed-step integration scheme selector.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorSchemeConfig {
    #[default]
    RungeKutta4,
    RungeKutta38,
}

/// Numerical integration settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IntegratorConfig {
    pub scheme: IntegratorSchemeConfig,
    pub step_seconds: f64,
    pub max_steps: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            scheme: IntegratorSchemeConfig::RungeKutta4,
            step_seconds: 1_000.0,
            max_steps: 2_000_000,
        }
    }
}

/// Scenario manifest describing one pipeline run.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    /// `[start epoch, leg durations..., case selector]`, epochs and durations in days past J2000.
    pub parameters: Vec<f64>,
    pub central_body: String,
    pub propagated_body: String,
    /// Bodies preceding the two case-selected flyby bodies.
    pub leading_bodies: Vec<String>,
    /// Bodies following the two case-selected flyby bodies.
    pub trailing_bodies: Vec<String>,
    pub capture: Option<OrbitShapeConfig>,
    pub departure: Option<OrbitShapeConfig>,
    pub min_periapsis_overrides_km: BTreeMap<String, f64>,
    pub analytic_samples_per_leg: usize,
    pub integrator: IntegratorConfig,
    pub parallel: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            parameters: vec![
                -1851.46422926478,
                94.13188652993128,
                381.9429079287791,
                55.6729929900098,
                700.990295462437,
                1.0,
            ],
            central_body: "Sun".to_string(),
            propagated_body: "Spacecraft".to_string(),
            leading_bodies: vec!["Earth".to_string(), "Venus".to_string()],
            trailing_bodies: vec!["Jupiter".to_string()],
            capture: Some(OrbitShapeConfig {
                semi_major_axis_km: 1.0895e5 / 0.02,
                eccentricity: 0.98,
            }),
            departure: None,
            min_periapsis_overrides_km: BTreeMap::new(),
            analytic_samples_per_leg: 500,
            integrator: IntegratorConfig::default(),
            parallel: true,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("body `{name}` has invalid {field}: {value}")]
    InvalidBody {
        name: String,
        field: &'static str,
        value: f64,
    },
}

/// Load body configurations from a YAML list, a TOML file, or a directory of TOML files.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    let bodies: Vec<BodyConfig> = load_records(path)?;
    for body in &bodies {
        validate_body(body)?;
    }
    Ok(bodies)
}

/// Load a scenario manifest from TOML (`.toml`) or YAML (anything else).
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ConfigError> {
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

/// Overlay `overrides` onto `base`, replacing entries with matching names.
pub fn merge_bodies(base: Vec<BodyConfig>, overrides: Vec<BodyConfig>) -> Vec<BodyConfig> {
    let mut merged = base;
    for body in overrides {
        match merged.iter_mut().find(|b| b.is_named(&body.name)) {
            Some(existing) => *existing = body,
            None => merged.push(body),
        }
    }
    merged
}

fn validate_body(body: &BodyConfig) -> Result<(), ConfigError> {
    let invalid = |field, value| ConfigError::InvalidBody {
        name: body.name.clone(),
        field,
        value,
    };
    if !(body.mu_km3_s2.is_finite() && body.mu_km3_s2 > 0.0) {
        return Err(invalid("gravitational parameter", body.mu_km3_s2));
    }
    if !(body.radius_km.is_finite() && body.radius_km > 0.0) {
        return Err(invalid("radius", body.radius_km));
    }
    if let Some(rp) = body.min_periapsis_km {
        if !(rp.is_finite() && rp > 0.0) {
            return Err(invalid("minimum periapsis", rp));
        }
    }
    Ok(())
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
