//! Scenario configuration loaded from YAML.
//!
//! A scenario has two parts:
//!
//! - [`SimConfig`]: engine settings (trail length, recording interval,
//!   scratch capacity), all optional
//! - [`SystemSeed`]: the ordered list of bodies that make up the initial
//!   system, each placed at a fixed state or on an orbit around an earlier
//!   body
//!
//! # YAML format
//!
//! ```yaml
//! simulation:
//!   trail_capacity: 2000        # samples kept per body
//!   trail_record_interval: 5    # ticks between samples, 0 disables trails
//!   scratch_capacity: 65536     # elements in the per-tick scratch arena
//!
//! bodies:
//!   - name: Sun
//!     mass: 1.9885e30           # kg
//!     radius: 6.9634e8          # m, display only
//!     color: yellow             # named, [r, g, b] or [r, g, b, a]
//!     orbit: { kind: fixed, position: [0.0, 0.0], velocity: [0.0, 0.0] }
//!   - name: Earth
//!     mass: 5.972e24
//!     radius: 6.371e6
//!     color: blue
//!     orbit: { kind: circular, parent: Sun, radius: 1.496e11, angle_deg: 0.0 }
//!   - name: Mercury
//!     mass: 3.3011e23
//!     orbit: { kind: elliptical, parent: Sun, periapsis: 4.6001e10, apoapsis: 6.9817e10 }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::body::{is_valid_mass, Color};
use crate::error::Error;
use crate::orbit::{Ellipse, OrbitError};
use crate::scratch::DEFAULT_SCRATCH_CAPACITY;
use crate::trail::DEFAULT_TRAIL_CAPACITY;
use crate::Result;

/// Default number of executed ticks between two trail samples
pub const DEFAULT_TRAIL_RECORD_INTERVAL: u32 = 5;

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub trail_capacity: usize,
    pub trail_record_interval: u32,
    pub scratch_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            trail_record_interval: DEFAULT_TRAIL_RECORD_INTERVAL,
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
        }
    }
}

/// Where a seeded body starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Absolute position (m) and velocity (m/s)
    Fixed {
        #[serde(default)]
        position: [f64; 2],
        #[serde(default)]
        velocity: [f64; 2],
    },
    Circular {
        parent: String,
        radius: f64,
        #[serde(default)]
        angle_deg: f64,
    },
    Elliptical {
        parent: String,
        periapsis: f64,
        apoapsis: f64,
        #[serde(default)]
        true_anomaly_deg: f64,
    },
}

impl Placement {
    pub fn parent(&self) -> Option<&str> {
        match self {
            Placement::Fixed { .. } => None,
            Placement::Circular { parent, .. } | Placement::Elliptical { parent, .. } => {
                Some(parent)
            }
        }
    }
}

fn default_display_radius() -> f32 {
    1.0
}

/// One entry of a [`SystemSeed`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedBody {
    #[serde(default)]
    pub name: Option<String>,
    pub mass: f64,
    #[serde(default = "default_display_radius")]
    pub radius: f32,
    #[serde(default)]
    pub color: Color,
    pub orbit: Placement,
}

impl SeedBody {
    pub fn new(name: &str, mass: f64, radius: f32, color: Color, orbit: Placement) -> Self {
        Self {
            name: Some(name.to_string()),
            mass,
            radius,
            color,
            orbit,
        }
    }

    fn label(&self, idx: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{idx}"))
    }
}

/// Ordered description of an initial system
///
/// Bodies are inserted in list order, so a parent must appear before the
/// bodies orbiting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSeed {
    pub bodies: Vec<SeedBody>,
}

impl SystemSeed {
    pub fn new(bodies: Vec<SeedBody>) -> Self {
        Self { bodies }
    }

    /// Sun, five planets and the Moon. Mercury and Jupiter are on their
    /// real eccentric orbits, the others on circular ones.
    pub fn solar_system() -> Self {
        let circular = |parent: &str, radius: f64, angle_deg: f64| Placement::Circular {
            parent: parent.to_string(),
            radius,
            angle_deg,
        };
        let elliptical =
            |parent: &str, periapsis: f64, apoapsis: f64, true_anomaly_deg: f64| {
                Placement::Elliptical {
                    parent: parent.to_string(),
                    periapsis,
                    apoapsis,
                    true_anomaly_deg,
                }
            };

        Self::new(vec![
            SeedBody::new(
                "Sun",
                1.9885e30,
                6.9634e8,
                Color::YELLOW,
                Placement::Fixed {
                    position: [0.0, 0.0],
                    velocity: [0.0, 0.0],
                },
            ),
            SeedBody::new(
                "Mercury",
                3.3011e23,
                2.4397e6,
                Color::GRAY,
                elliptical("Sun", 4.6001e10, 6.9817e10, 0.0),
            ),
            SeedBody::new(
                "Venus",
                4.867e24,
                6.052e6,
                Color::ORANGE,
                circular("Sun", 1.082e11, 0.0),
            ),
            SeedBody::new(
                "Earth",
                5.972e24,
                6.371e6,
                Color::BLUE,
                circular("Sun", 1.496e11, 0.0),
            ),
            SeedBody::new(
                "Moon",
                7.342e22,
                1.7374e6,
                Color::LIGHT_GRAY,
                circular("Earth", 3.844e8, 0.0),
            ),
            SeedBody::new(
                "Mars",
                6.39e23,
                3.389e6,
                Color::RED,
                circular("Sun", 2.279e11, 0.0),
            ),
            SeedBody::new(
                "Jupiter",
                1.8982e27,
                6.9911e7,
                Color::BEIGE,
                elliptical("Sun", 7.405e11, 8.166e11, 120.0),
            ),
        ])
    }

    /// Checks names, parent references and orbit parameters without
    /// building anything
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();

        for (idx, body) in self.bodies.iter().enumerate() {
            let label = || body.label(idx);

            if !is_valid_mass(body.mass) {
                return Err(Error::InvalidMass(label(), body.mass));
            }

            if let Some(parent) = body.orbit.parent() {
                if !seen.contains(parent) {
                    return Err(Error::UnknownParent {
                        body: label(),
                        parent: parent.to_string(),
                    });
                }
            }

            match body.orbit {
                Placement::Fixed { .. } => {}
                Placement::Circular { radius, .. } => {
                    if !(radius.is_finite() && radius > 0.0) {
                        return Err(Error::InvalidOrbit(
                            label(),
                            OrbitError::InvalidRadius(radius),
                        ));
                    }
                }
                Placement::Elliptical {
                    periapsis,
                    apoapsis,
                    ..
                } => {
                    Ellipse::from_apsides(periapsis, apoapsis)
                        .map_err(|err| Error::InvalidOrbit(label(), err))?;
                }
            }

            if let Some(name) = body.name.as_deref() {
                if !seen.insert(name) {
                    return Err(Error::DuplicateName(name.to_string()));
                }
            }
        }

        Ok(())
    }
}

/// A complete scenario file
///
/// Unknown keys are rejected, so a misspelled section fails to load instead
/// of quietly falling back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScenarioFile")]
pub struct ScenarioConfig {
    pub simulation: SimConfig,
    #[serde(flatten)]
    pub seed: SystemSeed,
}

// On-disk layout. `deny_unknown_fields` does not combine with `flatten`, so
// the body list is read here and moved into the seed.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    #[serde(default)]
    simulation: SimConfig,
    bodies: Vec<SeedBody>,
}

impl From<ScenarioFile> for ScenarioConfig {
    fn from(file: ScenarioFile) -> Self {
        Self {
            simulation: file.simulation,
            seed: SystemSeed::new(file.bodies),
        }
    }
}

impl ScenarioConfig {
    /// Parses and validates a scenario
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let scenario: ScenarioConfig = serde_yaml::from_str(yaml)?;
        scenario.seed.validate()?;
        Ok(scenario)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| Error::ScenarioRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn solar_system() -> Self {
        Self {
            simulation: SimConfig::default(),
            seed: SystemSeed::solar_system(),
        }
    }
}
