use std::path::PathBuf;

use crate::orbit::OrbitError;

/// Errors raised while loading or validating a scenario.
///
/// The engine itself never fails: rejected seeding yields
/// [`BodyId::INVALID`](crate::body::BodyId::INVALID) and skipped ticks are
/// reported through [`TickOutcome`](crate::simulation::TickOutcome).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Can't read scenario {}: {source}", .path.display())]
    ScenarioRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("YAML: can't parse scenario: {0}")]
    ScenarioParse(#[from] serde_yaml::Error),
    #[error("Body '{body}' references unknown parent '{parent}' (parents must be listed first)")]
    UnknownParent { body: String, parent: String },
    #[error("Duplicate body name '{0}'")]
    DuplicateName(String),
    #[error("Body '{0}' has invalid mass {1}")]
    InvalidMass(String, f64),
    #[error("Body '{0}': {1}")]
    InvalidOrbit(String, OrbitError),
}
