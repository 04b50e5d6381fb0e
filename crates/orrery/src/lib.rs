//! Two-dimensional gravitational N-body engine.
//!
//! Bodies live in an append-only [`store::BodyStore`] alongside a trail of
//! their recent positions. [`simulation::Simulation`] advances them with
//! velocity-Verlet over direct pairwise gravity, borrowing its temporary
//! buffers from a [`scratch::ScratchArena`] so steady-state ticks do not
//! allocate. [`orbit`] builds consistent initial conditions for hierarchies
//! such as planets around a star and moons around planets.

pub mod body;
pub mod config;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod orbit;
pub mod scratch;
pub mod simulation;
pub mod store;
pub mod trail;

#[cfg(test)]
mod orbit_test;
#[cfg(test)]
mod scratch_test;

pub use body::{Body, BodyId, Color};
pub use config::{ScenarioConfig, SimConfig, SystemSeed};
pub use error::Error;
pub use simulation::{SkipReason, Simulation, TickOutcome};

pub type Result<T> = std::result::Result<T, crate::error::Error>;
