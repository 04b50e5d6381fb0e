//! The simulation driver: body store, clock, trails and the per-tick
//! integration pipeline.

use nalgebra::Vector2;

use crate::body::{Body, BodyId};
use crate::config::{Placement, ScenarioConfig, SimConfig, SystemSeed};
use crate::forces::{DirectGravity, ForceModel};
use crate::integrator::{Integrator, StepBuffers, VelocityVerlet};
use crate::orbit::{self, BodyProps};
use crate::scratch::{ScratchArena, ScratchError, ScratchSpan};
use crate::store::BodyStore;
use crate::trail::TrailBuffer;

/// Why a call to [`Simulation::tick`] left the state untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoBodies,
    /// `dt` was zero, negative or NaN
    NonPositiveDt,
    /// The scratch arena could not provide both acceleration buffers
    ScratchExhausted(ScratchError),
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Advanced { time_seconds: f64 },
    Skipped(SkipReason),
}

impl TickOutcome {
    pub fn is_advanced(&self) -> bool {
        matches!(self, TickOutcome::Advanced { .. })
    }
}

/// Complete state of a running N-body simulation
///
/// Owns the bodies and their trails, the simulation clock, the trail
/// throttling counter, the seed used by [`Simulation::reset`] and the
/// scratch arena the integrator borrows its buffers from.
///
/// # Examples
///
/// ```
/// use nalgebra::Point2;
/// use orrery::body::Body;
/// use orrery::config::SimConfig;
/// use orrery::orbit::BodyProps;
/// use orrery::simulation::Simulation;
///
/// let mut sim = Simulation::empty(SimConfig::default());
/// let sun = sim.add_body(Body::at_rest(Point2::origin(), 1.9885e30).with_name("Sun"));
/// let earth = sim.add_body_circular_orbit(sun, 1.496e11, 0.0, BodyProps::new(5.972e24));
/// assert!(earth.is_valid());
///
/// let outcome = sim.tick(3600.0);
/// assert!(outcome.is_advanced());
/// assert_eq!(sim.time_seconds(), 3600.0);
/// ```
pub struct Simulation {
    store: BodyStore,
    time_seconds: f64,
    trail_tick: u32,
    config: SimConfig,
    seed: SystemSeed,
    scratch: ScratchArena<Vector2<f64>>,
    force: Box<dyn ForceModel>,
    integrator: Box<dyn Integrator>,
}

impl Simulation {
    /// Creates a simulation and populates it from `seed`
    pub fn new(config: SimConfig, seed: SystemSeed) -> Self {
        let mut sim = Self {
            store: BodyStore::new(config.trail_capacity),
            time_seconds: 0.0,
            trail_tick: 0,
            config,
            seed,
            scratch: ScratchArena::new(config.scratch_capacity),
            force: Box::new(DirectGravity),
            integrator: Box::new(VelocityVerlet),
        };
        sim.populate();
        sim
    }

    /// A simulation with no seed bodies; `reset` empties it again
    pub fn empty(config: SimConfig) -> Self {
        Self::new(config, SystemSeed::default())
    }

    pub fn from_scenario(scenario: ScenarioConfig) -> Self {
        Self::new(scenario.simulation, scenario.seed)
    }

    /// Replaces the force model. Intended for tests and alternative physics.
    pub fn with_force_model(mut self, force: impl ForceModel + 'static) -> Self {
        self.force = Box::new(force);
        self
    }

    /// Discards all bodies, trails and elapsed time, then re-seeds
    pub fn reset(&mut self) {
        self.store.clear();
        self.time_seconds = 0.0;
        self.trail_tick = 0;
        self.populate();
        log::debug!("simulation reset with {} bodies", self.store.len());
    }

    fn populate(&mut self) {
        let seed = std::mem::take(&mut self.seed);

        for entry in &seed.bodies {
            let props = BodyProps {
                mass: entry.mass,
                radius: entry.radius,
                color: entry.color,
                name: entry.name.clone(),
            };

            let id = match &entry.orbit {
                Placement::Fixed { position, velocity } => self.add_body(Body {
                    position: (*position).into(),
                    velocity: (*velocity).into(),
                    mass: props.mass,
                    radius: props.radius,
                    color: props.color,
                    name: props.name,
                }),
                Placement::Circular {
                    parent,
                    radius,
                    angle_deg,
                } => {
                    let parent = self.parent_id(parent);
                    self.add_body_circular_orbit(parent, *radius, angle_deg.to_radians(), props)
                }
                Placement::Elliptical {
                    parent,
                    periapsis,
                    apoapsis,
                    true_anomaly_deg,
                } => {
                    let parent = self.parent_id(parent);
                    self.add_body_elliptical_orbit(
                        parent,
                        *periapsis,
                        *apoapsis,
                        true_anomaly_deg.to_radians(),
                        props,
                    )
                }
            };

            if !id.is_valid() {
                log::warn!("seed body {:?} was not placed", entry.name);
            }
        }

        log::debug!(
            "seeded {} of {} bodies",
            self.store.len(),
            seed.bodies.len()
        );
        self.seed = seed;
    }

    fn parent_id(&self, name: &str) -> BodyId {
        self.store.find_by_name(name).unwrap_or(BodyId::INVALID)
    }

    /// Inserts a body with an empty trail and returns its id
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.store.insert(body)
    }

    /// Adds a body on a circular orbit around `parent`, at `angle` radians
    /// from the +x axis
    ///
    /// Returns [`BodyId::INVALID`] and leaves the store untouched if `parent`
    /// does not exist or the orbit is degenerate.
    pub fn add_body_circular_orbit(
        &mut self,
        parent: BodyId,
        radius: f64,
        angle: f64,
        props: BodyProps,
    ) -> BodyId {
        let Some(parent_body) = self.store.get(parent) else {
            log::warn!("circular orbit rejected: no parent body {:?}", parent);
            return BodyId::INVALID;
        };

        match orbit::circular_orbit(parent_body, radius, angle, props) {
            Ok(body) => self.insert_seeded(body),
            Err(err) => {
                log::warn!("circular orbit around {:?} rejected: {}", parent, err);
                BodyId::INVALID
            }
        }
    }

    /// Adds a body on an elliptical orbit around `parent`, at true anomaly
    /// `true_anomaly` radians with periapsis on the +x axis
    ///
    /// Returns [`BodyId::INVALID`] and leaves the store untouched if `parent`
    /// does not exist or the apsides are invalid.
    pub fn add_body_elliptical_orbit(
        &mut self,
        parent: BodyId,
        periapsis: f64,
        apoapsis: f64,
        true_anomaly: f64,
        props: BodyProps,
    ) -> BodyId {
        let Some(parent_body) = self.store.get(parent) else {
            log::warn!("elliptical orbit rejected: no parent body {:?}", parent);
            return BodyId::INVALID;
        };

        match orbit::elliptical_orbit(parent_body, periapsis, apoapsis, true_anomaly, props) {
            Ok(body) => self.insert_seeded(body),
            Err(err) => {
                log::warn!("elliptical orbit around {:?} rejected: {}", parent, err);
                BodyId::INVALID
            }
        }
    }

    // Orbits are built from the parent's state as it is right now. At
    // startup and after reset that is the seeded state; later it is the
    // integrated one.
    fn insert_seeded(&mut self, body: Body) -> BodyId {
        if self.time_seconds > 0.0 {
            log::debug!(
                "seeding {:?} at t = {} s from the parent's current state",
                body.name(),
                self.time_seconds
            );
        }
        self.store.insert(body)
    }

    /// Advances the simulation by `dt_seconds` using velocity-Verlet
    ///
    /// Nothing changes, and the reason is returned, when there are no
    /// bodies, `dt_seconds` is not positive, or scratch memory runs out.
    pub fn tick(&mut self, dt_seconds: f64) -> TickOutcome {
        let count = self.store.len();
        if count == 0 {
            return TickOutcome::Skipped(SkipReason::NoBodies);
        }
        if !(dt_seconds > 0.0) {
            return TickOutcome::Skipped(SkipReason::NonPositiveDt);
        }

        let mut scratch = self.scratch.checkpoint();
        let (start, end) = match reserve_step(&mut scratch, count) {
            Ok(spans) => spans,
            Err(err) => {
                log::debug!("tick skipped: {}", err);
                return TickOutcome::Skipped(SkipReason::ScratchExhausted(err));
            }
        };
        let (start, end) = scratch.pair_mut(start, end);

        let (bodies, trails) = self.store.split_mut();
        self.integrator
            .step(bodies, dt_seconds, self.force.as_ref(), StepBuffers { start, end });

        let interval = self.config.trail_record_interval;
        if interval > 0 {
            self.trail_tick += 1;
            if self.trail_tick >= interval {
                for (body, trail) in bodies.iter().zip(trails.iter_mut()) {
                    trail.record(body.position);
                }
                self.trail_tick = 0;
            }
        }

        self.time_seconds += dt_seconds;
        log::trace!("tick dt = {} s, t = {} s", dt_seconds, self.time_seconds);

        TickOutcome::Advanced {
            time_seconds: self.time_seconds,
        }
    }

    /// Runs `n_steps` ticks of `dt_seconds` and returns the final time
    pub fn advance(&mut self, dt_seconds: f64, n_steps: usize) -> f64 {
        for _ in 0..n_steps {
            self.tick(dt_seconds);
        }
        self.time_seconds
    }

    pub fn time_seconds(&self) -> f64 {
        self.time_seconds
    }

    pub fn body_count(&self) -> usize {
        self.store.len()
    }

    pub fn store(&self) -> &BodyStore {
        &self.store
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.store.get(id)
    }

    pub fn trail(&self, id: BodyId) -> Option<&TrailBuffer> {
        self.store.trail(id)
    }

    /// Bodies with their trails, for rendering
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (BodyId, &Body, &TrailBuffer)> + '_ {
        self.store.iter()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> &SystemSeed {
        &self.seed
    }

    pub fn scratch(&self) -> &ScratchArena<Vector2<f64>> {
        &self.scratch
    }

    /// Shared scratch arena. Other users must release what they reserve
    /// (see [`ScratchArena::checkpoint`]) or ticks will start failing.
    pub fn scratch_mut(&mut self) -> &mut ScratchArena<Vector2<f64>> {
        &mut self.scratch
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.store.bodies().iter().map(|b| b.kinetic_energy()).sum()
    }

    pub fn potential_energy(&self) -> f64 {
        self.force.potential_energy(self.store.bodies())
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.potential_energy()
    }

    pub fn total_momentum(&self) -> Vector2<f64> {
        self.store
            .bodies()
            .iter()
            .map(|b| b.momentum())
            .fold(Vector2::zeros(), |acc, p| acc + p)
    }

    pub fn total_angular_momentum(&self) -> f64 {
        self.store
            .bodies()
            .iter()
            .map(|b| b.angular_momentum())
            .sum()
    }
}

fn reserve_step(
    scratch: &mut ScratchArena<Vector2<f64>>,
    count: usize,
) -> Result<(ScratchSpan, ScratchSpan), ScratchError> {
    let start = scratch.reserve(count)?;
    let end = scratch.reserve(count)?;
    Ok((start, end))
}
