//! Time integration for N-body systems
//!
//! Integrators advance positions and velocities by one step using
//! accelerations from a [`ForceModel`]. They never allocate: the caller
//! provides the acceleration buffers, normally carved out of a
//! [`ScratchArena`](crate::scratch::ScratchArena).

use crate::body::Body;
use crate::forces::ForceModel;
use nalgebra::Vector2;

/// Caller-owned acceleration buffers for one step, one entry per body
pub struct StepBuffers<'a> {
    /// Accelerations at the start of the step
    pub start: &'a mut [Vector2<f64>],
    /// Accelerations after the position update
    pub end: &'a mut [Vector2<f64>],
}

/// A time integrator for N-body systems
pub trait Integrator: Send + Sync {
    /// Advance `bodies` by `dt` seconds
    ///
    /// Both buffers in `buffers` must be as long as `bodies`.
    fn step(
        &self,
        bodies: &mut [Body],
        dt: f64,
        force: &dyn ForceModel,
        buffers: StepBuffers<'_>,
    );
}

/// Velocity-Verlet integrator (2nd order, symplectic)
///
/// 1. a0 = a(x(t))
/// 2. x(t + dt) = x(t) + v(t) dt + ½ a0 dt²
/// 3. a1 = a(x(t + dt))
/// 4. v(t + dt) = v(t) + ½ (a0 + a1) dt
///
/// The order matters: evaluating a1 before the positions move, or updating
/// velocities from a0 alone, degrades the scheme to first order.
///
/// # Examples
///
/// ```
/// use nalgebra::{Point2, Vector2};
/// use orrery::body::Body;
/// use orrery::forces::DirectGravity;
/// use orrery::integrator::{Integrator, StepBuffers, VelocityVerlet};
///
/// let mut bodies = vec![
///     Body::at_rest(Point2::new(0.0, 0.0), 1.0e24),
///     Body::at_rest(Point2::new(1.0e7, 0.0), 1.0e24),
/// ];
/// let mut start = vec![Vector2::zeros(); 2];
/// let mut end = vec![Vector2::zeros(); 2];
///
/// VelocityVerlet.step(
///     &mut bodies,
///     1.0,
///     &DirectGravity,
///     StepBuffers { start: &mut start, end: &mut end },
/// );
///
/// // Released from rest, the pair falls together
/// assert!(bodies[0].velocity.x > 0.0);
/// assert!(bodies[1].velocity.x < 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityVerlet;

impl Integrator for VelocityVerlet {
    fn step(
        &self,
        bodies: &mut [Body],
        dt: f64,
        force: &dyn ForceModel,
        buffers: StepBuffers<'_>,
    ) {
        let StepBuffers { start, end } = buffers;
        debug_assert_eq!(start.len(), bodies.len());
        debug_assert_eq!(end.len(), bodies.len());

        force.accumulate(bodies, start);

        let half_dt2 = 0.5 * dt * dt;
        bodies.iter_mut().zip(start.iter()).for_each(|(body, a0)| {
            body.position += body.velocity * dt + a0 * half_dt2;
        });

        force.accumulate(bodies, end);

        let half_dt = 0.5 * dt;
        bodies
            .iter_mut()
            .zip(start.iter().zip(end.iter()))
            .for_each(|(body, (a0, a1))| {
                body.velocity += (a0 + a1) * half_dt;
            });
    }
}
