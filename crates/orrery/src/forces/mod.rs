//! Force models for N-body simulations
//!
//! This module provides the `ForceModel` trait and the direct pairwise
//! Newtonian gravity that drives the integrator.

use crate::body::Body;
use nalgebra::Vector2;

pub mod gravity;


pub use gravity::DirectGravity;

/// Gravitational constant in m³ kg⁻¹ s⁻²
pub const G: f64 = 6.67430e-11;

/// A source of acceleration on bodies in an N-body system
///
/// Implementations write one acceleration per body into a caller-owned
/// buffer, so the integrator can keep its buffers in scratch memory.
///
/// # Examples
///
/// ```
/// use nalgebra::{Point2, Vector2};
/// use orrery::body::Body;
/// use orrery::forces::{DirectGravity, ForceModel};
///
/// let bodies = vec![
///     Body::at_rest(Point2::new(0.0, 0.0), 1.0e24),
///     Body::at_rest(Point2::new(1.0e7, 0.0), 1.0e22),
/// ];
///
/// let mut accels = vec![Vector2::zeros(); bodies.len()];
/// DirectGravity.accumulate(&bodies, &mut accels);
///
/// // The two bodies pull toward each other
/// assert!(accels[0].x > 0.0);
/// assert!(accels[1].x < 0.0);
/// ```
pub trait ForceModel: Send + Sync {
    /// Overwrite `out[i]` with the acceleration on `bodies[i]` in m/s²
    ///
    /// `out` must have the same length as `bodies`. It is zeroed before any
    /// contribution is added.
    fn accumulate(&self, bodies: &[Body], out: &mut [Vector2<f64>]);

    /// Potential energy of the configuration in joules
    ///
    /// Default implementation returns 0.0 for models that are not
    /// conservative.
    fn potential_energy(&self, _bodies: &[Body]) -> f64 {
        0.0
    }
}
