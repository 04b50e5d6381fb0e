//! Direct N-body gravity (O(N²) implementation)

use crate::body::Body;
use crate::forces::{ForceModel, G};
use nalgebra::Vector2;

/// Direct O(N²) gravitational acceleration
///
/// Visits every unordered pair once and applies the same displacement to
/// both bodies with opposite signs, so momentum is conserved exactly up to
/// floating point rounding. There is no softening: coincident bodies produce
/// non-finite accelerations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectGravity;

impl ForceModel for DirectGravity {
    fn accumulate(&self, bodies: &[Body], out: &mut [Vector2<f64>]) {
        debug_assert_eq!(bodies.len(), out.len());
        out.fill(Vector2::zeros());

        for (i, body_i) in bodies.iter().enumerate() {
            for (j, body_j) in bodies.iter().enumerate().skip(i + 1) {
                let d = body_j.position - body_i.position;
                let dist2 = d.magnitude_squared();
                let dist = dist2.sqrt();
                let inv_dist3 = 1.0 / (dist2 * dist);

                out[i] += d * (G * body_j.mass * inv_dist3);
                out[j] -= d * (G * body_i.mass * inv_dist3);
            }
        }
    }

    fn potential_energy(&self, bodies: &[Body]) -> f64 {
        bodies
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                bodies[i + 1..]
                    .iter()
                    .map(move |b| -G * a.mass * b.mass / a.distance_to(b))
            })
            .sum()
    }
}
