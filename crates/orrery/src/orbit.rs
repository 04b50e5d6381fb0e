//! Initial conditions for bodies orbiting a parent body.
//!
//! Everything here is pure: given a parent's current state, compute the
//! position and velocity of a new body on a circular or elliptical Keplerian
//! orbit around it. The parent's position and velocity are added to the
//! relative state, so orbits can be nested (moons around moving planets).
//!
//! Orbits are counter-clockwise, with angles measured from the +x axis.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::{Point2, Vector2};

use crate::body::{is_valid_mass, Body, Color};
use crate::forces::G;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum OrbitError {
    #[error("orbit radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("periapsis {periapsis} and apoapsis {apoapsis} must satisfy 0 < periapsis <= apoapsis")]
    InvalidApsides { periapsis: f64, apoapsis: f64 },
    #[error("parent mass must be finite and not negative, got {0}")]
    InvalidParentMass(f64),
}

/// Physical and display properties of a body that is about to be placed on
/// an orbit
#[derive(Debug, Clone, PartialEq)]
pub struct BodyProps {
    pub mass: f64,   // kg
    pub radius: f32, // m, display only
    pub color: Color,
    pub name: Option<String>,
}

impl BodyProps {
    pub fn new(mass: f64) -> Self {
        Self {
            mass,
            radius: 1.0,
            color: Color::default(),
            name: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn into_body(self, position: Point2<f64>, velocity: Vector2<f64>) -> Body {
        Body {
            position,
            velocity,
            mass: self.mass,
            radius: self.radius,
            color: self.color,
            name: self.name,
        }
    }
}

/// Speed of a circular orbit of radius `r` around `parent_mass`
pub fn circular_speed(parent_mass: f64, r: f64) -> f64 {
    (G * parent_mass / r).sqrt()
}

/// Vis-viva speed at distance `r` on an orbit with semi-major axis `a`
pub fn vis_viva_speed(parent_mass: f64, r: f64, a: f64) -> f64 {
    (G * parent_mass * (2.0 / r - 1.0 / a)).sqrt()
}

/// Kepler's third law: T = 2π√(a³/GM), in seconds
pub fn orbital_period(parent_mass: f64, a: f64) -> f64 {
    TAU * (a.powi(3) / (G * parent_mass)).sqrt()
}

/// Angle between the velocity and the local horizontal at true anomaly
/// `true_anomaly` on an orbit of eccentricity `e`
pub fn flight_path_angle(e: f64, true_anomaly: f64) -> f64 {
    (e * true_anomaly.sin()).atan2(1.0 + e * true_anomaly.cos())
}

/// Shape of an ellipse given its apsides
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
}

impl Ellipse {
    pub fn from_apsides(periapsis: f64, apoapsis: f64) -> Result<Self, OrbitError> {
        let valid = periapsis.is_finite()
            && apoapsis.is_finite()
            && periapsis > 0.0
            && periapsis <= apoapsis;
        if !valid {
            return Err(OrbitError::InvalidApsides {
                periapsis,
                apoapsis,
            });
        }

        Ok(Self {
            semi_major_axis: (periapsis + apoapsis) / 2.0,
            eccentricity: (apoapsis - periapsis) / (apoapsis + periapsis),
        })
    }

    /// Distance from the focus at the given true anomaly
    pub fn radius_at(&self, true_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        self.semi_major_axis * (1.0 - e * e) / (1.0 + e * true_anomaly.cos())
    }
}

// A massless parent is fine: the orbit degenerates to co-moving at rest
// relative to it.
fn check_parent(parent: &Body) -> Result<(), OrbitError> {
    if is_valid_mass(parent.mass) {
        Ok(())
    } else {
        Err(OrbitError::InvalidParentMass(parent.mass))
    }
}

/// Places a body on a circular orbit of radius `radius` around `parent`,
/// at angle `angle` (radians) from the +x axis.
///
/// # Examples
///
/// ```
/// use nalgebra::Point2;
/// use orrery::body::Body;
/// use orrery::orbit::{circular_orbit, circular_speed, BodyProps};
///
/// let sun = Body::at_rest(Point2::origin(), 1.9885e30);
/// let earth = circular_orbit(&sun, 1.496e11, 0.0, BodyProps::new(5.972e24)).unwrap();
///
/// assert_eq!(earth.position, Point2::new(1.496e11, 0.0));
/// assert!((earth.velocity.y - circular_speed(1.9885e30, 1.496e11)).abs() < 1e-9);
/// ```
pub fn circular_orbit(
    parent: &Body,
    radius: f64,
    angle: f64,
    props: BodyProps,
) -> Result<Body, OrbitError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(OrbitError::InvalidRadius(radius));
    }
    check_parent(parent)?;

    let (sin, cos) = angle.sin_cos();
    let speed = circular_speed(parent.mass, radius);

    let position = parent.position + Vector2::new(cos, sin) * radius;
    let velocity = parent.velocity + Vector2::new(-sin, cos) * speed;

    Ok(props.into_body(position, velocity))
}

/// Places a body on an elliptical orbit around `parent` with the given
/// apsides, at true anomaly `true_anomaly` (radians). Periapsis lies on the
/// +x axis.
///
/// The speed follows vis-viva. The velocity is rotated off the local
/// horizontal by the flight-path angle, outward while the body climbs from
/// periapsis (`0 < true_anomaly < π`) and inward on the way back.
///
/// For counter-clockwise motion that makes the heading
/// `true_anomaly + π/2 − φ`. Adding φ instead would point the radial
/// component the wrong way.
pub fn elliptical_orbit(
    parent: &Body,
    periapsis: f64,
    apoapsis: f64,
    true_anomaly: f64,
    props: BodyProps,
) -> Result<Body, OrbitError> {
    let ellipse = Ellipse::from_apsides(periapsis, apoapsis)?;
    check_parent(parent)?;

    let r = ellipse.radius_at(true_anomaly);
    let speed = vis_viva_speed(parent.mass, r, ellipse.semi_major_axis);
    let phi = flight_path_angle(ellipse.eccentricity, true_anomaly);
    let heading = true_anomaly + FRAC_PI_2 - phi;

    let (sin, cos) = true_anomaly.sin_cos();
    let (heading_sin, heading_cos) = heading.sin_cos();

    let position = parent.position + Vector2::new(cos, sin) * r;
    let velocity = parent.velocity + Vector2::new(heading_cos, heading_sin) * speed;

    Ok(props.into_body(position, velocity))
}
