use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::body::{Body, Color};
use crate::forces::G;
use crate::orbit::*;

const SUN_MASS: f64 = 1.9885e30;
const EARTH_MASS: f64 = 5.972e24;
const AU: f64 = 1.496e11;

fn sun() -> Body {
    Body::at_rest(Point2::origin(), SUN_MASS)
}

/// r × v per unit mass, relative to the parent
fn specific_angular_momentum(parent: &Body, body: &Body) -> f64 {
    let r = body.position - parent.position;
    let v = body.velocity - parent.velocity;
    r.x * v.y - r.y * v.x
}

fn specific_energy(parent: &Body, body: &Body) -> f64 {
    let r = (body.position - parent.position).magnitude();
    let v = (body.velocity - parent.velocity).magnitude();
    0.5 * v * v - G * parent.mass / r
}

#[test]
fn test_circular_speed_matches_formula() {
    let earth = circular_orbit(&sun(), AU, 0.0, BodyProps::new(EARTH_MASS)).unwrap();

    let expected = (G * SUN_MASS / AU).sqrt();
    assert_relative_eq!(earth.speed(), expected, max_relative = 1e-12);
    assert_relative_eq!(circular_speed(SUN_MASS, AU), expected);
    // Roughly 29.8 km/s
    assert!((earth.speed() - 29_780.0).abs() < 100.0);
}

#[test]
fn test_circular_geometry_at_quarter_turn() {
    let body = circular_orbit(&sun(), AU, FRAC_PI_2, BodyProps::new(EARTH_MASS)).unwrap();
    let v = circular_speed(SUN_MASS, AU);

    assert!(body.position.x.abs() < 1e-3);
    assert_relative_eq!(body.position.y, AU, max_relative = 1e-12);

    // Counter-clockwise: moving toward -x at the top of the circle
    assert_relative_eq!(body.velocity.x, -v, max_relative = 1e-12);
    assert!(body.velocity.y.abs() < 1e-9);
}

#[test]
fn test_circular_velocity_is_tangential() {
    for angle in [0.0, 0.3, 1.9, 3.5, 5.9] {
        let body = circular_orbit(&sun(), AU, angle, BodyProps::new(EARTH_MASS)).unwrap();
        let radial = body.position.coords.normalize();
        let along = body.velocity.normalize();

        assert!(radial.dot(&along).abs() < 1e-12, "angle {angle}");
        assert!(specific_angular_momentum(&sun(), &body) > 0.0);
    }
}

#[test]
fn test_orbit_is_relative_to_moving_parent() {
    let earth = Body::new(
        Point2::new(AU, 0.0),
        Vector2::new(0.0, 29_780.0),
        EARTH_MASS,
    );

    let moon = circular_orbit(&earth, 3.844e8, 0.0, BodyProps::new(7.342e22)).unwrap();

    assert_eq!(moon.position, Point2::new(AU + 3.844e8, 0.0));
    let v_rel = circular_speed(EARTH_MASS, 3.844e8);
    assert_relative_eq!(moon.velocity.y, 29_780.0 + v_rel, max_relative = 1e-12);
    assert_eq!(moon.velocity.x, 0.0);
}

#[test]
fn test_props_are_carried_through() {
    let props = BodyProps::new(EARTH_MASS)
        .with_radius(6.371e6)
        .with_color(Color::BLUE)
        .with_name("Earth");

    let earth = circular_orbit(&sun(), AU, 0.0, props).unwrap();

    assert_eq!(earth.mass, EARTH_MASS);
    assert_eq!(earth.radius, 6.371e6);
    assert_eq!(earth.color, Color::BLUE);
    assert_eq!(earth.name(), Some("Earth"));
}

#[test]
fn test_elliptical_with_equal_apsides_is_circular() {
    for angle in [0.0, 1.0, 2.5, 4.0] {
        let ellipse =
            elliptical_orbit(&sun(), AU, AU, angle, BodyProps::new(EARTH_MASS)).unwrap();
        let circle = circular_orbit(&sun(), AU, angle, BodyProps::new(EARTH_MASS)).unwrap();

        assert_relative_eq!(ellipse.speed(), circular_speed(SUN_MASS, AU), max_relative = 1e-12);
        assert!((ellipse.position - circle.position).magnitude() < 1e-3);
        assert!((ellipse.velocity - circle.velocity).magnitude() < 1e-6);
    }
}

#[test]
fn test_elliptical_shape() {
    let ellipse = Ellipse::from_apsides(1.0, 3.0).unwrap();

    assert_eq!(ellipse.semi_major_axis, 2.0);
    assert_eq!(ellipse.eccentricity, 0.5);
    assert_relative_eq!(ellipse.radius_at(0.0), 1.0);
    assert_relative_eq!(ellipse.radius_at(PI), 3.0);
}

#[test]
fn test_elliptical_at_periapsis() {
    let (peri, apo) = (4.6001e10, 6.9817e10);
    let body = elliptical_orbit(&sun(), peri, apo, 0.0, BodyProps::new(3.3011e23)).unwrap();

    let a = (peri + apo) / 2.0;
    let e = (apo - peri) / (apo + peri);
    let expected = (G * SUN_MASS * (1.0 + e) / (a * (1.0 - e))).sqrt();

    assert_relative_eq!(body.position.x, peri, max_relative = 1e-12);
    assert_eq!(body.position.y, 0.0);
    assert_relative_eq!(body.velocity.y, expected, max_relative = 1e-9);
    assert!(body.velocity.x.abs() < 1e-6);
}

#[test]
fn test_elliptical_at_apoapsis() {
    let (peri, apo) = (4.6001e10, 6.9817e10);
    let body = elliptical_orbit(&sun(), peri, apo, PI, BodyProps::new(3.3011e23)).unwrap();

    let a = (peri + apo) / 2.0;
    let e = (apo - peri) / (apo + peri);
    let expected = (G * SUN_MASS * (1.0 - e) / (a * (1.0 + e))).sqrt();

    assert_relative_eq!(body.position.x, -apo, max_relative = 1e-12);
    assert_relative_eq!(body.velocity.y, -expected, max_relative = 1e-9);
}

#[test]
fn test_elliptical_radial_velocity_sign() {
    let parent = sun();
    let climbing = elliptical_orbit(&parent, AU, 2.0 * AU, 1.0, BodyProps::new(1.0)).unwrap();
    let falling = elliptical_orbit(&parent, AU, 2.0 * AU, -1.0, BodyProps::new(1.0)).unwrap();

    let radial = |b: &Body| (b.position - parent.position).dot(&b.velocity);
    assert!(radial(&climbing) > 0.0);
    assert!(radial(&falling) < 0.0);
}

#[test]
fn test_elliptical_points_share_one_orbit() {
    // Energy and angular momentum fix a and e, so every true anomaly must
    // give the same values
    let parent = sun();
    let (peri, apo) = (AU, 3.0 * AU);
    let a = (peri + apo) / 2.0;
    let e = (apo - peri) / (apo + peri);
    let mu = G * SUN_MASS;

    for theta in [0.0, 0.4, 1.3, 2.2, 3.0, 4.4, 5.5] {
        let body = elliptical_orbit(&parent, peri, apo, theta, BodyProps::new(1.0)).unwrap();

        assert_relative_eq!(
            specific_energy(&parent, &body),
            -mu / (2.0 * a),
            max_relative = 1e-9
        );
        assert_relative_eq!(
            specific_angular_momentum(&parent, &body),
            (mu * a * (1.0 - e * e)).sqrt(),
            max_relative = 1e-9
        );
    }
}

#[test]
fn test_flight_path_angle() {
    assert_eq!(flight_path_angle(0.0, 1.0), 0.0);
    assert_eq!(flight_path_angle(0.5, 0.0), 0.0);
    assert_relative_eq!(
        flight_path_angle(0.5, FRAC_PI_2),
        0.5_f64.atan(),
        max_relative = 1e-12
    );
}

#[test]
fn test_orbital_period() {
    // One year for Earth, to within a fraction of a percent
    let period = orbital_period(SUN_MASS, AU);
    assert!((period / 86_400.0 - 365.25).abs() < 1.0);
}

#[test]
fn test_rejects_degenerate_orbits() {
    let parent = sun();

    assert_eq!(
        circular_orbit(&parent, 0.0, 0.0, BodyProps::new(1.0)),
        Err(OrbitError::InvalidRadius(0.0))
    );
    assert!(circular_orbit(&parent, f64::NAN, 0.0, BodyProps::new(1.0)).is_err());
    assert!(matches!(
        elliptical_orbit(&parent, 2.0, 1.0, 0.0, BodyProps::new(1.0)),
        Err(OrbitError::InvalidApsides { .. })
    ));
    assert!(elliptical_orbit(&parent, 0.0, 1.0, 0.0, BodyProps::new(1.0)).is_err());

    let negative = Body::at_rest(Point2::origin(), -1.0);
    assert_eq!(
        circular_orbit(&negative, AU, 0.0, BodyProps::new(1.0)),
        Err(OrbitError::InvalidParentMass(-1.0))
    );
    assert!(matches!(
        elliptical_orbit(
            &Body::at_rest(Point2::origin(), f64::INFINITY),
            AU,
            AU,
            0.0,
            BodyProps::new(1.0)
        ),
        Err(OrbitError::InvalidParentMass(_))
    ));
}

#[test]
fn test_massless_parent_gives_co_moving_body() {
    let marker = Body::new(Point2::new(5.0, -5.0), Vector2::new(10.0, 20.0), 0.0);

    let circle = circular_orbit(&marker, 1.0e6, FRAC_PI_2, BodyProps::new(1.0)).unwrap();
    assert!((circle.position - Point2::new(5.0, 1.0e6 - 5.0)).magnitude() < 1e-6);
    assert_eq!(circle.velocity, marker.velocity);

    let ellipse = elliptical_orbit(&marker, 1.0e6, 2.0e6, 1.0, BodyProps::new(1.0)).unwrap();
    assert_eq!(ellipse.velocity, marker.velocity);
    assert!(ellipse.position.x.is_finite() && ellipse.position.y.is_finite());
}
