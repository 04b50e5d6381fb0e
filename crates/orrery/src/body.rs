use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Insertion index of a body in the [`BodyStore`](crate::store::BodyStore).
///
/// Ids are stable for the lifetime of a store because bodies are never
/// removed. If removal is ever added, this must become a generation-checked
/// handle instead of a plain index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    /// Sentinel returned by seeding operations that were rejected
    pub const INVALID: BodyId = BodyId(u32::MAX);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Id for the body stored at `index`, or `None` if the index does not
    /// fit in a `u32` or would collide with [`BodyId::INVALID`]
    pub fn from_index(index: usize) -> Option<BodyId> {
        u32::try_from(index)
            .ok()
            .map(BodyId)
            .filter(|id| id.is_valid())
    }
}

/// RGBA display color. Not used by the physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ColorSpec")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);
    pub const GRAY: Color = Color::rgb(130, 130, 130);
    pub const YELLOW: Color = Color::rgb(253, 249, 0);
    pub const ORANGE: Color = Color::rgb(255, 161, 0);
    pub const RED: Color = Color::rgb(230, 41, 55);
    pub const BLUE: Color = Color::rgb(0, 121, 241);
    pub const SKY_BLUE: Color = Color::rgb(102, 191, 255);
    pub const BROWN: Color = Color::rgb(127, 106, 79);
    pub const BEIGE: Color = Color::rgb(211, 176, 131);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha, e.g. for fading trails
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Accepted spellings of a color in scenario files
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Named(NamedColor),
    Rgb([u8; 3]),
    Rgba([u8; 4]),
    Fields { r: u8, g: u8, b: u8, a: u8 },
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum NamedColor {
    White,
    LightGray,
    Gray,
    Yellow,
    Orange,
    Red,
    Blue,
    SkyBlue,
    Brown,
    Beige,
}

impl From<ColorSpec> for Color {
    fn from(spec: ColorSpec) -> Self {
        match spec {
            ColorSpec::Named(named) => match named {
                NamedColor::White => Color::WHITE,
                NamedColor::LightGray => Color::LIGHT_GRAY,
                NamedColor::Gray => Color::GRAY,
                NamedColor::Yellow => Color::YELLOW,
                NamedColor::Orange => Color::ORANGE,
                NamedColor::Red => Color::RED,
                NamedColor::Blue => Color::BLUE,
                NamedColor::SkyBlue => Color::SKY_BLUE,
                NamedColor::Brown => Color::BROWN,
                NamedColor::Beige => Color::BEIGE,
            },
            ColorSpec::Rgb([r, g, b]) => Color::rgb(r, g, b),
            ColorSpec::Rgba([r, g, b, a]) | ColorSpec::Fields { r, g, b, a } => {
                Color::rgba(r, g, b, a)
            }
        }
    }
}

/// Masses accepted anywhere in the engine: finite and not negative.
/// Massless bodies are allowed; they feel gravity but exert none.
pub fn is_valid_mass(mass: f64) -> bool {
    mass.is_finite() && mass >= 0.0
}

/// A simulated point mass
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Point2<f64>,  // m
    pub velocity: Vector2<f64>, // m/s
    pub mass: f64,              // kg
    pub radius: f32,            // m, display only
    pub color: Color,
    pub name: Option<String>,
}

impl Body {
    /// Creates a body at rest at `position`
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::Point2;
    /// use orrery::body::{Body, Color};
    ///
    /// let sun = Body::at_rest(Point2::origin(), 1.9885e30)
    ///     .with_radius(6.9634e8)
    ///     .with_color(Color::YELLOW)
    ///     .with_name("Sun");
    ///
    /// assert_eq!(sun.name(), Some("Sun"));
    /// assert_eq!(sun.speed(), 0.0);
    /// ```
    pub fn at_rest(position: Point2<f64>, mass: f64) -> Self {
        Self::new(position, Vector2::zeros(), mass)
    }

    pub fn new(position: Point2<f64>, velocity: Vector2<f64>, mass: f64) -> Self {
        Self {
            position,
            velocity,
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

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).magnitude()
    }

    /// z-component of r × p about the origin
    pub fn angular_momentum(&self) -> f64 {
        self.mass * (self.position.x * self.velocity.y - self.position.y * self.velocity.x)
    }
}
