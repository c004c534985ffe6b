//! Geometric primitives produced by layout engines.
//!
//! # Coordinate System
//!
//! Trellis uses a screen coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

use serde::{Deserialize, Serialize};

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// use trellis_core::geometry::Point;
///
/// let p = Point::new(10.0, 20.0);
/// assert_eq!(p.transpose(), Point::new(20.0, 10.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Create a new point from its coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Get the x coordinate.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Get the y coordinate.
    pub fn y(self) -> f32 {
        self.y
    }

    /// Add another point's coordinates to this one.
    pub fn add_point(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Subtract another point's coordinates from this one.
    pub fn sub_point(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Swap the axes. Used to turn a top-down layout into a left-to-right one.
    pub fn transpose(self) -> Self {
        Self::new(self.y, self.x)
    }
}

/// Direction in which layers of a layered layout advance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Parents above children.
    #[default]
    Down,
    /// Parents left of children.
    Right,
}

impl Orientation {
    /// Map a point computed for a top-down layout into this orientation.
    pub fn orient(self, point: Point) -> Point {
        match self {
            Self::Down => point,
            Self::Right => point.transpose(),
        }
    }
}
