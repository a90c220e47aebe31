//! Two-dimensional points and Euclidean distance

use std::fmt;

/// A point in the (birth rate, life expectancy) plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Birth rate
    pub x: f64,
    /// Life expectancy
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The fallback position given to a centroid whose cluster received no points
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Euclidean distance between two points
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    ((p1.x - p2.x).powi(2) + (p1.y - p2.y).powi(2)).sqrt()
}
