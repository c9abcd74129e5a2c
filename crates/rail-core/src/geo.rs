//! Planar coordinates for the track layout.
//!
//! The layout is drawn on a flat canvas, so `Point` is a plain Euclidean
//! `(x, y)` pair in layout units.  Train speeds are expressed in the same
//! units per tick.

use std::ops::{Add, Mul, Sub};

/// A 2-D layout coordinate.  Value type, no identity.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of `self` treated as a vector.
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the direction of `self`, or `ORIGIN` for a zero vector.
    pub fn normalized(self) -> Point {
        let len = self.length();
        if len == 0.0 {
            Point::ORIGIN
        } else {
            Point::new(self.x / len, self.y / len)
        }
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Point at fraction `t` of the way from `self` to `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }

    /// `true` if the two points are within `eps` of each other.
    #[inline]
    pub fn approx_eq(self, other: Point, eps: f64) -> bool {
        self.distance(other) <= eps
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
