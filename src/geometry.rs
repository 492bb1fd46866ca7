use crate::error::Error;
use ordered_float::NotNan;
use std::ops::Sub;

/// A 2D point in image coordinates: x grows to the right, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Result<Self, Error> {
        Ok(Self {
            x: finite(x)?,
            y: finite(y)?,
        })
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.y
    }

    #[inline]
    pub(crate) fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub(crate) fn norm(self) -> f32 {
        self.dot(self).sqrt()
    }
}

fn finite(value: f32) -> Result<f32, Error> {
    let value = NotNan::new(value)
        .map_err(|e| Error::ConstructNotNan(e, value))?
        .into_inner();
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFiniteCoordinate(value))
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::Output {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Upward direction on screen.
const UP: Point = Point { x: 0.0, y: -1.0 };

/// Angle in degrees between two non-zero vectors, in [0, 180].
fn angle_between(u: Point, v: Point, origin: Point) -> Result<f32, Error> {
    let norms = u.norm() * v.norm();
    // zero-length segments, and coordinates so far apart that the products overflow
    if norms == 0.0 || !norms.is_finite() {
        return Err(Error::DegenerateSegment(origin));
    }
    let cosine = u.dot(v) / norms;
    if !cosine.is_finite() {
        return Err(Error::DegenerateSegment(origin));
    }
    // rounding can push the cosine just outside of acos' domain
    Ok(cosine.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Angle in degrees at `b` formed by the rays `b -> a` and `b -> c`.
///
/// The result is always in [0, 180]. Fails when either ray has zero length.
pub fn angle_at_vertex(a: Point, b: Point, c: Point) -> Result<f32, Error> {
    angle_between(a - b, c - b, b)
}

/// Unsigned angle in degrees between the segment `p -> q` and the upward vertical.
///
/// 0 means `q` sits straight above `p`, 180 straight below.
pub fn angle_with_vertical(p: Point, q: Point) -> Result<f32, Error> {
    angle_between(q - p, UP, p)
}

/// Signed angle in degrees between the segment `p -> q` and the horizontal.
///
/// Positive when `q` is above `p` on screen, negative when below, in [-90, 90].
/// Whether `q` lies to the left or to the right of `p` does not matter.
pub fn angle_with_horizontal(p: Point, q: Point) -> Result<f32, Error> {
    let delta = q - p;
    if delta.norm() == 0.0 || !delta.x.is_finite() || !delta.y.is_finite() {
        return Err(Error::DegenerateSegment(p));
    }
    Ok((-delta.y).atan2(delta.x.abs()).to_degrees())
}
