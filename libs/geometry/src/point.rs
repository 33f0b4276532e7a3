//! 2-D points.

use serde::{Deserialize, Serialize};

use crate::dir::Dir;
use crate::transform::Transformation;
use crate::units::grid_to_lambda;

/// A point on the integer grid.
#[derive(
    Debug, Copy, Clone, Default, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Point {
    /// The x-coordinate of the point.
    pub x: i64,
    /// The y-coordinate of the point.
    pub y: i64,
}

impl Point {
    /// Creates a new [`Point`] from (x,y) coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Returns the origin, `(0, 0)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let origin = Point::zero();
    /// assert_eq!(origin, Point::new(0, 0));
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Gets the coordinate associated with direction `dir`.
    pub const fn coord(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.x,
            Dir::Vert => self.y,
        }
    }

    /// Converts this grid point into a fractional point with the same coordinates.
    #[inline]
    pub fn to_fpoint(self) -> FPoint {
        FPoint::new(self.x as f64, self.y as f64)
    }

    /// Returns the x and y coordinates in lambda units.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Point::new(400, -200).to_lambda(), (1., -0.5));
    /// ```
    pub fn to_lambda(self) -> (f64, f64) {
        (grid_to_lambda(self.x), grid_to_lambda(self.y))
    }
}

impl std::ops::Add<Point> for Point {
    type Output = Self;
    fn add(self, rhs: Point) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign<Point> for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub<Point> for Point {
    type Output = Self;
    fn sub(self, rhs: Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Neg for Point {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl From<(i64, i64)> for Point {
    fn from(value: (i64, i64)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

/// A point with fractional coordinates.
///
/// Used for shape vertices that may fall between grid points, such as
/// half-grid cut centers or the corners of non-Manhattan arcs.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct FPoint {
    /// The x-coordinate of the point.
    pub x: f64,
    /// The y-coordinate of the point.
    pub y: f64,
}

impl FPoint {
    /// Creates a new [`FPoint`] from (x,y) coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the origin, `(0, 0)`.
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0., y: 0. }
    }

    /// Gets the coordinate associated with direction `dir`.
    pub const fn coord(&self, dir: Dir) -> f64 {
        match dir {
            Dir::Horiz => self.x,
            Dir::Vert => self.y,
        }
    }

    /// Returns the point at distance `dist` from `self` along `angle` degrees.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let p = FPoint::new(1., 1.).offset_polar(90., 2.);
    /// assert_eq!(p, FPoint::new(1., 3.));
    /// ```
    pub fn offset_polar(self, angle: f64, dist: f64) -> Self {
        let (cos, sin) = crate::cos_sin(angle);
        Self::new(self.x + cos * dist, self.y + sin * dist)
    }

    /// The Euclidean distance between two points.
    pub fn distance(self, other: FPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// The angle, in degrees within `[0, 360)`, of the vector from `self` to `to`.
    ///
    /// Returns `None` if the two points coincide.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let a = FPoint::new(0., 0.);
    /// assert_eq!(a.angle_to(FPoint::new(0., 5.)), Some(90.));
    /// assert_eq!(a.angle_to(FPoint::new(-5., 0.)), Some(180.));
    /// assert_eq!(a.angle_to(a), None);
    /// ```
    pub fn angle_to(self, to: FPoint) -> Option<f64> {
        let dx = to.x - self.x;
        let dy = to.y - self.y;
        if dx == 0. && dy == 0. {
            return None;
        }
        if dy == 0. {
            return Some(if dx > 0. { 0. } else { 180. });
        }
        if dx == 0. {
            return Some(if dy > 0. { 90. } else { 270. });
        }
        Some(crate::wrap_angle(dy.atan2(dx).to_degrees()))
    }

    /// Applies the transformation `trans` to this point.
    #[inline]
    pub fn transform(self, trans: &Transformation) -> Self {
        trans.apply(self)
    }
}

impl std::ops::Add<FPoint> for FPoint {
    type Output = Self;
    fn add(self, rhs: FPoint) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub<FPoint> for FPoint {
    type Output = Self;
    fn sub(self, rhs: FPoint) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for FPoint {
    type Output = Self;

    /// Scales both coordinates by `rhs`.
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<Point> for FPoint {
    #[inline]
    fn from(value: Point) -> Self {
        value.to_fpoint()
    }
}

impl From<(f64, f64)> for FPoint {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}
