//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::dir::Dir;
use crate::point::FPoint;

/// An axis-aligned rectangle with fractional grid coordinates,
/// specified by lower-left and upper-right corners.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Rect {
    /// The lower-left corner.
    p0: FPoint,
    /// The upper-right corner.
    p1: FPoint,
}

impl Rect {
    /// Creates a rectangle from two opposite corners, in any order.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::new(FPoint::new(10., 0.), FPoint::new(0., 20.));
    /// assert_eq!(rect.left(), 0.);
    /// assert_eq!(rect.top(), 20.);
    /// ```
    pub fn new(a: FPoint, b: FPoint) -> Self {
        Self {
            p0: FPoint::new(a.x.min(b.x), a.y.min(b.y)),
            p1: FPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// Inverted sides are swapped rather than rejected, so a shrunken node
    /// still yields a (possibly zero-area) rectangle.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(15., 20., 30., 40.);
    /// assert_eq!(rect.width(), 15.);
    /// assert_eq!(rect.height(), 20.);
    /// ```
    pub fn from_sides(left: f64, bot: f64, right: f64, top: f64) -> Self {
        Self::new(FPoint::new(left, bot), FPoint::new(right, top))
    }

    /// Creates a rectangle centered at `center` with the given width and height.
    pub fn from_center(center: FPoint, width: f64, height: f64) -> Self {
        Self::from_sides(
            center.x - width / 2.,
            center.y - height / 2.,
            center.x + width / 2.,
            center.y + height / 2.,
        )
    }

    /// The smallest rectangle containing every point, or `None` if there are no points.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let pts = [FPoint::new(1., 5.), FPoint::new(-2., 3.), FPoint::new(4., -1.)];
    /// assert_eq!(Rect::bounding(pts), Some(Rect::from_sides(-2., -1., 4., 5.)));
    /// ```
    pub fn bounding(points: impl IntoIterator<Item = FPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Self::new(first, first);
        for p in iter {
            rect.p0.x = rect.p0.x.min(p.x);
            rect.p0.y = rect.p0.y.min(p.y);
            rect.p1.x = rect.p1.x.max(p.x);
            rect.p1.y = rect.p1.y.max(p.y);
        }
        Some(rect)
    }

    /// The lower-left corner.
    #[inline]
    pub fn lower_left(&self) -> FPoint {
        self.p0
    }

    /// The upper-right corner.
    #[inline]
    pub fn upper_right(&self) -> FPoint {
        self.p1
    }

    /// The left edge.
    #[inline]
    pub fn left(&self) -> f64 {
        self.p0.x
    }

    /// The bottom edge.
    #[inline]
    pub fn bot(&self) -> f64 {
        self.p0.y
    }

    /// The right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.p1.x
    }

    /// The top edge.
    #[inline]
    pub fn top(&self) -> f64 {
        self.p1.y
    }

    /// The horizontal extent.
    #[inline]
    pub fn width(&self) -> f64 {
        self.p1.x - self.p0.x
    }

    /// The vertical extent.
    #[inline]
    pub fn height(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    /// The extent in direction `dir`.
    pub fn length(&self, dir: Dir) -> f64 {
        match dir {
            Dir::Horiz => self.width(),
            Dir::Vert => self.height(),
        }
    }

    /// The center point.
    pub fn center(&self) -> FPoint {
        FPoint::new((self.p0.x + self.p1.x) / 2., (self.p0.y + self.p1.y) / 2.)
    }

    /// The four corners, counter-clockwise starting from the lower-left.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0., 0., 2., 1.);
    /// assert_eq!(
    ///     rect.corners(),
    ///     [
    ///         FPoint::new(0., 0.),
    ///         FPoint::new(2., 0.),
    ///         FPoint::new(2., 1.),
    ///         FPoint::new(0., 1.),
    ///     ]
    /// );
    /// ```
    pub fn corners(&self) -> [FPoint; 4] {
        [
            self.p0,
            FPoint::new(self.p1.x, self.p0.y),
            self.p1,
            FPoint::new(self.p0.x, self.p1.y),
        ]
    }

    /// Returns a rectangle grown by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self::from_sides(
            self.p0.x - amount,
            self.p0.y - amount,
            self.p1.x + amount,
            self.p1.y + amount,
        )
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Self {
        Self {
            p0: FPoint::new(self.p0.x.min(other.p0.x), self.p0.y.min(other.p0.y)),
            p1: FPoint::new(self.p1.x.max(other.p1.x), self.p1.y.max(other.p1.y)),
        }
    }
}
