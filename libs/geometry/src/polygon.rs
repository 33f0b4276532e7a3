//! Polygons with fractional vertex coordinates.

use serde::{Deserialize, Serialize};

use crate::point::FPoint;
use crate::rect::Rect;
use crate::transform::Transformation;

/// An ordered list of vertices.
///
/// Whether the outline is closed (filled, outlined) or open (a path)
/// is decided by whoever attaches a drawing style to the polygon.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    /// Vector of points that make up the polygon.
    points: Vec<FPoint>,
}

impl Polygon {
    /// Creates a polygon with given vertices.
    pub fn from_verts(points: Vec<FPoint>) -> Self {
        Self { points }
    }

    /// Creates the 4-vertex polygon of a rectangle, counter-clockwise from the lower-left.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            points: rect.corners().to_vec(),
        }
    }

    /// Returns the vertices of the polygon.
    pub fn points(&self) -> &[FPoint] {
        &self.points
    }

    /// Consumes the polygon, returning its vertices.
    pub fn into_points(self) -> Vec<FPoint> {
        self.points
    }

    /// The number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The bounding box of the vertices, or `None` for an empty polygon.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let poly = Polygon::from_verts(vec![
    ///     FPoint::new(0., 0.),
    ///     FPoint::new(1., 2.),
    ///     FPoint::new(-4., 5.),
    /// ]);
    /// assert_eq!(poly.bbox(), Some(Rect::from_sides(-4., 0., 1., 5.)));
    /// ```
    pub fn bbox(&self) -> Option<Rect> {
        Rect::bounding(self.points.iter().copied())
    }

    /// The enclosed area, computed with the shoelace formula.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let poly = Polygon::from_rect(Rect::from_sides(0., 0., 3., 2.));
    /// assert_eq!(poly.area(), 6.);
    /// ```
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.
    }

    /// Returns the rectangle this polygon describes, if it is an axis-aligned box.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0., 0., 3., 2.);
    /// assert_eq!(Polygon::from_rect(rect).as_rect(), Some(rect));
    /// let tri = Polygon::from_verts(vec![FPoint::new(0., 0.), FPoint::new(1., 0.), FPoint::new(0., 1.)]);
    /// assert_eq!(tri.as_rect(), None);
    /// ```
    pub fn as_rect(&self) -> Option<Rect> {
        if self.points.len() != 4 {
            return None;
        }
        let p = &self.points;
        let horiz_first = p[0].y == p[1].y && p[1].x == p[2].x && p[2].y == p[3].y && p[3].x == p[0].x;
        let vert_first = p[0].x == p[1].x && p[1].y == p[2].y && p[2].x == p[3].x && p[3].y == p[0].y;
        if horiz_first || vert_first {
            self.bbox()
        } else {
            None
        }
    }

    /// Applies `trans` to every vertex.
    pub fn transform(&mut self, trans: &Transformation) {
        for p in self.points.iter_mut() {
            *p = trans.apply(*p);
        }
    }

    /// Applies `f` to every vertex.
    pub fn map_points(&mut self, f: impl Fn(FPoint) -> FPoint) {
        for p in self.points.iter_mut() {
            *p = f(*p);
        }
    }
}

impl From<Rect> for Polygon {
    #[inline]
    fn from(value: Rect) -> Self {
        Self::from_rect(value)
    }
}
