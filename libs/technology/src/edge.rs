//! Edge expressions: coordinates relative to a node's size.
//!
//! An [`EdgeExpr`] maps a node's nominal size along one axis to a coordinate
//! relative to the node center: `size * multiplier + adder`. A [`TechPoint`]
//! pairs one expression per axis.

use geometry::prelude::*;
use serde::{Deserialize, Serialize};

/// An affine function of a node's size along one axis.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeExpr {
    /// Fraction of the node size; `-0.5` is the low edge, `0.5` the high edge.
    pub multiplier: f64,
    /// Constant offset in grid units.
    pub adder: i64,
}

impl EdgeExpr {
    /// Creates an expression from a multiplier and a grid adder.
    pub const fn new(multiplier: f64, adder: i64) -> Self {
        Self { multiplier, adder }
    }

    /// Creates an expression from a multiplier and an adder in lambda.
    pub fn from_lambda(multiplier: f64, adder: f64) -> Result<Self, geometry::units::UnitError> {
        Ok(Self::new(multiplier, lambda_to_grid(adder)?))
    }

    /// The low edge (left or bottom), moved inward by `inset` grid units.
    pub const fn low(inset: i64) -> Self {
        Self::new(-0.5, inset)
    }

    /// The high edge (right or top), moved inward by `inset` grid units.
    pub const fn high(inset: i64) -> Self {
        Self::new(0.5, -inset)
    }

    /// The node center, offset by `adder` grid units.
    pub const fn center(adder: i64) -> Self {
        Self::new(0., adder)
    }

    /// Evaluates the expression against a nominal size, in grid units.
    ///
    /// # Example
    ///
    /// ```
    /// # use technology::edge::EdgeExpr;
    /// assert_eq!(EdgeExpr::low(100).eval(1000), -400.);
    /// assert_eq!(EdgeExpr::high(100).eval(1000), 400.);
    /// assert_eq!(EdgeExpr::high(0).eval(3), 1.5);
    /// ```
    #[inline]
    pub fn eval(&self, size: i64) -> f64 {
        size as f64 * self.multiplier + self.adder as f64
    }
}

/// A point whose coordinates are edge expressions.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechPoint {
    /// The x expression, evaluated against the node width.
    pub x: EdgeExpr,
    /// The y expression, evaluated against the node height.
    pub y: EdgeExpr,
}

impl TechPoint {
    /// Creates a point from two edge expressions.
    pub const fn new(x: EdgeExpr, y: EdgeExpr) -> Self {
        Self { x, y }
    }

    /// The node center.
    pub const fn center() -> Self {
        Self::new(EdgeExpr::center(0), EdgeExpr::center(0))
    }

    /// The two corners of the box inset by `inset` grid units on every side.
    pub const fn indented(inset: i64) -> [Self; 2] {
        Self::indented_xy(inset, inset)
    }

    /// The two corners of the box inset by `dx` horizontally and `dy` vertically.
    pub const fn indented_xy(dx: i64, dy: i64) -> [Self; 2] {
        [
            Self::new(EdgeExpr::low(dx), EdgeExpr::low(dy)),
            Self::new(EdgeExpr::high(dx), EdgeExpr::high(dy)),
        ]
    }

    /// The two corners of the full node box.
    pub const fn full_box() -> [Self; 2] {
        Self::indented(0)
    }

    /// Evaluates this point against a node size, relative to the node center.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// # use technology::edge::TechPoint;
    /// let [lo, hi] = TechPoint::indented(400);
    /// let size = Dims::new(2000, 1200);
    /// assert_eq!(lo.eval(size), FPoint::new(-600., -200.));
    /// assert_eq!(hi.eval(size), FPoint::new(600., 200.));
    /// ```
    #[inline]
    pub fn eval(&self, size: Dims) -> FPoint {
        FPoint::new(self.x.eval(size.w()), self.y.eval(size.h()))
    }
}

/// Evaluates the box spanned by two tech points against a node size.
///
/// The result is normalized, so a node smaller than the box insets yields
/// a zero or inverted extent folded into a valid rectangle rather than an error.
pub fn eval_box(lo: &TechPoint, hi: &TechPoint, size: Dims) -> Rect {
    Rect::new(lo.eval(size), hi.eval(size))
}
