//! Affine transformations of fractional points.

use serde::{Deserialize, Serialize};

use crate::orientation::Orientation;
use crate::point::FPoint;

/// A rotation and/or reflection followed by a translation.
///
/// This object does not support scaling; the matrix is always orthonormal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    /// The transformation matrix, row-major.
    a: [[f64; 2]; 2],
    /// The x-y translation applied after the matrix.
    b: [f64; 2],
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    /// Returns the identity transform, leaving any transformed point unmodified.
    pub fn identity() -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [0., 0.],
        }
    }

    /// Returns a translation by `offset`.
    pub fn translate(offset: FPoint) -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [offset.x, offset.y],
        }
    }

    /// Returns the transformation that reflects (if requested) and then rotates.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let t = Transformation::from_orientation(NamedOrientation::R90.into());
    /// assert_eq!(t.apply(FPoint::new(2., 0.)), FPoint::new(0., 2.));
    /// ```
    pub fn from_orientation(o: Orientation) -> Self {
        let (cos, sin) = crate::cos_sin(o.angle());
        let r = if o.reflect_vert() { -1. } else { 1. };
        Self {
            a: [[cos, -sin * r], [sin, cos * r]],
            b: [0., 0.],
        }
    }

    /// Returns the transformation that orients about the origin and then moves
    /// the origin to `offset`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let t = Transformation::from_offset_and_orientation(
    ///     FPoint::new(10., 10.),
    ///     NamedOrientation::R180.into(),
    /// );
    /// assert_eq!(t.apply(FPoint::new(1., 2.)), FPoint::new(9., 8.));
    /// ```
    pub fn from_offset_and_orientation(offset: FPoint, o: Orientation) -> Self {
        let mut t = Self::from_orientation(o);
        t.b = [offset.x, offset.y];
        t
    }

    /// Creates a new [`Transformation`] that applies `child` first and then `parent`.
    ///
    /// Note this operation *is not* commutative.
    pub fn cascade(parent: Transformation, child: Transformation) -> Transformation {
        let p = parent.a;
        let c = child.a;
        let a = [
            [
                p[0][0] * c[0][0] + p[0][1] * c[1][0],
                p[0][0] * c[0][1] + p[0][1] * c[1][1],
            ],
            [
                p[1][0] * c[0][0] + p[1][1] * c[1][0],
                p[1][0] * c[0][1] + p[1][1] * c[1][1],
            ],
        ];
        let b = parent.apply(FPoint::new(child.b[0], child.b[1]));
        Self { a, b: [b.x, b.y] }
    }

    /// Applies this transformation to a point.
    #[inline]
    pub fn apply(&self, p: FPoint) -> FPoint {
        FPoint::new(
            self.a[0][0] * p.x + self.a[0][1] * p.y + self.b[0],
            self.a[1][0] * p.x + self.a[1][1] * p.y + self.b[1],
        )
    }

    /// Returns `true` if this is the identity transformation.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// The translation applied by this transformation.
    pub fn offset(&self) -> FPoint {
        FPoint::new(self.b[0], self.b[1])
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::orientation::NamedOrientation;

    #[test]
    fn cascade_matches_sequential_application() {
        let parent = Transformation::from_offset_and_orientation(
            FPoint::new(5., -3.),
            NamedOrientation::FlipYx.into(),
        );
        let child = Transformation::from_offset_and_orientation(
            FPoint::new(1., 2.),
            NamedOrientation::R90.into(),
        );
        let p = FPoint::new(4., 9.);
        assert_eq!(
            Transformation::cascade(parent, child).apply(p),
            parent.apply(child.apply(p))
        );
    }

    #[test]
    fn non_manhattan_rotation() {
        let t = Transformation::from_orientation(Orientation::from_reflect_and_angle(false, 45.));
        let p = t.apply(FPoint::new(1., 0.));
        assert_relative_eq!(p.x, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(p.y, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    }
}
