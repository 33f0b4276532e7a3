//! Utilities and types for orienting placed instances.

use serde::{Deserialize, Serialize};

/// A named rectangular orientation.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum NamedOrientation {
    /// No rotations or reflections.
    #[default]
    R0,
    /// Reflect vertically (ie. about the x-axis).
    ReflectVert,
    /// Reflect horizontally (ie. about the y-axis).
    ReflectHoriz,
    /// Rotate 90 degrees counter-clockwise.
    R90,
    /// Rotate 180 degrees counter-clockwise.
    R180,
    /// Rotate 270 degrees counter-clockwise.
    R270,
    /// Flip across the line y = x.
    FlipYx,
    /// Flip across the line y = -x.
    FlipMinusYx,
}

/// An orientation of a placed instance.
///
/// Captures reflection and rotation, but not position or scaling.
/// Angles need not be Manhattan: nodes may be placed at any rotation.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Orientation {
    /// Reflect vertically.
    ///
    /// Applied before rotation.
    reflect_vert: bool,
    /// Counter-clockwise angle in degrees, within `[0, 360)`.
    ///
    /// Applied after reflecting vertically.
    angle: f64,
}

impl NamedOrientation {
    /// Returns all 8 named rectangular orientations.
    ///
    /// Users should not rely upon the order of the orientations returned.
    pub fn all() -> [Self; 8] {
        [
            Self::R0,
            Self::ReflectVert,
            Self::ReflectHoriz,
            Self::R90,
            Self::R180,
            Self::R270,
            Self::FlipYx,
            Self::FlipMinusYx,
        ]
    }
}

impl From<NamedOrientation> for Orientation {
    fn from(value: NamedOrientation) -> Self {
        use NamedOrientation::*;
        let (reflect_vert, angle) = match value {
            R0 => (false, 0.),
            R90 => (false, 90.),
            R180 => (false, 180.),
            R270 => (false, 270.),
            ReflectVert => (true, 0.),
            FlipYx => (true, 90.),
            ReflectHoriz => (true, 180.),
            FlipMinusYx => (true, 270.),
        };
        Self {
            reflect_vert,
            angle,
        }
    }
}

impl Orientation {
    /// Creates a new orientation with the given reflection and angle settings.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let o = Orientation::from_reflect_and_angle(false, -90.);
    /// assert_eq!(o.angle(), 270.);
    /// ```
    #[inline]
    pub fn from_reflect_and_angle(reflect_vert: bool, angle: f64) -> Self {
        Self {
            reflect_vert,
            angle: crate::wrap_angle(angle),
        }
    }

    /// Returns the identity orientation.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Applies the reflection and rotation of `o` after this orientation.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let o = Orientation::from(NamedOrientation::R90).apply(NamedOrientation::R180);
    /// assert_eq!(o, NamedOrientation::R270.into());
    /// ```
    pub fn apply(self, o: impl Into<Orientation>) -> Self {
        let o = o.into();
        let (reflect_vert, angle) = if o.reflect_vert {
            (!self.reflect_vert, o.angle - self.angle)
        } else {
            (self.reflect_vert, self.angle + o.angle)
        };
        Self::from_reflect_and_angle(reflect_vert, angle)
    }

    /// Returns whether the orientation is reflected vertically.
    #[inline]
    pub fn reflect_vert(&self) -> bool {
        self.reflect_vert
    }

    /// Returns the counter-clockwise angle of this orientation in degrees.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Returns `true` if this orientation leaves geometry unchanged.
    pub fn is_identity(&self) -> bool {
        !self.reflect_vert && self.angle == 0.
    }

    /// Returns `true` if this orientation maps axis-aligned rectangles
    /// to axis-aligned rectangles.
    pub fn is_manhattan(&self) -> bool {
        self.angle % 90. == 0.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::FPoint;
    use crate::transform::Transformation;

    #[test]
    fn named_orientations_map_unit_x_correctly() {
        let x = FPoint::new(1., 0.);
        let y = FPoint::new(0., 1.);
        let cases = [
            (NamedOrientation::R0, (1., 0.), (0., 1.)),
            (NamedOrientation::R90, (0., 1.), (-1., 0.)),
            (NamedOrientation::ReflectVert, (1., 0.), (0., -1.)),
            (NamedOrientation::ReflectHoriz, (-1., 0.), (0., 1.)),
            (NamedOrientation::FlipYx, (0., 1.), (1., 0.)),
        ];
        for (named, ex, ey) in cases {
            let t = Transformation::from_orientation(named.into());
            assert_eq!(t.apply(x), FPoint::from(ex), "{named:?}");
            assert_eq!(t.apply(y), FPoint::from(ey), "{named:?}");
        }
    }

    #[test]
    fn apply_composes_like_transformations() {
        let p = FPoint::new(3., 7.);
        for a in NamedOrientation::all() {
            for b in NamedOrientation::all() {
                let composed = Orientation::from(a).apply(b);
                let direct = Transformation::from_orientation(composed).apply(p);
                let stepwise = Transformation::from_orientation(b.into())
                    .apply(Transformation::from_orientation(a.into()).apply(p));
                assert_eq!(direct, stepwise, "{a:?} then {b:?}");
            }
        }
    }
}
