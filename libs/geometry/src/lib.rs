//! 2-D geometry for technology-driven shape generation.
//!
//! Coordinates come in two flavors. *Grid* units are integers and are used
//! for every exact computation (sizes, cut pitches, arc widths). *Lambda*
//! units are real-valued design units; conversion happens only at the
//! boundary, see [`units`].
//!
//! # Examples
//!
//! Create a [rectangle](crate::rect::Rect) and take its center:
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_sides(0., 0., 40., 20.);
//! assert_eq!(rect.center(), FPoint::new(20., 10.));
//! ```
#![warn(missing_docs)]

extern crate self as geometry;

pub mod dims;
pub mod dir;
pub mod orientation;
pub mod point;
pub mod polygon;
pub mod prelude;
pub mod rect;
pub mod transform;
pub mod units;

/// Wraps the given angle to the interval `[0, 360)` degrees.
///
/// # Examples
///
/// ```
/// use geometry::wrap_angle;
///
/// assert_eq!(wrap_angle(10.), 10.);
/// assert_eq!(wrap_angle(-10.), 350.);
/// assert_eq!(wrap_angle(-740.), 340.);
/// assert_eq!(wrap_angle(725.), 5.);
/// assert_eq!(wrap_angle(360.), 0.);
/// ```
pub fn wrap_angle(angle: f64) -> f64 {
    ((angle % 360.) + 360.) % 360.
}

/// Returns `(cos(angle), sin(angle))` for an angle given in degrees.
///
/// Multiples of 90 degrees produce exact results, so Manhattan geometry
/// never picks up floating-point noise from the trigonometric functions.
///
/// # Examples
///
/// ```
/// use geometry::cos_sin;
///
/// assert_eq!(cos_sin(90.), (0., 1.));
/// assert_eq!(cos_sin(-180.), (-1., 0.));
/// let (c, s) = cos_sin(30.);
/// assert!((c - 3f64.sqrt() / 2.).abs() < 1e-12);
/// assert!((s - 0.5).abs() < 1e-12);
/// ```
pub fn cos_sin(angle: f64) -> (f64, f64) {
    let angle = wrap_angle(angle);
    if angle == 0. {
        (1., 0.)
    } else if angle == 90. {
        (0., 1.)
    } else if angle == 180. {
        (-1., 0.)
    } else if angle == 270. {
        (0., -1.)
    } else {
        let rad = angle.to_radians();
        (rad.cos(), rad.sin())
    }
}
