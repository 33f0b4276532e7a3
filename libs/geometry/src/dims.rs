//! A horizontal and vertical rectangular dimension with no specified location.

use serde::{Deserialize, Serialize};

use crate::dir::Dir;

/// A width and height in grid units.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize,
)]
pub struct Dims {
    /// The width dimension.
    w: i64,
    /// The height dimension.
    h: i64,
}

impl Dims {
    /// Creates a new [`Dims`] from a width and height.
    pub const fn new(w: i64, h: i64) -> Self {
        Self { w, h }
    }

    /// Creates a new [`Dims`] with width and height equal to `value`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Dims::square(100), Dims::new(100, 100));
    /// ```
    pub const fn square(value: i64) -> Self {
        Self { w: value, h: value }
    }

    /// Returns the dimension in the specified direction.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let dims = Dims::new(100, 200);
    /// assert_eq!(dims.dim(Dir::Vert), 200);
    /// assert_eq!(dims.dim(Dir::Horiz), 100);
    /// ```
    pub const fn dim(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Vert => self.h,
            Dir::Horiz => self.w,
        }
    }

    /// The width.
    #[inline]
    pub const fn w(&self) -> i64 {
        self.w
    }

    /// The height.
    #[inline]
    pub const fn h(&self) -> i64 {
        self.h
    }

    /// Returns a new [`Dims`] with the width and height swapped.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Dims::new(100, 200).transpose(), Dims::new(200, 100));
    /// ```
    pub const fn transpose(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }
}

impl std::ops::Add<Dims> for Dims {
    type Output = Self;
    fn add(self, rhs: Dims) -> Self::Output {
        Self::new(self.w + rhs.w, self.h + rhs.h)
    }
}

impl std::ops::Sub<Dims> for Dims {
    type Output = Self;
    fn sub(self, rhs: Dims) -> Self::Output {
        Self::new(self.w - rhs.w, self.h - rhs.h)
    }
}

impl From<(i64, i64)> for Dims {
    fn from(value: (i64, i64)) -> Self {
        Self::new(value.0, value.1)
    }
}
