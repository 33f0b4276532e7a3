//! Conversion between lambda and grid units.
//!
//! One lambda is [`GRID_PER_LAMBDA`] grid units. Every value produced by this
//! crate is a multiple of `1 / GRID_PER_LAMBDA` lambda, and for such values
//! `grid_to_lambda(lambda_to_grid(x)?) == x` holds exactly.

use thiserror::Error;

/// The number of grid units in one lambda.
pub const GRID_PER_LAMBDA: i64 = 400;

/// The largest magnitude, in grid units, accepted by [`lambda_to_grid`].
///
/// Kept well below `i64::MAX` so that sums and products of a few grid values
/// cannot overflow, and below 2^53 so that every accepted value is exact in
/// an `f64`.
pub const MAX_GRID: i64 = 1 << 50;

/// An error converting a lambda value to grid units.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum UnitError {
    /// The value was NaN or infinite.
    #[error("value {0} is not finite")]
    NotFinite(f64),
    /// The value converts to more grid units than [`MAX_GRID`].
    #[error("value {0} lambda overflows the grid range")]
    Overflow(f64),
    /// A size or extension value was negative.
    #[error("value {0} lambda must not be negative")]
    Negative(f64),
}

/// Converts a lambda value to the nearest grid value.
///
/// # Examples
///
/// ```
/// use geometry::units::*;
///
/// assert_eq!(lambda_to_grid(1.5), Ok(600));
/// assert_eq!(lambda_to_grid(-0.0025), Ok(-1));
/// assert!(lambda_to_grid(f64::NAN).is_err());
/// ```
pub fn lambda_to_grid(lambda: f64) -> Result<i64, UnitError> {
    if !lambda.is_finite() {
        return Err(UnitError::NotFinite(lambda));
    }
    let grid = (lambda * GRID_PER_LAMBDA as f64).round();
    if grid.abs() > MAX_GRID as f64 {
        return Err(UnitError::Overflow(lambda));
    }
    Ok(grid as i64)
}

/// Converts a lambda size, width or extension to grid units, rejecting
/// negative values.
///
/// # Examples
///
/// ```
/// use geometry::units::*;
///
/// assert_eq!(lambda_to_grid_size(3.), Ok(1200));
/// assert_eq!(lambda_to_grid_size(-1.), Err(UnitError::Negative(-1.)));
/// ```
pub fn lambda_to_grid_size(lambda: f64) -> Result<i64, UnitError> {
    let grid = lambda_to_grid(lambda)?;
    if grid < 0 {
        return Err(UnitError::Negative(lambda));
    }
    Ok(grid)
}

/// Converts a grid value to lambda.
#[inline]
pub fn grid_to_lambda(grid: i64) -> f64 {
    grid as f64 / GRID_PER_LAMBDA as f64
}

/// Converts a fractional grid coordinate to lambda.
///
/// Shape vertices may land between grid points (half-grid cut centers,
/// non-Manhattan arc corners), so final polygon coordinates go through
/// this function rather than [`grid_to_lambda`].
#[inline]
pub fn grid_f64_to_lambda(grid: f64) -> f64 {
    grid / GRID_PER_LAMBDA as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lambda_grid_round_trip() {
        for k in -4_000i64..=4_000 {
            let x = k as f64 / GRID_PER_LAMBDA as f64;
            let grid = lambda_to_grid(x).unwrap();
            assert_eq!(grid, k);
            assert_eq!(grid_to_lambda(grid), x);
        }
        for k in [MAX_GRID, -MAX_GRID, 123_456_789_012, 7] {
            let x = grid_to_lambda(k);
            assert_eq!(grid_to_lambda(lambda_to_grid(x).unwrap()), x);
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            lambda_to_grid(f64::INFINITY),
            Err(UnitError::NotFinite(f64::INFINITY))
        );
        assert_eq!(lambda_to_grid(1e300), Err(UnitError::Overflow(1e300)));
        assert_eq!(lambda_to_grid_size(-0.5), Err(UnitError::Negative(-0.5)));
        assert_eq!(lambda_to_grid_size(0.), Ok(0));
    }
}
