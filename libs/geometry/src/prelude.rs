//! An import prelude that re-exports commonly used items.

pub use crate::dims::Dims;
pub use crate::dir::Dir;
pub use crate::orientation::{NamedOrientation, Orientation};
pub use crate::point::{FPoint, Point};
pub use crate::polygon::Polygon;
pub use crate::rect::Rect;
pub use crate::transform::Transformation;
pub use crate::units::{grid_to_lambda, lambda_to_grid, lambda_to_grid_size, GRID_PER_LAMBDA};
