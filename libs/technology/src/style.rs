//! How a polygon's vertices are to be interpreted.

use serde::{Deserialize, Serialize};

/// The drawing style of a polygon.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Style {
    /// A closed, filled polygon.
    #[default]
    Filled,
    /// A closed outline.
    Closed,
    /// An open path through the vertices.
    Opened,
    /// A dotted open path.
    OpenedDotted,
    /// A dashed open path.
    OpenedDashed,
    /// A thick open path.
    OpenedThick,
    /// Independent line segments between vertex pairs.
    Vectors,
    /// A circle outline; the vertices are the center and a point on the circle.
    Circle,
    /// A filled circle; the vertices are the center and a point on the circle.
    Disc,
    /// A box outline with both diagonals drawn.
    Crossed,
}

impl Style {
    /// Returns `true` for styles that draw an open path.
    pub fn is_opened(&self) -> bool {
        matches!(
            self,
            Self::Opened | Self::OpenedDotted | Self::OpenedDashed | Self::OpenedThick
        )
    }

    /// Returns `true` for styles whose outline encloses an area.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Filled | Self::Closed | Self::Disc | Self::Crossed)
    }

    /// The style used for a zero-width rendition of this style.
    ///
    /// Filled styles collapse to an open path; other styles are unchanged.
    pub fn zero_width(&self) -> Self {
        match self {
            Self::Filled | Self::Closed | Self::Crossed => Self::Opened,
            other => *other,
        }
    }
}
