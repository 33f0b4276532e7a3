//! Reconciling on-disk sizes with the internal size model.
//!
//! Older library files stored node sizes including an invisible surround and
//! arc widths including a legacy offset. A [`SizeCorrector`] captures, once per
//! file and technology, the correction for every template so that reading and
//! writing all go through one table.

use arcstr::ArcStr;
use geometry::prelude::*;
use geometry::units::UnitError;
use serde::{Deserialize, Serialize};

use crate::arc::ArcId;
use crate::error::{EntryKind, Error, Result};
use crate::node::NodeId;
use crate::tech::Technology;

/// The invisible surround of a node, in grid units.
///
/// The drawn geometry of a node lies inside its nominal box, inset by these
/// amounts on each side.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeOffset {
    /// Inset on the low x side.
    pub lx: i64,
    /// Inset on the high x side.
    pub hx: i64,
    /// Inset on the low y side.
    pub ly: i64,
    /// Inset on the high y side.
    pub hy: i64,
}

impl SizeOffset {
    /// Creates an offset from grid values.
    pub const fn new(lx: i64, hx: i64, ly: i64, hy: i64) -> Self {
        Self { lx, hx, ly, hy }
    }

    /// Creates an offset from lambda values, rejecting negative insets.
    pub fn from_lambda(lx: f64, hx: f64, ly: f64, hy: f64) -> Result<Self, UnitError> {
        Ok(Self::new(
            lambda_to_grid_size(lx)?,
            lambda_to_grid_size(hx)?,
            lambda_to_grid_size(ly)?,
            lambda_to_grid_size(hy)?,
        ))
    }

    /// The total surround along each axis.
    #[inline]
    pub fn surround(&self) -> Dims {
        Dims::new(self.lx + self.hx, self.ly + self.hy)
    }

    /// Returns `true` if the offset is zero on every side.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// A version of the on-disk size encoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileVersion {
    /// Sizes include each node's invisible surround; arc widths include the
    /// full envelope of every arc layer.
    V0,
    /// Node sizes include the invisible surround; arc widths include the
    /// legacy width offset.
    V1,
    /// Sizes are true geometric sizes.
    V2,
}

impl FileVersion {
    /// The first release that writes [`FileVersion::V2`] text libraries.
    pub const TRUE_SIZE_RELEASE: (u32, u32, u32) = (9, 0, 0);

    /// Selects the encoding for a file written by the given release.
    ///
    /// Binary libraries always use [`FileVersion::V0`].
    ///
    /// # Example
    ///
    /// ```
    /// # use technology::size::FileVersion;
    /// assert_eq!(FileVersion::from_release((8, 11, 3), false), FileVersion::V0);
    /// assert_eq!(FileVersion::from_release((8, 11, 3), true), FileVersion::V1);
    /// assert_eq!(FileVersion::from_release((9, 0, 1), true), FileVersion::V2);
    /// ```
    pub fn from_release(release: (u32, u32, u32), text: bool) -> Self {
        if !text {
            Self::V0
        } else if release < Self::TRUE_SIZE_RELEASE {
            Self::V1
        } else {
            Self::V2
        }
    }
}

/// Per-template corrections between on-disk and internal sizes.
#[derive(Debug, Clone)]
pub struct SizeCorrector {
    tech: ArcStr,
    version: FileVersion,
    /// Half-width correction per arc template, in grid units.
    arcs: Vec<i64>,
    /// Total size correction per node template, in grid units.
    nodes: Vec<Dims>,
}

impl SizeCorrector {
    /// Builds the correction table for `tech` at the given file version.
    pub fn new(tech: &Technology, version: FileVersion) -> Self {
        let arcs = tech
            .arcs()
            .iter()
            .map(|arc| match version {
                FileVersion::V0 => arc.max_layer_extend(),
                FileVersion::V1 => arc.base_extend() + arc.legacy_width_offset() / 2,
                FileVersion::V2 => arc.base_extend(),
            })
            .collect();
        let nodes = tech
            .nodes()
            .iter()
            .map(|node| match version {
                FileVersion::V0 | FileVersion::V1 => node.size_offset().surround(),
                FileVersion::V2 => Dims::default(),
            })
            .collect();
        Self {
            tech: tech.name().clone(),
            version,
            arcs,
            nodes,
        }
    }

    /// The file version this table was built for.
    #[inline]
    pub fn version(&self) -> FileVersion {
        self.version
    }

    /// The half-width correction of an arc template, in grid units.
    pub fn arc_correction(&self, arc: ArcId) -> Result<i64> {
        self.arcs.get(arc.0).copied().ok_or_else(|| Error::NotFound {
            tech: self.tech.clone(),
            kind: EntryKind::Arc,
            name: arcstr::format!("#{}", arc.0),
        })
    }

    /// The total size correction of a node template, in grid units.
    pub fn node_correction(&self, node: NodeId) -> Result<Dims> {
        self.nodes.get(node.0).copied().ok_or_else(|| Error::NotFound {
            tech: self.tech.clone(),
            kind: EntryKind::Node,
            name: arcstr::format!("#{}", node.0),
        })
    }

    /// Converts an on-disk arc width, in lambda, to an extension over minimum in grid units.
    pub fn extend_from_disk(&self, arc: ArcId, width: f64) -> Result<i64> {
        let half = lambda_to_grid(0.5 * width)?;
        let extend = half - self.arc_correction(arc)?;
        if extend < 0 {
            return Err(UnitError::Negative(width).into());
        }
        Ok(extend)
    }

    /// The on-disk half width, in grid units, of an arc with the given extension over minimum.
    pub fn extend_to_disk(&self, arc: ArcId, extend_over_min: i64) -> Result<i64> {
        Ok(extend_over_min + self.arc_correction(arc)?)
    }

    /// The on-disk width, in lambda, of an arc with the given extension over minimum.
    pub fn width_to_disk(&self, arc: ArcId, extend_over_min: i64) -> Result<f64> {
        Ok(grid_to_lambda(2 * self.extend_to_disk(arc, extend_over_min)?))
    }

    /// Converts an on-disk node size, in lambda, to an internal size in grid units.
    pub fn size_from_disk(&self, node: NodeId, width: f64, height: f64) -> Result<Dims> {
        let corr = self.node_correction(node)?;
        let w = lambda_to_grid(width)? - corr.w();
        let h = lambda_to_grid(height)? - corr.h();
        if w < 0 {
            return Err(UnitError::Negative(width).into());
        }
        if h < 0 {
            return Err(UnitError::Negative(height).into());
        }
        Ok(Dims::new(w, h))
    }

    /// Converts an internal node size to an on-disk size in lambda.
    pub fn size_to_disk(&self, node: NodeId, size: Dims) -> Result<(f64, f64)> {
        let corr = self.node_correction(node)?;
        Ok((
            grid_to_lambda(size.w() + corr.w()),
            grid_to_lambda(size.h() + corr.h()),
        ))
    }
}
