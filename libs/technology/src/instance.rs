//! Placed node and arc instances.
//!
//! Instances carry only what the shape builder needs: template, position,
//! size, orientation and per-instance overrides. Polygons are always derived.

use derive_builder::Builder;
use geometry::prelude::*;
use serde::{Deserialize, Serialize};

use crate::arc::{ArcId, ArcTemplate};
use crate::node::{NodeId, NodeTemplate};

/// How the cuts of a multi-cut contact are positioned within their area.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CutAlignment {
    /// Symmetric about the area center.
    #[default]
    Centered,
    /// Pushed outward to the area edges; a middle cut stays put.
    Spread,
    /// Packed toward the low corner of the area.
    Corner,
}

/// Per-instance values that override template defaults.
#[derive(Debug, Default, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default)]
pub struct NodeOverrides {
    /// Replaces both cut separations of every multi-cut layer, in grid units.
    #[builder(setter(strip_option))]
    pub cut_spacing: Option<i64>,
    /// Cut alignment.
    pub cut_alignment: CutAlignment,
    /// Serpentine gate length, in grid units.
    #[builder(setter(strip_option))]
    pub serpentine_length: Option<i64>,
    /// Number of nanotubes.
    #[builder(setter(strip_option))]
    pub tube_count: Option<u32>,
    /// Gap between nanotubes, in grid units.
    #[builder(setter(strip_option))]
    pub tube_pitch: Option<i64>,
}

impl NodeOverrides {
    /// Returns a new [`NodeOverridesBuilder`].
    #[inline]
    pub fn builder() -> NodeOverridesBuilder {
        NodeOverridesBuilder::default()
    }
}

/// A point of an outline trace, relative to the node center.
///
/// `None` separates disjoint pieces of the trace.
pub type TracePoint = Option<Point>;

/// A placed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInst {
    /// The node template.
    pub template: NodeId,
    /// The center, in grid units.
    pub center: Point,
    /// The nominal size, in grid units.
    pub size: Dims,
    /// Rotation and mirroring about the center.
    pub orientation: Orientation,
    /// An outline trace, relative to the center.
    pub trace: Option<Vec<TracePoint>>,
    /// Template overrides.
    pub overrides: NodeOverrides,
}

impl NodeInst {
    /// Places a template at its default size.
    pub fn new(template: &NodeTemplate, center: Point) -> Self {
        Self::with_size(template.id(), center, template.default_size())
    }

    /// Places a template with an explicit size.
    pub fn with_size(template: NodeId, center: Point, size: Dims) -> Self {
        Self {
            template,
            center,
            size,
            orientation: Orientation::default(),
            trace: None,
            overrides: NodeOverrides::default(),
        }
    }

    /// Sets the orientation.
    pub fn oriented(mut self, orientation: impl Into<Orientation>) -> Self {
        self.orientation = orientation.into();
        self
    }

    /// Sets the outline trace.
    pub fn traced(mut self, trace: impl IntoIterator<Item = TracePoint>) -> Self {
        self.trace = Some(trace.into_iter().collect());
        self
    }

    /// Sets an unbroken outline trace.
    pub fn traced_points(self, points: impl IntoIterator<Item = Point>) -> Self {
        self.traced(points.into_iter().map(Some))
    }

    /// Sets the template overrides.
    pub fn with_overrides(mut self, overrides: NodeOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Which direction arrows an arc shows.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Arrows {
    /// A line along the arc body.
    pub body: bool,
    /// A chevron at the head.
    pub head: bool,
    /// A chevron at the tail.
    pub tail: bool,
}

impl Arrows {
    /// Returns `true` if any arrow is drawn.
    pub fn any(&self) -> bool {
        self.body || self.head || self.tail
    }
}

/// A placed arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcInst {
    /// The arc template.
    pub template: ArcId,
    /// The head end, in grid units.
    pub head: Point,
    /// The tail end, in grid units.
    pub tail: Point,
    /// Extension of every layer beyond its minimum half-width, in grid units.
    pub extend_over_min: i64,
    /// Whether the head end is lengthened by half the width.
    pub head_extended: bool,
    /// Whether the tail end is lengthened by half the width.
    pub tail_extended: bool,
    /// Whether the head end is negated.
    pub head_negated: bool,
    /// Whether the tail end is negated.
    pub tail_negated: bool,
    /// Direction arrows.
    pub arrows: Arrows,
    /// The angle used when head and tail coincide, in degrees.
    pub stored_angle: f64,
}

impl ArcInst {
    /// Creates an arc between two points with the template's defaults.
    pub fn new(template: &ArcTemplate, head: Point, tail: Point) -> Self {
        let directional = template.is_directional();
        Self {
            template: template.id(),
            head,
            tail,
            extend_over_min: template.default_extend_over_min(),
            head_extended: template.is_extended(),
            tail_extended: template.is_extended(),
            head_negated: false,
            tail_negated: false,
            arrows: Arrows {
                body: directional,
                head: directional,
                tail: false,
            },
            stored_angle: 0.,
        }
    }

    /// Sets the extension over minimum.
    pub fn extend_over_min(mut self, extend: i64) -> Self {
        self.extend_over_min = extend;
        self
    }

    /// Sets the end extension flags.
    pub fn extended(mut self, head: bool, tail: bool) -> Self {
        self.head_extended = head;
        self.tail_extended = tail;
        self
    }

    /// Sets the end negation flags.
    pub fn negated(mut self, head: bool, tail: bool) -> Self {
        self.head_negated = head;
        self.tail_negated = tail;
        self
    }

    /// Sets the direction arrows.
    pub fn arrows(mut self, arrows: Arrows) -> Self {
        self.arrows = arrows;
        self
    }

    /// The arc's angle in degrees, pointing from head toward tail.
    ///
    /// Zero-length arcs fall back to their stored angle.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// # use technology::instance::*;
    /// # use technology::arc::ArcId;
    /// # let template = ArcId::default();
    /// let arc = ArcInst {
    ///     template,
    ///     head: Point::new(0, 0),
    ///     tail: Point::new(0, -800),
    ///     extend_over_min: 0,
    ///     head_extended: true,
    ///     tail_extended: true,
    ///     head_negated: false,
    ///     tail_negated: false,
    ///     arrows: Arrows::default(),
    ///     stored_angle: 0.,
    /// };
    /// assert_eq!(arc.angle(), 270.);
    /// ```
    pub fn angle(&self) -> f64 {
        self.head
            .to_fpoint()
            .angle_to(self.tail.to_fpoint())
            .unwrap_or_else(|| geometry::wrap_angle(self.stored_angle))
    }

    /// The distance from head to tail, in grid units.
    pub fn length(&self) -> f64 {
        self.head.to_fpoint().distance(self.tail.to_fpoint())
    }
}
