//! Computing the polygons of placed nodes and arcs.
//!
//! A [`ShapeBuilder`] owns the scratch space used while building polygons.
//! Builders are cheap to create and are not shared: concurrent computations
//! each use their own builder against a shared, immutable [`Technology`].

use derive_builder::Builder;
use geometry::prelude::*;
use geometry::units::grid_f64_to_lambda;
use serde::{Deserialize, Serialize};

use crate::error::{EntryKind, Error, Result};
use crate::instance::{ArcInst, NodeInst};
use crate::layer::{LayerFilter, LayerId};
use crate::style::Style;
use crate::tech::Technology;

use buffer::PointBuffer;

mod arc;
pub(crate) mod buffer;
pub mod multicut;
pub mod nanotube;
mod node;
pub mod serpentine;

#[cfg(test)]
mod tests;

/// How an outline trace is split into separate polygons.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TraceBreak {
    /// Only gap markers split the trace.
    #[default]
    Sentinel,
    /// Gap markers and repeated consecutive points split the trace.
    SentinelOrDuplicate,
}

/// Options for a single shape computation.
#[derive(Debug, Default, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default)]
pub struct ShapeOptions {
    /// Use the per-port electrical layers, and tag polygons with their ports.
    pub electrical: bool,
    /// Emit only perimeter cuts of multi-cut contacts.
    pub reasonable: bool,
    /// Skip layers that fail this filter.
    #[builder(setter(strip_option))]
    pub filter: Option<LayerFilter>,
    /// Report every polygon on this layer instead of its own.
    #[builder(setter(strip_option))]
    pub layer_override: Option<LayerId>,
    /// How outline traces are split.
    pub trace_breaks: TraceBreak,
}

impl ShapeOptions {
    /// Returns a new [`ShapeOptionsBuilder`].
    #[inline]
    pub fn builder() -> ShapeOptionsBuilder {
        ShapeOptionsBuilder::default()
    }

    /// Options for a plain drawing of every layer.
    pub fn drawing() -> Self {
        Self::default()
    }

    /// Options for an electrical view of every layer.
    pub fn electrical() -> Self {
        Self {
            electrical: true,
            ..Default::default()
        }
    }

    pub(crate) fn accepts(&self, tech: &Technology, layer: LayerId) -> bool {
        match (&self.filter, tech.layer(layer)) {
            (Some(filter), Some(layer)) => filter.accepts(layer),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// One polygon of a node or arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    /// The vertices, in lambda.
    pub polygon: Polygon,
    /// The layer.
    pub layer: LayerId,
    /// How the vertices are drawn.
    pub style: Style,
    /// The port this polygon belongs to, in electrical mode.
    pub port: Option<usize>,
}

/// Computes node and arc polygons, reusing its scratch space between calls.
#[derive(Debug, Default)]
pub struct ShapeBuilder {
    buf: PointBuffer,
}

impl ShapeBuilder {
    /// Creates a builder with an empty scratch buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the polygons of a placed node.
    pub fn node_shapes(
        &mut self,
        tech: &Technology,
        inst: &NodeInst,
        opts: &ShapeOptions,
    ) -> Result<Vec<ShapeElement>> {
        let template = tech.node(inst.template).ok_or_else(|| Error::NotFound {
            tech: tech.name().clone(),
            kind: EntryKind::Node,
            name: arcstr::format!("#{}", inst.template.index()),
        })?;
        let mut out = Vec::new();
        node::node_shapes(self, tech, template, inst, opts, &mut out);
        Ok(out)
    }

    /// Computes the polygons of a placed arc.
    pub fn arc_shapes(
        &mut self,
        tech: &Technology,
        inst: &ArcInst,
        opts: &ShapeOptions,
    ) -> Result<Vec<ShapeElement>> {
        let template = tech.arc(inst.template).ok_or_else(|| Error::NotFound {
            tech: tech.name().clone(),
            kind: EntryKind::Arc,
            name: arcstr::format!("#{}", inst.template.index()),
        })?;
        let mut out = Vec::new();
        arc::arc_shapes(self, tech, template, inst, opts, &mut out);
        Ok(out)
    }

    /// Moves the buffered vertices into a new element.
    ///
    /// Vertices are in grid units relative to the transformation origin.
    fn flush(
        &mut self,
        xform: &Transformation,
        layer: LayerId,
        style: Style,
        port: Option<usize>,
        opts: &ShapeOptions,
    ) -> ShapeElement {
        let polygon = self.buf.drain_mapped(|p| {
            let p = xform.apply(p);
            FPoint::new(grid_f64_to_lambda(p.x), grid_f64_to_lambda(p.y))
        });
        ShapeElement {
            polygon,
            layer: opts.layer_override.unwrap_or(layer),
            style,
            port: if opts.electrical { port } else { None },
        }
    }

    /// Buffers `points` and moves them into a new element.
    fn emit(
        &mut self,
        points: impl IntoIterator<Item = FPoint>,
        xform: &Transformation,
        layer: LayerId,
        style: Style,
        port: Option<usize>,
        opts: &ShapeOptions,
    ) -> ShapeElement {
        let points = points.into_iter();
        self.buf.reset(points.size_hint().0);
        self.buf.extend(points);
        self.flush(xform, layer, style, port, opts)
    }
}
