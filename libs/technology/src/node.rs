//! Node templates and their layers.

use arcstr::ArcStr;
use geometry::prelude::*;
use geometry::units::UnitError;
use serde::{Deserialize, Serialize};

use crate::arc::ArcId;
use crate::edge::TechPoint;
use crate::layer::LayerId;
use crate::size::SizeOffset;
use crate::style::Style;

/// The index of a node template within its technology.
#[derive(
    Default, Debug, Copy, Clone, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The dense index of this node template.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The function of a node template.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum NodeFunction {
    /// Unknown function.
    #[default]
    Unknown,
    /// A pin connecting arcs of a single kind.
    Pin,
    /// A contact between two or more conducting layers.
    Contact,
    /// A plain piece of layer.
    Node,
    /// An N-channel enhancement transistor.
    TransistorN,
    /// A P-channel enhancement transistor.
    TransistorP,
    /// An N-channel depletion transistor.
    TransistorDepletion,
    /// An N-type carbon-nanotube transistor.
    TransistorCntN,
    /// A P-type carbon-nanotube transistor.
    TransistorCntP,
    /// A well tap.
    Well,
    /// A substrate tap.
    Substrate,
    /// A resistor.
    Resistor,
    /// A capacitor.
    Capacitor,
    /// Non-electrical artwork.
    Art,
}

impl NodeFunction {
    /// Returns `true` for any kind of transistor.
    pub fn is_transistor(&self) -> bool {
        matches!(
            self,
            Self::TransistorN
                | Self::TransistorP
                | Self::TransistorDepletion
                | Self::TransistorCntN
                | Self::TransistorCntP
        )
    }

    /// Returns `true` for carbon-nanotube transistors.
    pub fn is_cnt(&self) -> bool {
        matches!(self, Self::TransistorCntN | Self::TransistorCntP)
    }
}

/// The spacing rule of a multi-cut contact layer, in grid units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutRule {
    /// The size of one cut.
    pub size: Dims,
    /// Separation between cuts arranged in a single row or column.
    pub sep_1d: i64,
    /// Separation between cuts arranged in a two-dimensional array.
    pub sep_2d: i64,
}

impl CutRule {
    /// Creates a rule from grid values.
    pub const fn new(size: Dims, sep_1d: i64, sep_2d: i64) -> Self {
        Self {
            size,
            sep_1d,
            sep_2d,
        }
    }

    /// Creates a rule for square cuts from lambda values.
    pub fn from_lambda(size: f64, sep_1d: f64, sep_2d: f64) -> Result<Self, UnitError> {
        Ok(Self::new(
            Dims::square(lambda_to_grid_size(size)?),
            lambda_to_grid_size(sep_1d)?,
            lambda_to_grid_size(sep_2d)?,
        ))
    }
}

/// Extensions of a serpentine transistor layer around its centerline, in grid units.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpentineExtent {
    /// Perpendicular offset to the left of the centerline.
    pub left: i64,
    /// Perpendicular offset to the right of the centerline.
    pub right: i64,
    /// Extension past the first centerline point.
    pub bottom: i64,
    /// Extension past the last centerline point.
    pub top: i64,
}

impl SerpentineExtent {
    /// Creates an extent from grid values.
    pub const fn new(left: i64, right: i64, bottom: i64, top: i64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Creates an extent from lambda values.
    pub fn from_lambda(left: f64, right: f64, bottom: f64, top: f64) -> Result<Self, UnitError> {
        Ok(Self::new(
            lambda_to_grid_size(left)?,
            lambda_to_grid_size(right)?,
            lambda_to_grid_size(bottom)?,
            lambda_to_grid_size(top)?,
        ))
    }

    fn is_valid(&self) -> bool {
        self.left >= 0 && self.right >= 0 && self.bottom >= 0 && self.top >= 0
    }
}

/// How a node layer's geometry is described.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Representation {
    /// An explicit polygon; each vertex is evaluated independently.
    Points(Vec<TechPoint>),
    /// An axis-aligned box given by two diagonal corners.
    Box([TechPoint; 2]),
    /// An array of cuts filling the box whose corners bound the cut centers.
    MultiCutBox {
        /// Corners of the region cut centers may occupy.
        corners: [TechPoint; 2],
        /// Cut size and spacing.
        rule: CutRule,
    },
}

impl Representation {
    /// A box spanning the full node, inset by `inset` grid units on every side.
    pub const fn inset_box(inset: i64) -> Self {
        Self::Box(TechPoint::indented(inset))
    }

    /// Every edge point of this representation.
    pub fn points(&self) -> &[TechPoint] {
        match self {
            Self::Points(points) => points,
            Self::Box(corners) | Self::MultiCutBox { corners, .. } => corners,
        }
    }
}

/// One layer of a node template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayer {
    /// The layer drawn.
    pub layer: LayerId,
    /// The port this layer belongs to, if it is electrically connected.
    pub port: Option<usize>,
    /// The drawing style.
    pub style: Style,
    /// The geometry.
    pub repr: Representation,
    /// Centerline extents, used when the node is drawn along a serpentine trace.
    pub serpentine: Option<SerpentineExtent>,
    /// Whether this layer is drawn as a set of carbon-nanotube rails.
    pub nanotube: bool,
}

impl NodeLayer {
    /// A filled layer with the given representation and no port.
    pub fn new(layer: LayerId, repr: Representation) -> Self {
        Self {
            layer,
            port: None,
            style: Style::Filled,
            repr,
            serpentine: None,
            nanotube: false,
        }
    }

    /// A filled box inset from the node boundary.
    pub fn inset_box(layer: LayerId, inset: i64) -> Self {
        Self::new(layer, Representation::inset_box(inset))
    }

    /// Assigns this layer to a port.
    pub fn with_port(mut self, port: usize) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the drawing style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Sets the serpentine extents.
    pub fn with_serpentine(mut self, extent: SerpentineExtent) -> Self {
        self.serpentine = Some(extent);
        self
    }

    /// Draws this layer as nanotube rails.
    pub fn as_nanotube(mut self) -> Self {
        self.nanotube = true;
        self
    }
}

/// A connection point on a node template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitivePort {
    /// The port name, unique within its template.
    pub name: ArcStr,
    /// Arc templates that may connect to this port.
    pub connections: Vec<ArcId>,
    /// Ports sharing a topology group are electrically connected inside the node.
    pub topology: usize,
}

impl PrimitivePort {
    /// A port in its own topology group.
    pub fn new(
        name: impl Into<ArcStr>,
        connections: impl IntoIterator<Item = ArcId>,
        topology: usize,
    ) -> Self {
        Self {
            name: name.into(),
            connections: connections.into_iter().collect(),
            topology,
        }
    }
}

/// A reusable description of a node's geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub(crate) id: NodeId,
    pub(crate) name: ArcStr,
    pub(crate) function: NodeFunction,
    pub(crate) default_size: Dims,
    pub(crate) size_offset: SizeOffset,
    pub(crate) ports: Vec<PrimitivePort>,
    pub(crate) layers: Vec<NodeLayer>,
    pub(crate) electrical_layers: Option<Vec<NodeLayer>>,
    pub(crate) holds_outline: bool,
    pub(crate) serpentine: bool,
    pub(crate) default_length: i64,
    pub(crate) not_used: bool,
}

impl NodeTemplate {
    /// The template's index in its technology.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The template name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The node function.
    #[inline]
    pub fn function(&self) -> NodeFunction {
        self.function
    }

    /// The size given to new instances, in grid units.
    #[inline]
    pub fn default_size(&self) -> Dims {
        self.default_size
    }

    /// The invisible surround between the node's nominal and drawn extent.
    #[inline]
    pub fn size_offset(&self) -> SizeOffset {
        self.size_offset
    }

    /// The ports.
    #[inline]
    pub fn ports(&self) -> &[PrimitivePort] {
        &self.ports
    }

    /// Looks up a port index by name.
    pub fn port_index(&self, name: &str) -> Option<usize> {
        self.ports.iter().position(|p| p.name == name)
    }

    /// The drawing layers.
    #[inline]
    pub fn layers(&self) -> &[NodeLayer] {
        &self.layers
    }

    /// The per-port electrical layers, if they differ from the drawing layers.
    #[inline]
    pub fn electrical_layers(&self) -> Option<&[NodeLayer]> {
        self.electrical_layers.as_deref()
    }

    /// The layers used for the given mode.
    ///
    /// Falls back to the drawing layers when no electrical layers are defined.
    pub fn layers_for(&self, electrical: bool) -> &[NodeLayer] {
        match (&self.electrical_layers, electrical) {
            (Some(layers), true) => layers,
            _ => &self.layers,
        }
    }

    /// Whether instances may carry an outline trace.
    #[inline]
    pub fn holds_outline(&self) -> bool {
        self.holds_outline
    }

    /// Whether instances may follow a serpentine centerline.
    #[inline]
    pub fn is_serpentine(&self) -> bool {
        self.serpentine
    }

    /// The default gate length of a serpentine transistor, in grid units.
    #[inline]
    pub fn default_length(&self) -> i64 {
        self.default_length
    }

    /// Whether the current technology parameters disable this node.
    #[inline]
    pub fn is_not_used(&self) -> bool {
        self.not_used
    }

    /// Returns `true` if any layer of this template is a multi-cut box.
    pub fn has_multi_cut(&self) -> bool {
        self.layers
            .iter()
            .any(|l| matches!(l.repr, Representation::MultiCutBox { .. }))
    }

    /// Checks the internal consistency of a set of layers against this template.
    pub(crate) fn check_layers(&self, layers: &[NodeLayer], num_layers: usize) -> Result<(), String> {
        for (i, layer) in layers.iter().enumerate() {
            if layer.layer.0 >= num_layers {
                return Err(format!("layer {} references unknown layer {}", i, layer.layer.0));
            }
            if let Some(port) = layer.port {
                if port >= self.ports.len() {
                    return Err(format!(
                        "layer {} references port {} but the template has {} ports",
                        i,
                        port,
                        self.ports.len()
                    ));
                }
            }
            match &layer.repr {
                Representation::Points(points) if points.is_empty() => {
                    return Err(format!("layer {} has no points", i));
                }
                Representation::MultiCutBox { rule, .. }
                    if rule.size.w() <= 0
                        || rule.size.h() <= 0
                        || rule.sep_1d < 0
                        || rule.sep_2d < 0 =>
                {
                    return Err(format!("layer {} has an invalid cut rule", i));
                }
                _ => {}
            }
            if layer.nanotube && !matches!(layer.repr, Representation::Box(_)) {
                return Err(format!("nanotube layer {} must be a box", i));
            }
            match layer.serpentine {
                Some(extent) if !extent.is_valid() => {
                    return Err(format!("layer {} has negative serpentine extents", i));
                }
                None if self.serpentine => {
                    return Err(format!("serpentine layer {} has no extents", i));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Describes a node template to be registered with
/// [`TechnologyBuilder::add_node`](crate::tech::TechnologyBuilder::add_node).
#[derive(Debug, Clone)]
pub struct NodeSpec {
    /// The template name.
    pub name: ArcStr,
    /// The node function.
    pub function: NodeFunction,
    /// Default width and height, in lambda.
    pub default_size: (f64, f64),
    /// Invisible surround `(low x, high x, low y, high y)`, in lambda.
    pub size_offset: (f64, f64, f64, f64),
    /// The ports.
    pub ports: Vec<PrimitivePort>,
    /// The drawing layers.
    pub layers: Vec<NodeLayer>,
    /// Per-port electrical layers.
    pub electrical_layers: Option<Vec<NodeLayer>>,
    /// Whether instances may carry an outline trace.
    pub holds_outline: bool,
    /// Whether instances may follow a serpentine centerline.
    pub serpentine: bool,
    /// The default serpentine gate length, in lambda.
    pub default_length: f64,
    /// Whether the node is disabled by the technology parameters.
    pub not_used: bool,
}

impl NodeSpec {
    /// A node with the given name, function, default size and layers.
    pub fn new(
        name: impl Into<ArcStr>,
        function: NodeFunction,
        default_size: (f64, f64),
        layers: impl IntoIterator<Item = NodeLayer>,
    ) -> Self {
        Self {
            name: name.into(),
            function,
            default_size,
            size_offset: (0., 0., 0., 0.),
            ports: Vec::new(),
            layers: layers.into_iter().collect(),
            electrical_layers: None,
            holds_outline: false,
            serpentine: false,
            default_length: 0.,
            not_used: false,
        }
    }

    /// Adds a port.
    pub fn port(mut self, port: PrimitivePort) -> Self {
        self.ports.push(port);
        self
    }

    /// Sets the invisible surround, in lambda.
    pub fn size_offset(mut self, lx: f64, hx: f64, ly: f64, hy: f64) -> Self {
        self.size_offset = (lx, hx, ly, hy);
        self
    }

    /// Sets the electrical layers.
    pub fn electrical_layers(mut self, layers: impl IntoIterator<Item = NodeLayer>) -> Self {
        self.electrical_layers = Some(layers.into_iter().collect());
        self
    }

    /// Allows instances to carry an outline trace.
    pub fn holds_outline(mut self) -> Self {
        self.holds_outline = true;
        self
    }

    /// Marks the node as a serpentine transistor with the given default gate length.
    pub fn serpentine(mut self, default_length: f64) -> Self {
        self.serpentine = true;
        self.holds_outline = true;
        self.default_length = default_length;
        self
    }

    /// Marks the node as disabled by the technology parameters.
    pub fn not_used(mut self, not_used: bool) -> Self {
        self.not_used = not_used;
        self
    }
}
