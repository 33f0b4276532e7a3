//! Loading technologies from TOML descriptions.
//!
//! Entries are registered in file order. An entry that fails to load is
//! recorded as an error issue on the technology and skipped; entries that
//! depend on it fail in turn, and everything else still loads.

use arcstr::ArcStr;
use geometry::prelude::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::arc::{ArcFunction, ArcSpec};
use crate::diagnostics::{Cause, Severity};
use crate::edge::{EdgeExpr, TechPoint};
use crate::error::{EntryKind, Error, Result};
use crate::function::{Function, FunctionExtras};
use crate::layer::{LayerId, LayerSpec};
use crate::node::{
    CutRule, NodeFunction, NodeLayer, NodeSpec, PrimitivePort, Representation, SerpentineExtent,
};
use crate::param::{State, TechFactory};
use crate::style::Style;
use crate::tech::{FoundrySpec, TechSettings, Technology, TechnologyBuilder};

/// A complete technology description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechDescription {
    /// The technology name.
    pub name: ArcStr,
    /// Technology-wide settings.
    #[serde(default)]
    pub settings: TechSettings,
    /// Layers, in registration order.
    #[serde(default)]
    pub layers: Vec<LayerDesc>,
    /// Arc templates, in registration order.
    #[serde(default)]
    pub arcs: Vec<ArcDesc>,
    /// Node templates, in registration order.
    #[serde(default)]
    pub nodes: Vec<NodeDesc>,
    /// Foundries.
    #[serde(default)]
    pub foundries: Vec<FoundrySpec>,
    /// Old-name aliases.
    #[serde(default)]
    pub old_names: OldNames,
}

/// A layer description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerDesc {
    /// The layer name.
    pub name: ArcStr,
    /// The function name, such as `metal-1`.
    pub function: String,
    /// Modifier flag names.
    #[serde(default)]
    pub extras: Vec<String>,
    /// Stacking height.
    #[serde(default)]
    pub height: f64,
    /// Physical thickness.
    #[serde(default)]
    pub thickness: f64,
    /// Also create a `pseudo-<name>` pin layer.
    #[serde(default)]
    pub pin: bool,
}

/// One layer of an arc description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcLayerDesc {
    /// The layer name.
    pub layer: ArcStr,
    /// The full width of the layer on a minimum arc, in lambda.
    pub width: f64,
    /// The drawing style.
    #[serde(default)]
    pub style: Style,
}

fn yes() -> bool {
    true
}

/// An arc template description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcDesc {
    /// The template name.
    pub name: ArcStr,
    /// The function name, such as `metal-1`.
    pub function: String,
    /// The layers; the first is the base layer.
    pub layers: Vec<ArcLayerDesc>,
    /// Width offset stored by old binary libraries, in lambda.
    #[serde(default)]
    pub legacy_width_offset: f64,
    /// Extra width given to new instances, in lambda.
    #[serde(default)]
    pub default_width: f64,
    /// Whether new instances extend their ends.
    #[serde(default = "yes")]
    pub extended: bool,
    /// Whether new instances are directional.
    #[serde(default)]
    pub directional: bool,
}

/// A node port description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDesc {
    /// The port name.
    pub name: ArcStr,
    /// Names of the arcs that may connect.
    #[serde(default)]
    pub arcs: Vec<ArcStr>,
    /// The topology group.
    #[serde(default)]
    pub topology: usize,
}

/// How a node layer description is shaped.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    /// A box inset from the node edges.
    #[default]
    Box,
    /// Explicit points.
    Points,
    /// A multi-cut box.
    MultiCut,
}

/// One layer of a node description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLayerDesc {
    /// The layer name.
    pub layer: ArcStr,
    /// The port name, if the layer is electrically connected.
    #[serde(default)]
    pub port: Option<ArcStr>,
    /// The drawing style.
    #[serde(default)]
    pub style: Style,
    /// The representation.
    #[serde(default)]
    pub kind: ShapeKind,
    /// For boxes and multi-cut boxes: inset from the node edges `[x, y]`, in lambda.
    #[serde(default)]
    pub inset: [f64; 2],
    /// For points: `[x multiplier, x adder, y multiplier, y adder]`, adders in lambda.
    #[serde(default)]
    pub points: Vec<[f64; 4]>,
    /// For multi-cut boxes: the cut size, in lambda.
    #[serde(default)]
    pub cut: f64,
    /// For multi-cut boxes: separation of cuts in a line, in lambda.
    #[serde(default)]
    pub sep_1d: f64,
    /// For multi-cut boxes: separation of cuts in an array, in lambda.
    #[serde(default)]
    pub sep_2d: f64,
    /// Serpentine extents `[left, right, bottom, top]`, in lambda.
    #[serde(default)]
    pub serpentine: Option<[f64; 4]>,
    /// Whether the layer is drawn as nanotube rails.
    #[serde(default)]
    pub nanotube: bool,
}

/// A node template description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDesc {
    /// The template name.
    pub name: ArcStr,
    /// The node function.
    #[serde(default)]
    pub function: NodeFunction,
    /// Default `[width, height]`, in lambda.
    pub size: [f64; 2],
    /// Invisible surround `[low x, high x, low y, high y]`, in lambda.
    #[serde(default)]
    pub size_offset: [f64; 4],
    /// The ports.
    #[serde(default)]
    pub ports: Vec<PortDesc>,
    /// The drawing layers.
    pub layers: Vec<NodeLayerDesc>,
    /// Per-port electrical layers.
    #[serde(default)]
    pub electrical_layers: Option<Vec<NodeLayerDesc>>,
    /// Whether instances may carry an outline trace.
    #[serde(default)]
    pub holds_outline: bool,
    /// The default gate length; makes the node a serpentine transistor.
    #[serde(default)]
    pub serpentine_length: Option<f64>,
}

/// Old-name aliases, mapping old names to current ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OldNames {
    /// Layer aliases.
    #[serde(default)]
    pub layers: IndexMap<ArcStr, ArcStr>,
    /// Arc aliases.
    #[serde(default)]
    pub arcs: IndexMap<ArcStr, ArcStr>,
    /// Node aliases.
    #[serde(default)]
    pub nodes: IndexMap<ArcStr, ArcStr>,
}

impl TechDescription {
    /// Parses a TOML description.
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Registers every entry with a new builder.
    ///
    /// Rejected entries are recorded as error issues.
    pub fn into_builder(self) -> TechnologyBuilder {
        let mut b = TechnologyBuilder::new(self.name.clone());
        let reject = |b: &mut TechnologyBuilder, template: &ArcStr, err: Error| {
            b.record_issue(
                Cause::RejectedTemplate {
                    template: template.clone(),
                    message: err.to_string(),
                },
                Severity::Error,
            );
        };

        if let Err(err) = b.set_settings(self.settings) {
            reject(&mut b, &arcstr::literal!("settings"), err);
        }
        for layer in self.layers {
            if let Err(err) = add_layer(&mut b, &layer) {
                reject(&mut b, &layer.name, err);
            }
        }
        for arc in self.arcs {
            if let Err(err) = arc_spec(&b, &arc).and_then(|spec| b.add_arc(spec)) {
                reject(&mut b, &arc.name, err);
            }
        }
        for node in self.nodes {
            if let Err(err) = node_spec(&b, &node).and_then(|spec| b.add_node(spec)) {
                reject(&mut b, &node.name, err);
            }
        }
        for foundry in self.foundries {
            let name = foundry.name.clone();
            if let Err(err) = b.add_foundry(foundry) {
                reject(&mut b, &name, err);
            }
        }
        for (old, new) in self.old_names.layers {
            b.alias_layer(old, new);
        }
        for (old, new) in self.old_names.arcs {
            b.alias_arc(old, new);
        }
        for (old, new) in self.old_names.nodes {
            b.alias_node(old, new);
        }
        b
    }

    /// Registers every entry and builds the technology.
    pub fn build(self) -> Technology {
        self.into_builder().build()
    }
}

impl TechFactory for TechDescription {
    fn name(&self) -> ArcStr {
        self.name.clone()
    }

    fn build(&self, state: &State) -> Result<Technology> {
        Ok(self.clone().into_builder().with_state(state.clone()).build())
    }
}

fn add_layer(b: &mut TechnologyBuilder, desc: &LayerDesc) -> Result<()> {
    let function = Function::from_name(&desc.function).ok_or_else(|| Error::UnknownName {
        what: "layer function",
        name: desc.function.clone(),
    })?;
    let extras = FunctionExtras::from_names(desc.extras.iter().map(String::as_str))
        .map_err(|name| Error::UnknownName {
            what: "layer function extra",
            name,
        })?;
    let id = b.add_layer(
        LayerSpec::new(desc.name.clone(), function)
            .extras(extras)
            .height(desc.height, desc.thickness),
    )?;
    if desc.pin {
        b.add_pseudo_layer(id)?;
    }
    Ok(())
}

fn layer_id(b: &TechnologyBuilder, name: &ArcStr) -> Result<LayerId> {
    b.find_layer(name)
        .map(|l| l.id())
        .ok_or_else(|| Error::NotFound {
            tech: b.name().clone(),
            kind: EntryKind::Layer,
            name: name.clone(),
        })
}

fn arc_spec(b: &TechnologyBuilder, desc: &ArcDesc) -> Result<ArcSpec> {
    let function = ArcFunction::from_name(&desc.function).ok_or_else(|| Error::UnknownName {
        what: "arc function",
        name: desc.function.clone(),
    })?;
    let layers = desc
        .layers
        .iter()
        .map(|l| Ok((layer_id(b, &l.layer)?, l.style, l.width / 2.)))
        .collect::<Result<Vec<_>>>()?;
    let mut spec = ArcSpec::new(desc.name.clone(), function, layers)
        .legacy_width_offset(desc.legacy_width_offset)
        .extended(desc.extended)
        .directional(desc.directional);
    spec.default_extend_over_min = desc.default_width / 2.;
    Ok(spec)
}

fn node_spec(b: &TechnologyBuilder, desc: &NodeDesc) -> Result<NodeSpec> {
    let ports = desc
        .ports
        .iter()
        .map(|p| {
            let arcs = p
                .arcs
                .iter()
                .map(|name| {
                    b.find_arc(name).map(|a| a.id()).ok_or_else(|| Error::NotFound {
                        tech: b.name().clone(),
                        kind: EntryKind::Arc,
                        name: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(PrimitivePort::new(p.name.clone(), arcs, p.topology))
        })
        .collect::<Result<Vec<_>>>()?;

    let convert_layers = |layers: &[NodeLayerDesc]| {
        layers
            .iter()
            .map(|l| node_layer(b, desc, l))
            .collect::<Result<Vec<_>>>()
    };
    let layers = convert_layers(&desc.layers)?;
    let electrical_layers = desc
        .electrical_layers
        .as_deref()
        .map(convert_layers)
        .transpose()?;

    let [w, h] = desc.size;
    let [lx, hx, ly, hy] = desc.size_offset;
    let mut spec = NodeSpec::new(desc.name.clone(), desc.function, (w, h), layers)
        .size_offset(lx, hx, ly, hy);
    spec.ports = ports;
    spec.electrical_layers = electrical_layers;
    if desc.holds_outline {
        spec = spec.holds_outline();
    }
    if let Some(length) = desc.serpentine_length {
        spec = spec.serpentine(length);
    }
    Ok(spec)
}

fn node_layer(b: &TechnologyBuilder, node: &NodeDesc, desc: &NodeLayerDesc) -> Result<NodeLayer> {
    let malformed = |reason: String| Error::MalformedTemplate {
        tech: b.name().clone(),
        template: node.name.clone(),
        reason,
    };
    let layer = layer_id(b, &desc.layer)?;
    let port = desc
        .port
        .as_ref()
        .map(|name| {
            node.ports
                .iter()
                .position(|p| &p.name == name)
                .ok_or_else(|| malformed(format!("unknown port `{}`", name)))
        })
        .transpose()?;
    let [ix, iy] = desc.inset;
    let corners = || -> Result<[TechPoint; 2]> {
        Ok(TechPoint::indented_xy(lambda_to_grid(ix)?, lambda_to_grid(iy)?))
    };
    let repr = match desc.kind {
        ShapeKind::Box => Representation::Box(corners()?),
        ShapeKind::Points => {
            if desc.points.is_empty() {
                return Err(malformed(format!("layer `{}` has no points", desc.layer)));
            }
            Representation::Points(
                desc.points
                    .iter()
                    .map(|&[mx, ax, my, ay]| {
                        Ok(TechPoint::new(
                            EdgeExpr::from_lambda(mx, ax)?,
                            EdgeExpr::from_lambda(my, ay)?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?,
            )
        }
        ShapeKind::MultiCut => Representation::MultiCutBox {
            corners: corners()?,
            rule: CutRule::from_lambda(desc.cut, desc.sep_1d, desc.sep_2d)?,
        },
    };
    let serpentine = desc
        .serpentine
        .map(|[l, r, bot, top]| SerpentineExtent::from_lambda(l, r, bot, top))
        .transpose()?;
    Ok(NodeLayer {
        layer,
        port,
        style: desc.style,
        repr,
        serpentine,
        nanotube: desc.nanotube,
    })
}
