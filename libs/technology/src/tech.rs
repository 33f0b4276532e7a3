//! Technology catalogs and their construction.
//!
//! A [`TechnologyBuilder`] registers layers, then arc templates, then node
//! templates, then foundries. [`TechnologyBuilder::build`] checks the result
//! for consistency and locks it into an immutable [`Technology`].

use std::collections::HashSet;
use std::ops::Deref;

use arcstr::ArcStr;
use geometry::prelude::*;
use geometry::units::lambda_to_grid_size;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::arc::{ArcId, ArcLayer, ArcSpec, ArcTemplate};
use crate::diagnostics::{Cause, IssueSet, Severity, TechIssue};
use crate::error::{EntryKind, Error, Result};
use crate::function::FunctionExtras;
use crate::instance::{ArcInst, NodeInst};
use crate::layer::{Layer, LayerId, LayerSpec};
use crate::node::{NodeFunction, NodeId, NodeSpec, NodeTemplate};
use crate::param::State;
use crate::shape::{ShapeBuilder, ShapeElement, ShapeOptions};
use crate::size::{FileVersion, SizeCorrector, SizeOffset};

/// Technology-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechSettings {
    /// Diameter of the bubble drawn at negated arc ends, in lambda.
    pub bubble_size: f64,
    /// Length of arc direction arrows, in lambda.
    pub arrow_length: f64,
    /// Nanometers per lambda.
    pub scale: f64,
    /// A human-readable description.
    pub description: String,
}

impl Default for TechSettings {
    fn default() -> Self {
        Self {
            bubble_size: 1.2,
            arrow_length: 1.,
            scale: 200.,
            description: String::new(),
        }
    }
}

/// A GDS layer number and datatype.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GdsLayer(pub u16, pub u16);

/// A foundry's mapping of technology layers to GDS layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Foundry {
    name: ArcStr,
    gds: IndexMap<LayerId, GdsLayer>,
}

impl Foundry {
    /// The foundry name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The GDS layer of a technology layer.
    pub fn gds_layer(&self, layer: LayerId) -> Option<GdsLayer> {
        self.gds.get(&layer).copied()
    }

    /// Iterates over every mapped layer.
    pub fn gds_layers(&self) -> impl Iterator<Item = (LayerId, GdsLayer)> + '_ {
        self.gds.iter().map(|(k, v)| (*k, *v))
    }
}

/// Describes a foundry to be registered with [`TechnologyBuilder::add_foundry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundrySpec {
    /// The foundry name.
    pub name: ArcStr,
    /// GDS layers by technology layer name.
    pub gds: IndexMap<ArcStr, GdsLayer>,
}

impl FoundrySpec {
    /// A foundry with no layers mapped.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            gds: IndexMap::new(),
        }
    }

    /// Maps a layer to a GDS layer.
    pub fn map(mut self, layer: impl Into<ArcStr>, gds: GdsLayer) -> Self {
        self.gds.insert(layer.into(), gds);
        self
    }
}

/// A technology under construction.
///
/// Read-only queries are available during construction and, through
/// [`Deref`], on the built [`Technology`].
#[derive(Debug, Clone)]
pub struct TechnologyBuilder {
    name: ArcStr,
    settings: TechSettings,
    bubble_size: i64,
    arrow_length: i64,
    state: State,
    layers: Vec<Layer>,
    layer_names: IndexMap<ArcStr, LayerId>,
    arcs: Vec<ArcTemplate>,
    arc_names: IndexMap<ArcStr, ArcId>,
    nodes: Vec<NodeTemplate>,
    node_names: IndexMap<ArcStr, NodeId>,
    foundries: IndexMap<ArcStr, Foundry>,
    old_layer_names: IndexMap<ArcStr, ArcStr>,
    old_arc_names: IndexMap<ArcStr, ArcStr>,
    old_node_names: IndexMap<ArcStr, ArcStr>,
    issues: IssueSet<TechIssue>,
}

/// A locked technology.
#[derive(Debug, Clone)]
pub struct Technology(TechnologyBuilder);

impl Deref for Technology {
    type Target = TechnologyBuilder;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TechnologyBuilder {
    /// Creates an empty technology with default settings and state.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        let settings = TechSettings::default();
        Self {
            name: name.into(),
            bubble_size: (settings.bubble_size * GRID_PER_LAMBDA as f64).round() as i64,
            arrow_length: (settings.arrow_length * GRID_PER_LAMBDA as f64).round() as i64,
            settings,
            state: State::default(),
            layers: Vec::new(),
            layer_names: IndexMap::new(),
            arcs: Vec::new(),
            arc_names: IndexMap::new(),
            nodes: Vec::new(),
            node_names: IndexMap::new(),
            foundries: IndexMap::new(),
            old_layer_names: IndexMap::new(),
            old_arc_names: IndexMap::new(),
            old_node_names: IndexMap::new(),
            issues: IssueSet::new(),
        }
    }

    /// Records the parameter state this technology is built for.
    pub fn with_state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    /// Replaces the technology-wide settings.
    pub fn set_settings(&mut self, settings: TechSettings) -> Result<()> {
        let bubble_size = self.convert("settings", "bubble size", settings.bubble_size)?;
        let arrow_length = self.convert("settings", "arrow length", settings.arrow_length)?;
        if !settings.scale.is_finite() || settings.scale <= 0. {
            return self.reject(self.invalid("settings", "scale", settings.scale));
        }
        self.bubble_size = bubble_size;
        self.arrow_length = arrow_length;
        self.settings = settings;
        Ok(())
    }

    fn invalid(&self, template: &str, what: &'static str, value: impl ToString) -> Error {
        Error::InvalidValue {
            tech: self.name.clone(),
            template: template.into(),
            what,
            value: value.to_string(),
        }
    }

    fn malformed(&self, template: &ArcStr, reason: impl Into<String>) -> Error {
        Error::MalformedTemplate {
            tech: self.name.clone(),
            template: template.clone(),
            reason: reason.into(),
        }
    }

    fn reject<T>(&self, err: Error) -> Result<T> {
        tracing::error!(tech = %self.name, "{}", err);
        Err(err)
    }

    /// Converts a non-negative lambda value, rejecting it on behalf of `template`.
    fn convert(&self, template: &str, what: &'static str, value: f64) -> Result<i64> {
        match lambda_to_grid_size(value) {
            Ok(v) => Ok(v),
            Err(_) => self.reject(self.invalid(template, what, value)),
        }
    }

    fn check_unique<V>(
        &self,
        names: &IndexMap<ArcStr, V>,
        kind: EntryKind,
        name: &ArcStr,
    ) -> Result<()> {
        if names.contains_key(name) {
            return self.reject(Error::DuplicateName {
                tech: self.name.clone(),
                kind,
                name: name.clone(),
            });
        }
        Ok(())
    }

    /// Registers a layer.
    pub fn add_layer(&mut self, spec: LayerSpec) -> Result<LayerId> {
        self.check_unique(&self.layer_names, EntryKind::Layer, &spec.name)?;
        if !spec.height.is_finite() {
            return self.reject(self.invalid(&spec.name, "layer height", spec.height));
        }
        if !spec.thickness.is_finite() || spec.thickness < 0. {
            return self.reject(self.invalid(&spec.name, "layer thickness", spec.thickness));
        }
        let id = LayerId(self.layers.len());
        self.layer_names.insert(spec.name.clone(), id);
        self.layers.push(Layer {
            id,
            name: spec.name,
            function: spec.function,
            extras: spec.extras - FunctionExtras::PSEUDO,
            height: spec.height,
            thickness: spec.thickness,
            non_pseudo: id,
        });
        Ok(id)
    }

    /// Registers a pseudo layer standing in for `real`, named `pseudo-<real>`.
    pub fn add_pseudo_layer(&mut self, real: LayerId) -> Result<LayerId> {
        let Some(base) = self.layers.get(real.0) else {
            return self.reject(Error::NotFound {
                tech: self.name.clone(),
                kind: EntryKind::Layer,
                name: arcstr::format!("#{}", real.0),
            });
        };
        let base = base.clone();
        let name = arcstr::format!("pseudo-{}", base.name);
        self.check_unique(&self.layer_names, EntryKind::Layer, &name)?;
        let id = LayerId(self.layers.len());
        self.layer_names.insert(name.clone(), id);
        self.layers.push(Layer {
            id,
            name,
            function: base.function,
            extras: base.extras | FunctionExtras::PSEUDO,
            height: base.height,
            thickness: base.thickness,
            non_pseudo: base.non_pseudo,
        });
        Ok(id)
    }

    /// Registers an arc template.
    pub fn add_arc(&mut self, spec: ArcSpec) -> Result<ArcId> {
        self.check_unique(&self.arc_names, EntryKind::Arc, &spec.name)?;
        if spec.layers.is_empty() {
            return self.reject(self.malformed(&spec.name, "arc has no layers"));
        }
        if spec.base_layer >= spec.layers.len() {
            return self.reject(self.malformed(&spec.name, "base layer index out of range"));
        }
        let mut layers = Vec::with_capacity(spec.layers.len());
        for &(layer, style, extend) in spec.layers.iter() {
            if layer.0 >= self.layers.len() {
                return self.reject(
                    self.malformed(&spec.name, format!("unknown layer {}", layer.0)),
                );
            }
            let grid_extend = self.convert(&spec.name, "layer width", extend)?;
            layers.push(ArcLayer {
                layer,
                style,
                grid_extend,
            });
        }
        let legacy_width_offset =
            self.convert(&spec.name, "legacy width offset", spec.legacy_width_offset)?;
        let default_extend_over_min =
            self.convert(&spec.name, "default width", spec.default_extend_over_min)?;

        let id = ArcId(self.arcs.len());
        self.arc_names.insert(spec.name.clone(), id);
        self.arcs.push(ArcTemplate {
            id,
            name: spec.name,
            function: spec.function,
            base_extend: layers[spec.base_layer].grid_extend,
            layers,
            legacy_width_offset,
            default_extend_over_min,
            extended: spec.extended,
            directional: spec.directional,
            not_used: spec.not_used,
        });
        Ok(id)
    }

    /// Registers a node template.
    ///
    /// Malformed templates (bad port or layer references, inconsistent
    /// representations, missing serpentine extents) are rejected.
    pub fn add_node(&mut self, spec: NodeSpec) -> Result<NodeId> {
        self.check_unique(&self.node_names, EntryKind::Node, &spec.name)?;
        let (w, h) = spec.default_size;
        let default_size = Dims::new(
            self.convert(&spec.name, "default width", w)?,
            self.convert(&spec.name, "default height", h)?,
        );
        let (lx, hx, ly, hy) = spec.size_offset;
        let size_offset = match SizeOffset::from_lambda(lx, hx, ly, hy) {
            Ok(offset) => offset,
            Err(_) => {
                return self.reject(self.invalid(
                    &spec.name,
                    "size offset",
                    format!("{}, {}, {}, {}", lx, hx, ly, hy),
                ))
            }
        };
        let default_length = self.convert(&spec.name, "serpentine length", spec.default_length)?;

        if spec.layers.is_empty() {
            return self.reject(self.malformed(&spec.name, "node has no layers"));
        }
        let mut port_names = HashSet::new();
        for port in spec.ports.iter() {
            if !port_names.insert(&port.name) {
                return self.reject(
                    self.malformed(&spec.name, format!("duplicate port `{}`", port.name)),
                );
            }
            if let Some(arc) = port.connections.iter().find(|a| a.0 >= self.arcs.len()) {
                return self.reject(self.malformed(
                    &spec.name,
                    format!("port `{}` connects to unknown arc {}", port.name, arc.0),
                ));
            }
        }

        let template = NodeTemplate {
            id: NodeId(self.nodes.len()),
            name: spec.name,
            function: spec.function,
            default_size,
            size_offset,
            ports: spec.ports,
            layers: spec.layers,
            electrical_layers: spec.electrical_layers,
            holds_outline: spec.holds_outline,
            serpentine: spec.serpentine,
            default_length,
            not_used: spec.not_used,
        };
        let checked = template
            .check_layers(&template.layers, self.layers.len())
            .and_then(|_| match &template.electrical_layers {
                Some(layers) => template.check_layers(layers, self.layers.len()),
                None => Ok(()),
            });
        if let Err(reason) = checked {
            return self.reject(self.malformed(&template.name, reason));
        }

        let id = template.id;
        self.node_names.insert(template.name.clone(), id);
        self.nodes.push(template);
        Ok(id)
    }

    /// Registers a foundry.
    pub fn add_foundry(&mut self, spec: FoundrySpec) -> Result<()> {
        self.check_unique(&self.foundries, EntryKind::Foundry, &spec.name)?;
        let mut gds = IndexMap::with_capacity(spec.gds.len());
        for (layer, gds_layer) in spec.gds {
            let Some(&id) = self.layer_names.get(&layer) else {
                return self.reject(Error::NotFound {
                    tech: self.name.clone(),
                    kind: EntryKind::Layer,
                    name: layer,
                });
            };
            gds.insert(id, gds_layer);
        }
        self.foundries.insert(
            spec.name.clone(),
            Foundry {
                name: spec.name,
                gds,
            },
        );
        Ok(())
    }

    /// Records that layers once named `old` are now named `current`.
    pub fn alias_layer(&mut self, old: impl Into<ArcStr>, current: impl Into<ArcStr>) {
        self.old_layer_names.insert(old.into(), current.into());
    }

    /// Records that arcs once named `old` are now named `current`.
    pub fn alias_arc(&mut self, old: impl Into<ArcStr>, current: impl Into<ArcStr>) {
        self.old_arc_names.insert(old.into(), current.into());
    }

    /// Records that nodes once named `old` are now named `current`.
    pub fn alias_node(&mut self, old: impl Into<ArcStr>, current: impl Into<ArcStr>) {
        self.old_node_names.insert(old.into(), current.into());
    }

    pub(crate) fn record_issue(&mut self, cause: Cause, severity: Severity) {
        let issue = TechIssue::new_and_log(&self.name, cause, severity);
        self.issues.add(issue);
    }

    /// Checks the technology for consistency and locks it.
    ///
    /// Inconsistencies are recorded as [`Technology::issues`] and logged;
    /// they never prevent the technology from being built.
    pub fn build(mut self) -> Technology {
        self.check_contacts();
        self.check_transistors();
        self.check_unused_layers();
        tracing::debug!(
            tech = %self.name,
            layers = self.layers.len(),
            arcs = self.arcs.len(),
            nodes = self.nodes.len(),
            foundries = self.foundries.len(),
            issues = self.issues.len(),
            "built technology"
        );
        Technology(self)
    }

    fn check_contacts(&mut self) {
        let mut found = Vec::new();
        for node in self.nodes.iter() {
            if node.function != NodeFunction::Contact {
                continue;
            }
            let node_layers: HashSet<LayerId> = node
                .layers
                .iter()
                .map(|l| self.layers[l.layer.0].non_pseudo)
                .collect();
            for arc in node.ports.iter().flat_map(|p| p.connections.iter()) {
                let arc = &self.arcs[arc.0];
                let connected = arc
                    .layers
                    .iter()
                    .any(|l| node_layers.contains(&self.layers[l.layer.0].non_pseudo));
                if !connected {
                    found.push(Cause::ContactLayerMismatch {
                        node: node.name.clone(),
                        arc: arc.name.clone(),
                    });
                }
            }
        }
        for cause in found {
            self.record_issue(cause, Severity::Warning);
        }
    }

    fn check_transistors(&mut self) {
        let mut found = Vec::new();
        for node in self.nodes.iter() {
            if !node.function.is_transistor() {
                continue;
            }
            if node.ports.len() != 4 {
                found.push(Cause::TransistorPortCount {
                    node: node.name.clone(),
                    found: node.ports.len(),
                });
                continue;
            }
            let out_of_order = node.ports.iter().enumerate().find(|(i, port)| {
                let is_gate = !port.connections.is_empty()
                    && port
                        .connections
                        .iter()
                        .all(|a| self.arcs[a.0].function.is_poly());
                is_gate != (i % 2 == 0)
            });
            if let Some((_, port)) = out_of_order {
                found.push(Cause::TransistorPortOrder {
                    node: node.name.clone(),
                    port: port.name.clone(),
                });
            }
        }
        for cause in found {
            self.record_issue(cause, Severity::Warning);
        }
    }

    fn check_unused_layers(&mut self) {
        let mut used = vec![false; self.layers.len()];
        for arc in self.arcs.iter() {
            for l in arc.layers.iter() {
                used[l.layer.0] = true;
            }
        }
        for node in self.nodes.iter() {
            let electrical = node.electrical_layers.iter().flatten();
            for l in node.layers.iter().chain(electrical) {
                used[l.layer.0] = true;
            }
        }
        let unused: Vec<ArcStr> = self
            .layers
            .iter()
            .filter(|l| !used[l.id.0])
            .map(|l| l.name.clone())
            .collect();
        for layer in unused {
            self.record_issue(Cause::UnusedLayer { layer }, Severity::Info);
        }
    }

    /// The technology name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The technology-wide settings.
    #[inline]
    pub fn settings(&self) -> &TechSettings {
        &self.settings
    }

    /// The negating bubble diameter, in grid units.
    #[inline]
    pub fn bubble_size(&self) -> i64 {
        self.bubble_size
    }

    /// The arrow length, in grid units.
    #[inline]
    pub fn arrow_length(&self) -> i64 {
        self.arrow_length
    }

    /// The parameter state this technology was built for.
    #[inline]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Every layer, by index.
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Looks up a layer by id.
    #[inline]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0)
    }

    /// Looks up a layer by name.
    pub fn find_layer(&self, name: &str) -> Option<&Layer> {
        self.layer(*self.layer_names.get(name)?)
    }

    /// Every layer, from lowest to highest.
    ///
    /// Layers of equal height keep their registration order.
    pub fn layers_by_height(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.layers.iter().collect();
        layers.sort_by(|a, b| a.height.total_cmp(&b.height));
        layers
    }

    /// Every arc template, by index.
    #[inline]
    pub fn arcs(&self) -> &[ArcTemplate] {
        &self.arcs
    }

    /// Looks up an arc template by id.
    #[inline]
    pub fn arc(&self, id: ArcId) -> Option<&ArcTemplate> {
        self.arcs.get(id.0)
    }

    /// Looks up an arc template by name.
    pub fn find_arc(&self, name: &str) -> Option<&ArcTemplate> {
        self.arc(*self.arc_names.get(name)?)
    }

    /// Every node template, by index.
    #[inline]
    pub fn nodes(&self) -> &[NodeTemplate] {
        &self.nodes
    }

    /// Looks up a node template by id.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&NodeTemplate> {
        self.nodes.get(id.0)
    }

    /// Looks up a node template by name.
    pub fn find_node(&self, name: &str) -> Option<&NodeTemplate> {
        self.node(*self.node_names.get(name)?)
    }

    /// Every foundry.
    pub fn foundries(&self) -> impl Iterator<Item = &Foundry> {
        self.foundries.values()
    }

    /// Looks up a foundry by name.
    pub fn foundry(&self, name: &str) -> Option<&Foundry> {
        self.foundries.get(name)
    }

    /// The current name of a layer once called `old`.
    pub fn convert_old_layer_name(&self, old: &str) -> Option<&ArcStr> {
        self.old_layer_names.get(old)
    }

    /// The current name of an arc once called `old`.
    pub fn convert_old_arc_name(&self, old: &str) -> Option<&ArcStr> {
        self.old_arc_names.get(old)
    }

    /// The current name of a node once called `old`.
    pub fn convert_old_node_name(&self, old: &str) -> Option<&ArcStr> {
        self.old_node_names.get(old)
    }

    /// Issues recorded while building this technology.
    #[inline]
    pub fn issues(&self) -> &IssueSet<TechIssue> {
        &self.issues
    }
}

impl Technology {
    /// Computes the polygons of a placed node with a fresh [`ShapeBuilder`].
    pub fn node_shapes(&self, inst: &NodeInst, opts: &ShapeOptions) -> Result<Vec<ShapeElement>> {
        ShapeBuilder::new().node_shapes(self, inst, opts)
    }

    /// Computes the polygons of a placed arc with a fresh [`ShapeBuilder`].
    pub fn arc_shapes(&self, inst: &ArcInst, opts: &ShapeOptions) -> Result<Vec<ShapeElement>> {
        ShapeBuilder::new().arc_shapes(self, inst, opts)
    }

    /// Builds the size correction table for a file version.
    pub fn size_corrector(&self, version: FileVersion) -> SizeCorrector {
        SizeCorrector::new(self, version)
    }
}
