//! SCMOS pins, pure-layer nodes and contacts.

use arcstr::ArcStr;
use geometry::prelude::*;
use technology::error::EntryKind;
use technology::prelude::*;

use crate::arcs::Arcs;
use crate::layers::{Layers, PinLayers, ScmosLayer};
use crate::{Params, MAX_METALS};

/// The cut rule of poly and active contacts.
fn contact_cut() -> Result<CutRule> {
    Ok(CutRule::from_lambda(2., 2., 3.)?)
}

/// The cut rule of metal vias.
fn via_cut() -> Result<CutRule> {
    Ok(CutRule::from_lambda(2., 3., 3.)?)
}

fn pin(name: impl Into<ArcStr>, size: f64, layer: LayerId, arc: ArcId, port: &str) -> NodeSpec {
    NodeSpec::new(
        name,
        NodeFunction::Pin,
        (size, size),
        [NodeLayer::inset_box(layer, 0).with_port(0)],
    )
    .port(PrimitivePort::new(port, [arc], 0))
}

pub(crate) fn register_pins(
    b: &mut TechnologyBuilder,
    pins: &PinLayers,
    arcs: &Arcs,
    params: &Params,
) -> Result<()> {
    for (level, (&layer, &arc)) in (1..=MAX_METALS).zip(pins.metals.iter().zip(arcs.metals.iter())) {
        let size = b.arc(arc).map(|a| 2. * grid_to_lambda(a.base_extend())).unwrap_or(3.);
        b.add_node(
            pin(arcstr::format!("metal-{}-pin", level), size, layer, arc, "metal")
                .not_used(level > params.num_metals),
        )?;
    }
    b.add_node(pin("polysilicon-1-pin", 2., pins.poly1, arcs.poly1, "poly"))?;
    b.add_node(
        pin("polysilicon-2-pin", 3., pins.poly2, arcs.poly2, "poly").not_used(!params.second_poly),
    )?;
    b.add_node(pin("p-active-pin", 3., pins.p_active, arcs.p_active, "active"))?;
    b.add_node(pin("n-active-pin", 3., pins.n_active, arcs.n_active, "active"))?;
    Ok(())
}

/// Registers a pure-layer node for every layer.
///
/// Each node holds an outline and connects to the arcs drawn on its layer.
pub(crate) fn register_pure_layer_nodes(
    b: &mut TechnologyBuilder,
    layers: &Layers,
    params: &Params,
) -> Result<()> {
    for &layer in ScmosLayer::ALL {
        let id = layers.id(layer);
        let connections: Vec<ArcId> = b
            .arcs()
            .iter()
            .filter(|arc| arc.layers().iter().any(|l| l.layer() == id))
            .map(|arc| arc.id())
            .collect();
        let not_used = match layer {
            ScmosLayer::Poly2 => !params.second_poly,
            _ => (1..=MAX_METALS).any(|level| {
                level > params.num_metals
                    && (ScmosLayer::metal(level) == Some(layer)
                        || ScmosLayer::via(level - 1) == Some(layer))
            }),
        };
        b.add_node(
            NodeSpec::new(
                arcstr::format!("{}-node", layer.name()),
                NodeFunction::Node,
                (3., 3.),
                [NodeLayer::inset_box(id, 0).with_port(0)],
            )
            .port(PrimitivePort::new(layer.name(), connections, 0))
            .holds_outline()
            .not_used(not_used),
        )?;
    }
    Ok(())
}

/// A square contact: conductors inset from the edge, and a cut array.
struct Contact<'a> {
    name: ArcStr,
    size: f64,
    surround: f64,
    conductors: &'a [(LayerId, f64)],
    cut: LayerId,
    cut_inset: f64,
    rule: CutRule,
    arcs: &'a [ArcId],
}

impl Contact<'_> {
    fn spec(&self) -> Result<NodeSpec> {
        let mut layers = self
            .conductors
            .iter()
            .map(|&(layer, inset)| Ok(NodeLayer::inset_box(layer, lambda_to_grid_size(inset)?).with_port(0)))
            .collect::<Result<Vec<_>>>()?;
        layers.push(NodeLayer::new(
            self.cut,
            Representation::MultiCutBox {
                corners: TechPoint::indented(lambda_to_grid_size(self.cut_inset)?),
                rule: self.rule,
            },
        ));
        let s = self.surround;
        Ok(
            NodeSpec::new(self.name.clone(), NodeFunction::Contact, (self.size, self.size), layers)
                .size_offset(s, s, s, s)
                .port(PrimitivePort::new("contact", self.arcs.iter().copied(), 0)),
        )
    }
}

pub(crate) fn register_contacts(
    b: &mut TechnologyBuilder,
    layers: &Layers,
    arcs: &Arcs,
    params: &Params,
) -> Result<()> {
    let metal1 = arcs.metal(1).ok_or_else(|| Error::NotFound {
        tech: b.name().clone(),
        kind: EntryKind::Arc,
        name: arcstr::literal!("metal-1"),
    })?;
    let poly_contacts = [
        (layers.poly1, arcs.poly1, 1, true),
        (layers.poly2, arcs.poly2, 2, params.second_poly),
    ];
    for (poly, poly_arc, level, used) in poly_contacts {
        let contact = Contact {
            name: arcstr::format!("metal-1-polysilicon-{}-con", level),
            size: 5.,
            surround: 0.,
            conductors: &[(layers.metal1, 0.5), (poly, 0.)],
            cut: layers.poly_cut,
            cut_inset: 2.5,
            rule: contact_cut()?,
            arcs: &[metal1, poly_arc],
        };
        b.add_node(contact.spec()?.not_used(!used))?;
    }

    let active_contacts = [
        ("p", layers.p_active, layers.p_select, layers.n_well, arcs.p_active),
        ("n", layers.n_active, layers.n_select, layers.p_well, arcs.n_active),
    ];
    for (kind, active, select, well, active_arc) in active_contacts {
        let contact = Contact {
            name: arcstr::format!("metal-1-{}-active-con", kind),
            size: 15.,
            surround: 5.5,
            conductors: &[(layers.metal1, 6.), (active, 5.5), (select, 4.), (well, 0.)],
            cut: layers.active_cut,
            cut_inset: 6.5,
            rule: contact_cut()?,
            arcs: &[metal1, active_arc],
        };
        b.add_node(contact.spec()?)?;
    }

    for level in 1..MAX_METALS {
        let (Some(lower), Some(upper), Some(via)) = (
            ScmosLayer::metal(level),
            ScmosLayer::metal(level + 1),
            ScmosLayer::via(level),
        ) else {
            continue;
        };
        let (Some(lower_arc), Some(upper_arc)) = (arcs.metal(level), arcs.metal(level + 1)) else {
            continue;
        };
        let contact = Contact {
            name: arcstr::format!("metal-{}-metal-{}-con", level, level + 1),
            size: 5.,
            surround: 0.,
            conductors: &[(layers.id(lower), 0.5), (layers.id(upper), 0.5)],
            cut: layers.id(via),
            cut_inset: 2.5,
            rule: via_cut()?,
            arcs: &[lower_arc, upper_arc],
        };
        b.add_node(contact.spec()?.not_used(level + 1 > params.num_metals))?;
    }
    Ok(())
}
