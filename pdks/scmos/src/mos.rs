//! SCMOS transistors.

use technology::prelude::*;

use crate::arcs::Arcs;
use crate::layers::Layers;

/// The implant layers of one transistor flavor.
struct Flavor {
    name: &'static str,
    function: NodeFunction,
    active: LayerId,
    select: LayerId,
    well: LayerId,
    active_arc: ArcId,
}

fn bounded(lx: EdgeExpr, ly: EdgeExpr, hx: EdgeExpr, hy: EdgeExpr) -> Representation {
    Representation::Box([TechPoint::new(lx, ly), TechPoint::new(hx, hy)])
}

fn mos(layers: &Layers, arcs: &Arcs, flavor: &Flavor) -> NodeSpec {
    let gate = || {
        NodeLayer::new(
            layers.transistor_poly,
            bounded(
                EdgeExpr::center(-400),
                EdgeExpr::low(1600),
                EdgeExpr::center(400),
                EdgeExpr::high(1600),
            ),
        )
        .with_port(0)
        .with_serpentine(SerpentineExtent::new(400, 400, 0, 0))
    };
    let poly_top = || {
        NodeLayer::new(
            layers.poly1,
            bounded(
                EdgeExpr::center(-400),
                EdgeExpr::high(1600),
                EdgeExpr::center(400),
                EdgeExpr::high(800),
            ),
        )
        .with_port(0)
        .with_serpentine(SerpentineExtent::new(400, 400, 0, 800))
    };
    let poly_bottom = || {
        NodeLayer::new(
            layers.poly1,
            bounded(
                EdgeExpr::center(-400),
                EdgeExpr::low(800),
                EdgeExpr::center(400),
                EdgeExpr::low(1600),
            ),
        )
        .with_port(2)
        .with_serpentine(SerpentineExtent::new(400, 400, 800, 0))
    };
    let select = || {
        NodeLayer::new(flavor.select, Representation::Box(TechPoint::indented_xy(400, 800)))
            .with_serpentine(SerpentineExtent::new(1600, 1600, 800, 800))
    };
    let well = || {
        NodeLayer::new(flavor.well, Representation::Box(TechPoint::full_box()))
            .with_serpentine(SerpentineExtent::new(2000, 2000, 1600, 1600))
    };
    let active = NodeLayer::new(
        flavor.active,
        Representation::Box(TechPoint::indented_xy(800, 1600)),
    )
    .with_serpentine(SerpentineExtent::new(1200, 1200, 0, 0));
    let source = NodeLayer::new(
        flavor.active,
        bounded(
            EdgeExpr::low(800),
            EdgeExpr::low(1600),
            EdgeExpr::center(0),
            EdgeExpr::high(1600),
        ),
    )
    .with_port(1)
    .with_serpentine(SerpentineExtent::new(1200, 0, 0, 0));
    let drain = NodeLayer::new(
        flavor.active,
        bounded(
            EdgeExpr::center(0),
            EdgeExpr::low(1600),
            EdgeExpr::high(800),
            EdgeExpr::high(1600),
        ),
    )
    .with_port(3)
    .with_serpentine(SerpentineExtent::new(0, 1200, 0, 0));

    NodeSpec::new(
        arcstr::format!("{}-transistor", flavor.name),
        flavor.function,
        (10., 11.),
        [active, gate(), poly_top(), poly_bottom(), select(), well()],
    )
    .electrical_layers([
        source,
        drain,
        gate(),
        poly_top(),
        poly_bottom(),
        select(),
        well(),
    ])
    .port(PrimitivePort::new("poly-left", [arcs.poly1], 0))
    .port(PrimitivePort::new("diff-top", [flavor.active_arc], 1))
    .port(PrimitivePort::new("poly-right", [arcs.poly1], 0))
    .port(PrimitivePort::new("diff-bottom", [flavor.active_arc], 2))
    .serpentine(2.)
}

fn cnt(layers: &Layers, arcs: &Arcs) -> NodeSpec {
    NodeSpec::new(
        "cnt-transistor",
        NodeFunction::TransistorCntN,
        (9.5, 6.),
        [
            NodeLayer::new(
                layers.nanotube,
                Representation::Box(TechPoint::indented_xy(0, 400)),
            )
            .with_port(1)
            .as_nanotube(),
            NodeLayer::new(
                layers.transistor_poly,
                bounded(
                    EdgeExpr::low(0),
                    EdgeExpr::center(-400),
                    EdgeExpr::high(0),
                    EdgeExpr::center(400),
                ),
            )
            .with_port(0),
        ],
    )
    .port(PrimitivePort::new("gate-left", [arcs.poly1], 0))
    .port(PrimitivePort::new("tube-top", [arcs.nanotube], 1))
    .port(PrimitivePort::new("gate-right", [arcs.poly1], 0))
    .port(PrimitivePort::new("tube-bottom", [arcs.nanotube], 2))
}

pub(crate) fn register(b: &mut TechnologyBuilder, layers: &Layers, arcs: &Arcs) -> Result<()> {
    let flavors = [
        Flavor {
            name: "n",
            function: NodeFunction::TransistorN,
            active: layers.n_active,
            select: layers.n_select,
            well: layers.p_well,
            active_arc: arcs.n_active,
        },
        Flavor {
            name: "p",
            function: NodeFunction::TransistorP,
            active: layers.p_active,
            select: layers.p_select,
            well: layers.n_well,
            active_arc: arcs.p_active,
        },
    ];
    for flavor in &flavors {
        b.add_node(mos(layers, arcs, flavor))?;
    }
    b.add_node(cnt(layers, arcs))?;
    Ok(())
}
