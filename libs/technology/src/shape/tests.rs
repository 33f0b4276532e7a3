use approx::assert_abs_diff_eq;
use geometry::prelude::*;
use test_log::test;

use super::multicut::MultiCutData;
use super::node::split_trace;
use super::*;
use crate::arc::{ArcFunction, ArcId, ArcSpec};
use crate::edge::{EdgeExpr, TechPoint};
use crate::function::{Function, FunctionExtras};
use crate::instance::{ArcInst, Arrows, CutAlignment, NodeInst, NodeOverrides};
use crate::layer::{LayerFilter, LayerSpec};
use crate::node::{
    CutRule, NodeFunction, NodeId, NodeLayer, NodeSpec, PrimitivePort, Representation,
    SerpentineExtent,
};
use crate::tech::{TechSettings, TechnologyBuilder};

struct Fixture {
    tech: Technology,
    metal: LayerId,
    cut: LayerId,
    active: LayerId,
    field_poly: LayerId,
    m1_arc: ArcId,
    wire: ArcId,
    metal_box: NodeId,
    contact: NodeId,
    diff: NodeId,
    transistor: NodeId,
    cnt: NodeId,
    outline: NodeId,
    triangle: NodeId,
}

fn fixture() -> Fixture {
    let mut b = TechnologyBuilder::new("fixture");
    b.set_settings(TechSettings {
        bubble_size: 1.,
        ..Default::default()
    })
    .unwrap();
    let metal = b
        .add_layer(LayerSpec::new("metal-1", Function::Metal(1)))
        .unwrap();
    let cut = b
        .add_layer(LayerSpec::new("contact", Function::Contact(1)))
        .unwrap();
    let active = b.add_layer(LayerSpec::new("active", Function::Diff)).unwrap();
    let gate = b
        .add_layer(
            LayerSpec::new("gate-poly", Function::Poly(1))
                .extras(FunctionExtras::INSIDE_TRANSISTOR),
        )
        .unwrap();
    let field_poly = b.add_layer(LayerSpec::new("poly", Function::Poly(1))).unwrap();
    let tubes = b
        .add_layer(LayerSpec::new("nanotube", Function::Nanotube))
        .unwrap();
    let art = b.add_layer(LayerSpec::new("art", Function::Art)).unwrap();

    let m1_arc = b
        .add_arc(ArcSpec::new(
            "metal-1",
            ArcFunction::Metal(1),
            [(metal, Style::Filled, 0.5)],
        ))
        .unwrap();
    let wire = b
        .add_arc(
            ArcSpec::new("wire", ArcFunction::Wire, [(art, Style::Filled, 0.)]).directional(true),
        )
        .unwrap();
    let poly_arc = b
        .add_arc(ArcSpec::new(
            "poly",
            ArcFunction::Poly(1),
            [(field_poly, Style::Filled, 0.5)],
        ))
        .unwrap();
    let active_arc = b
        .add_arc(ArcSpec::new(
            "active",
            ArcFunction::Diff,
            [(active, Style::Filled, 0.5)],
        ))
        .unwrap();

    let metal_box = b
        .add_node(NodeSpec::new(
            "metal-box",
            NodeFunction::Node,
            (4., 2.),
            [NodeLayer::inset_box(metal, 0)],
        ))
        .unwrap();
    let contact = b
        .add_node(
            NodeSpec::new(
                "contact",
                NodeFunction::Contact,
                (1., 1.),
                [
                    NodeLayer::inset_box(metal, 0).with_port(0),
                    NodeLayer::new(
                        cut,
                        Representation::MultiCutBox {
                            corners: TechPoint::full_box(),
                            rule: CutRule::new(Dims::square(4), 2, 3),
                        },
                    ),
                ],
            )
            .port(PrimitivePort::new("m1", [m1_arc], 0)),
        )
        .unwrap();
    let half = |lo: f64, hi: f64| {
        Representation::Box([
            TechPoint::new(EdgeExpr::new(lo, 0), EdgeExpr::low(0)),
            TechPoint::new(EdgeExpr::new(hi, 0), EdgeExpr::high(0)),
        ])
    };
    let diff = b
        .add_node(
            NodeSpec::new(
                "diff",
                NodeFunction::Node,
                (4., 2.),
                [NodeLayer::inset_box(active, 0)],
            )
            .port(PrimitivePort::new("left", [active_arc], 0))
            .port(PrimitivePort::new("right", [active_arc], 1))
            .electrical_layers([
                NodeLayer::new(active, half(-0.5, 0.)).with_port(0),
                NodeLayer::new(active, half(0., 0.5)).with_port(1),
            ]),
        )
        .unwrap();
    let transistor = b
        .add_node(
            NodeSpec::new(
                "transistor",
                NodeFunction::TransistorN,
                (3., 2.),
                [
                    NodeLayer::inset_box(gate, 0)
                        .with_port(0)
                        .with_serpentine(SerpentineExtent::new(200, 200, 0, 0)),
                    NodeLayer::inset_box(field_poly, 0)
                        .with_serpentine(SerpentineExtent::new(200, 200, 400, 400)),
                    NodeLayer::inset_box(active, 100)
                        .with_port(1)
                        .with_serpentine(SerpentineExtent::new(600, 600, 0, 0)),
                ],
            )
            .port(PrimitivePort::new("g", [poly_arc], 0))
            .port(PrimitivePort::new("s", [active_arc], 1))
            .port(PrimitivePort::new("g2", [poly_arc], 0))
            .port(PrimitivePort::new("d", [active_arc], 2))
            .serpentine(1.),
        )
        .unwrap();
    let cnt = b
        .add_node(NodeSpec::new(
            "cnt",
            NodeFunction::TransistorCntN,
            (19. / 4., 1.),
            [NodeLayer::inset_box(tubes, 0).as_nanotube()],
        ))
        .unwrap();
    let outline = b
        .add_node(
            NodeSpec::new(
                "outline",
                NodeFunction::Art,
                (2., 2.),
                [NodeLayer::inset_box(art, 0).with_style(Style::Closed)],
            )
            .holds_outline(),
        )
        .unwrap();
    let triangle = b
        .add_node(NodeSpec::new(
            "triangle",
            NodeFunction::Art,
            (2., 2.),
            [NodeLayer::new(
                art,
                Representation::Points(vec![
                    TechPoint::new(EdgeExpr::low(0), EdgeExpr::low(0)),
                    TechPoint::new(EdgeExpr::high(0), EdgeExpr::low(0)),
                    TechPoint::new(EdgeExpr::center(0), EdgeExpr::high(0)),
                ]),
            )],
        ))
        .unwrap();

    Fixture {
        tech: b.build(),
        metal,
        cut,
        active,
        field_poly,
        m1_arc,
        wire,
        metal_box,
        contact,
        diff,
        transistor,
        cnt,
        outline,
        triangle,
    }
}

fn lambda(x: f64, y: f64) -> FPoint {
    FPoint::new(x, y)
}

fn area(lo: (f64, f64), hi: (f64, f64)) -> (FPoint, FPoint) {
    (FPoint::new(lo.0, lo.1), FPoint::new(hi.0, hi.1))
}

#[test]
fn multicut_ten_by_ten() {
    let rule = CutRule::new(Dims::square(4), 2, 3);
    let (lo, hi) = area((0., 0.), (10., 10.));
    let data = MultiCutData::new(lo, hi, &rule, None, CutAlignment::Centered);
    assert_eq!((data.cuts_x(), data.cuts_y()), (2, 2));
    assert_eq!(data.cuts_total(), 4);
    assert_eq!(data.cuts_reasonable(), 4);
    assert_eq!(data.separation(), 3.);
}

#[test]
fn multicut_counts_are_consistent() {
    for size in 1..6 {
        for sep_1d in 0..4 {
            for sep_2d in sep_1d..6 {
                let rule = CutRule::new(Dims::square(size), sep_1d, sep_2d);
                for w in -5..40 {
                    for h in -5..40 {
                        let (lo, hi) = area((0., 0.), (w as f64, h as f64));
                        let data = MultiCutData::new(lo, hi, &rule, None, CutAlignment::Centered);
                        assert!(data.cuts_x() >= 1 && data.cuts_y() >= 1);
                        assert_eq!(data.cuts_total(), data.cuts_x() * data.cuts_y());
                        assert!(data.cuts_reasonable() <= data.cuts_total());
                        if data.cuts_x() <= 2 || data.cuts_y() <= 2 {
                            assert_eq!(data.cuts_reasonable(), data.cuts_total());
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn multicut_perimeter_comes_first() {
    let rule = CutRule::new(Dims::square(4), 2, 2);
    for (w, h) in [(12., 12.), (18., 12.), (12., 24.), (30., 30.)] {
        let (lo, hi) = area((0., 0.), (w, h));
        let data = MultiCutData::new(lo, hi, &rule, None, CutAlignment::Centered);
        let (nx, ny) = (data.cuts_x(), data.cuts_y());
        assert!(nx > 2 && ny > 2);

        let mut seen = vec![false; nx * ny];
        for i in 0..data.cuts_total() {
            let (x, y) = data.position(i);
            assert!(!seen[y * nx + x], "position ({x}, {y}) emitted twice");
            seen[y * nx + x] = true;
            let perimeter = x == 0 || x == nx - 1 || y == 0 || y == ny - 1;
            assert_eq!(perimeter, i < data.cuts_reasonable(), "cut {i} at ({x}, {y})");
        }
        assert!(seen.into_iter().all(|s| s));
    }
}

#[test]
fn multicut_two_dimensional_rule_collapses_to_line() {
    let rule = CutRule::new(Dims::square(4), 2, 3);
    let (lo, hi) = area((0., 0.), (20., 6.));
    let data = MultiCutData::new(lo, hi, &rule, None, CutAlignment::Centered);
    assert_eq!((data.cuts_x(), data.cuts_y()), (4, 1));
    assert_eq!(data.separation(), 2.);

    let (lo, hi) = area((0., 0.), (6., 6.));
    let rule = CutRule::new(Dims::square(2), 1, 5);
    let data = MultiCutData::new(lo, hi, &rule, None, CutAlignment::Centered);
    // Equal sides keep the vertical line.
    assert_eq!((data.cuts_x(), data.cuts_y()), (1, 3));
}

#[test]
fn multicut_spacing_override_replaces_both_separations() {
    let rule = CutRule::new(Dims::square(4), 2, 3);
    let (lo, hi) = area((0., 0.), (12., 12.));
    let data = MultiCutData::new(lo, hi, &rule, Some(8), CutAlignment::Centered);
    assert_eq!((data.cuts_x(), data.cuts_y()), (2, 2));
    assert_eq!(data.separation(), 8.);
}

#[test]
fn multicut_inverted_area_has_one_cut() {
    let rule = CutRule::new(Dims::square(4), 2, 3);
    let (lo, hi) = area((5., 5.), (-5., -5.));
    let data = MultiCutData::new(lo, hi, &rule, None, CutAlignment::Centered);
    assert_eq!(data.cuts_total(), 1);
    assert_eq!(data.cut_center(0), FPoint::zero());
}

fn row_centers(n: usize, alignment: CutAlignment) -> Vec<f64> {
    let rule = CutRule::new(Dims::square(4), 2, 2);
    let a = 6. * (n as f64 - 1.) + 3.;
    let (lo, hi) = area((-a / 2., 0.), (a / 2., 0.));
    let data = MultiCutData::new(lo, hi, &rule, None, alignment);
    assert_eq!((data.cuts_x(), data.cuts_y()), (n, 1));
    (0..n).map(|i| data.cut_center(i).x).collect()
}

#[test]
fn multicut_alignment_even_and_odd_counts() {
    assert_eq!(row_centers(2, CutAlignment::Centered), vec![-3., 3.]);
    assert_eq!(row_centers(3, CutAlignment::Centered), vec![-6., 0., 6.]);

    assert_eq!(row_centers(2, CutAlignment::Spread), vec![-4.5, 4.5]);
    assert_eq!(row_centers(3, CutAlignment::Spread), vec![-7.5, 0., 7.5]);
    assert_eq!(
        row_centers(4, CutAlignment::Spread),
        vec![-10.5, -4.5, 4.5, 10.5]
    );
    assert_eq!(
        row_centers(5, CutAlignment::Spread),
        vec![-13.5, -7.5, 0., 7.5, 13.5]
    );

    assert_eq!(row_centers(2, CutAlignment::Corner), vec![-4.5, 1.5]);
    assert_eq!(row_centers(3, CutAlignment::Corner), vec![-7.5, -1.5, 4.5]);
}

#[test]
fn box_evaluation_is_deterministic() {
    let f = fixture();
    let template = f.tech.node(f.metal_box).unwrap();
    let a = NodeInst::new(template, Point::new(0, 0));
    let b = NodeInst::with_size(f.metal_box, Point::new(400, 400), Dims::new(4000, 400));
    let opts = ShapeOptions::default();
    let mut builder = ShapeBuilder::new();

    let first = builder.node_shapes(&f.tech, &a, &opts).unwrap();
    let other = builder.node_shapes(&f.tech, &b, &opts).unwrap();
    let second = builder.node_shapes(&f.tech, &a, &opts).unwrap();
    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(
        first[0].polygon.points(),
        &[lambda(-2., -1.), lambda(2., -1.), lambda(2., 1.), lambda(-2., 1.)]
    );
}

#[test]
fn zero_size_box_is_degenerate_not_an_error() {
    let f = fixture();
    let inst = NodeInst::with_size(f.metal_box, Point::zero(), Dims::default());
    let shapes = f.tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].polygon.area(), 0.);
}

#[test]
fn points_layer_follows_size() {
    let f = fixture();
    let inst = NodeInst::with_size(f.triangle, Point::zero(), Dims::new(800, 400));
    let shapes = f.tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(
        shapes[0].polygon.points(),
        &[lambda(-1., -0.5), lambda(1., -0.5), lambda(0., 0.5)]
    );
}

#[test]
fn orientation_rotates_about_center() {
    let f = fixture();
    let template = f.tech.node(f.metal_box).unwrap();
    let inst = NodeInst::new(template, Point::new(4000, 0)).oriented(NamedOrientation::R90);
    let shapes = f.tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    let bbox = shapes[0].polygon.bbox().unwrap();
    assert_abs_diff_eq!(bbox.left(), 9., epsilon = 1e-12);
    assert_abs_diff_eq!(bbox.right(), 11., epsilon = 1e-12);
    assert_abs_diff_eq!(bbox.bot(), -2., epsilon = 1e-12);
    assert_abs_diff_eq!(bbox.top(), 2., epsilon = 1e-12);
}

#[test]
fn electrical_layers_split_by_port() {
    let f = fixture();
    let template = f.tech.node(f.diff).unwrap();
    let inst = NodeInst::new(template, Point::zero());

    let drawn = f.tech.node_shapes(&inst, &ShapeOptions::drawing()).unwrap();
    assert_eq!(drawn.len(), 1);
    assert_eq!(drawn[0].port, None);

    let electrical = f.tech.node_shapes(&inst, &ShapeOptions::electrical()).unwrap();
    assert_eq!(electrical.len(), 2);
    assert_eq!(electrical[0].port, Some(0));
    assert_eq!(electrical[1].port, Some(1));
    assert!(electrical.iter().all(|s| s.layer == f.active));
    assert_eq!(
        electrical[0].polygon.bbox(),
        Some(Rect::from_sides(-2., -1., 0., 1.))
    );
}

#[test]
fn contact_cuts_and_reasonable_mode() {
    let f = fixture();
    let inst = NodeInst::with_size(f.contact, Point::zero(), Dims::new(30, 30));
    let full = f.tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    let cuts: Vec<_> = full.iter().filter(|s| s.layer == f.cut).collect();
    // Area 30, pitch 7 with the array rule: five cuts per side.
    assert_eq!(cuts.len(), 25);

    let opts = ShapeOptions::builder().reasonable(true).build().unwrap();
    let reasonable = f.tech.node_shapes(&inst, &opts).unwrap();
    let perimeter: Vec<_> = reasonable.iter().filter(|s| s.layer == f.cut).collect();
    assert_eq!(perimeter.len(), 16);
    for (a, b) in perimeter.iter().zip(cuts.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn filter_skips_layers_and_override_relabels() {
    let f = fixture();
    let inst = NodeInst::with_size(f.contact, Point::zero(), Dims::new(10, 10));
    let opts = ShapeOptions::builder()
        .filter(LayerFilter::functions([Function::Metal(1)]))
        .build()
        .unwrap();
    let shapes = f.tech.node_shapes(&inst, &opts).unwrap();
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].layer, f.metal);

    let opts = ShapeOptions::builder()
        .layer_override(f.field_poly)
        .build()
        .unwrap();
    let shapes = f.tech.node_shapes(&inst, &opts).unwrap();
    assert_eq!(shapes.len(), 5);
    assert!(shapes.iter().all(|s| s.layer == f.field_poly));
}

#[test]
fn serpentine_follows_trace() {
    let f = fixture();
    let template = f.tech.node(f.transistor).unwrap();
    let inst = NodeInst::new(template, Point::new(400, 0)).traced_points([
        Point::new(0, 0),
        Point::new(0, 2000),
        Point::new(2000, 2000),
    ]);
    let shapes = f.tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();

    // Gate outline, two field-poly caps, active outline.
    assert_eq!(shapes.len(), 4);
    let gate = &shapes[0].polygon;
    assert_eq!(gate.len(), 6);
    // Outer corner of the bend at (-0.5, 5.5) lambda relative to the center.
    assert_abs_diff_eq!(gate.points()[1].x, 1. - 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(gate.points()[1].y, 5.5, epsilon = 1e-9);
    assert_abs_diff_eq!(gate.points()[4].x, 1. + 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(gate.points()[4].y, 4.5, epsilon = 1e-9);

    let caps: Vec<_> = shapes.iter().filter(|s| s.layer == f.field_poly).collect();
    assert_eq!(caps.len(), 2);
    assert!(caps.iter().all(|c| c.polygon.len() == 4));
    let start = caps[0].polygon.bbox().unwrap();
    assert_abs_diff_eq!(start.bot(), -1., epsilon = 1e-9);
    assert_abs_diff_eq!(start.top(), 0., epsilon = 1e-9);

    assert_eq!(shapes[3].layer, f.active);
    assert_eq!(shapes[3].polygon.len(), 6);
}

#[test]
fn serpentine_length_override() {
    let f = fixture();
    let template = f.tech.node(f.transistor).unwrap();
    let overrides = NodeOverrides::builder()
        .serpentine_length(800)
        .build()
        .unwrap();
    let inst = NodeInst::new(template, Point::zero())
        .traced_points([Point::new(0, 0), Point::new(4000, 0)])
        .with_overrides(overrides);
    let opts = ShapeOptions::builder()
        .filter(LayerFilter::default().requiring(FunctionExtras::INSIDE_TRANSISTOR))
        .build()
        .unwrap();
    let shapes = f.tech.node_shapes(&inst, &opts).unwrap();
    assert_eq!(shapes.len(), 1);
    // Default length 1 lambda, override 2 lambda: each side grows by half a lambda.
    assert_eq!(
        shapes[0].polygon.bbox(),
        Some(Rect::from_sides(0., -1., 10., 1.))
    );
}

#[test]
fn serpentine_without_trace_uses_boxes() {
    let f = fixture();
    let template = f.tech.node(f.transistor).unwrap();
    let inst = NodeInst::new(template, Point::zero());
    let shapes = f.tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 3);
    assert!(shapes.iter().all(|s| s.polygon.as_rect().is_some()));
}

#[test]
fn nanotube_rails() {
    let f = fixture();
    let template = f.tech.node(f.cnt).unwrap();
    let inst = NodeInst::new(template, Point::zero());
    let shapes = f.tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 10);
    let first = shapes[0].polygon.bbox().unwrap();
    assert_abs_diff_eq!(first.left(), -19. / 8., epsilon = 1e-12);
    assert_abs_diff_eq!(first.width(), 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(first.height(), 1., epsilon = 1e-12);

    let overrides = NodeOverrides::builder().tube_count(3).build().unwrap();
    let inst = inst.with_overrides(overrides);
    let shapes = f.tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 3);
}

#[test]
fn outline_trace_pieces() {
    let f = fixture();
    let template = f.tech.node(f.outline).unwrap();
    let inst = NodeInst::new(template, Point::new(400, 400)).traced([
        Some(Point::new(0, 0)),
        Some(Point::new(400, 0)),
        Some(Point::new(400, 400)),
        None,
        Some(Point::new(800, 0)),
        Some(Point::new(800, 0)),
        Some(Point::new(1200, 0)),
    ]);
    let shapes = f.tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 2);
    assert!(shapes.iter().all(|s| s.style == Style::Closed));
    assert_eq!(
        shapes[0].polygon.points(),
        &[lambda(1., 1.), lambda(2., 1.), lambda(2., 2.)]
    );

    let opts = ShapeOptions::builder()
        .trace_breaks(TraceBreak::SentinelOrDuplicate)
        .build()
        .unwrap();
    let shapes = f.tech.node_shapes(&inst, &opts).unwrap();
    assert_eq!(shapes.len(), 3);
    assert_eq!(shapes[2].polygon.points(), &[lambda(4., 1.)]);
}

#[test]
fn split_trace_skips_empty_pieces() {
    let trace = [None, Some(Point::new(1, 1)), None, None];
    let pieces = split_trace(&trace, TraceBreak::Sentinel);
    assert_eq!(pieces, vec![vec![FPoint::new(1., 1.)]]);
}

#[test]
fn arc_rectangle_with_extended_ends() {
    let f = fixture();
    let template = f.tech.arc(f.m1_arc).unwrap();
    let inst = ArcInst::new(template, Point::new(0, 0), Point::new(2000, 0));
    let shapes = f.tech.arc_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 1);
    assert_eq!(
        shapes[0].polygon.bbox(),
        Some(Rect::from_sides(-0.5, -0.5, 5.5, 0.5))
    );

    let inst = inst.extended(false, false).extend_over_min(200);
    let shapes = f.tech.arc_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(
        shapes[0].polygon.bbox(),
        Some(Rect::from_sides(0., -1., 5., 1.))
    );
}

#[test]
fn zero_width_arc_is_a_line() {
    let f = fixture();
    let template = f.tech.arc(f.wire).unwrap();
    let inst = ArcInst::new(template, Point::new(0, 0), Point::new(0, 800)).arrows(Arrows::default());
    let shapes = f.tech.arc_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].style, Style::Opened);
    assert_eq!(shapes[0].polygon.points(), &[lambda(0., 2.), lambda(0., 0.)]);
}

#[test]
fn negated_tail_moves_first_vertex() {
    let f = fixture();
    let template = f.tech.arc(f.m1_arc).unwrap();
    let inst = ArcInst::new(template, Point::new(0, 0), Point::new(4000, 0)).negated(false, true);
    let shapes = f.tech.arc_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes[0].style, Style::Opened);
    assert_eq!(shapes[0].polygon.points(), &[lambda(9., 0.), lambda(0., 0.)]);

    let bubble = &shapes[1];
    assert_eq!(bubble.style, Style::Circle);
    assert_eq!(bubble.polygon.points(), &[lambda(9.5, 0.), lambda(9., 0.)]);
}

#[test]
fn negated_tail_off_axis() {
    let f = fixture();
    let template = f.tech.arc(f.m1_arc).unwrap();
    let inst =
        ArcInst::new(template, Point::new(0, 0), Point::new(1200, 1600)).negated(false, true);
    let angle = inst.angle();
    let shapes = f.tech.arc_shapes(&inst, &ShapeOptions::default()).unwrap();
    let first = shapes[0].polygon.points()[0];
    let (cos, sin) = geometry::cos_sin(angle + 180.);
    assert_abs_diff_eq!(first.x, 3. + cos, epsilon = 1e-9);
    assert_abs_diff_eq!(first.y, 4. + sin, epsilon = 1e-9);
    assert_abs_diff_eq!(first.x, 2.4, epsilon = 1e-9);
    assert_abs_diff_eq!(first.y, 3.2, epsilon = 1e-9);
    assert_eq!(shapes[0].polygon.points()[1], lambda(0., 0.));
}

#[test]
fn directional_arc_arrows() {
    let f = fixture();
    let template = f.tech.arc(f.wire).unwrap();
    let inst = ArcInst::new(template, Point::new(0, 0), Point::new(4000, 0));
    let shapes = f.tech.arc_shapes(&inst, &ShapeOptions::default()).unwrap();
    // Line, body arrow, head chevron.
    assert_eq!(shapes.len(), 3);
    assert_eq!(shapes[1].style, Style::Vectors);
    assert_eq!(shapes[1].polygon.points(), &[lambda(0., 0.), lambda(10., 0.)]);
    let head = shapes[2].polygon.points();
    assert_eq!(head.len(), 4);
    assert_abs_diff_eq!(head[1].x, 3f64.sqrt() / 2., epsilon = 1e-12);
    assert_abs_diff_eq!(head[1].y, 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(head[3].y, -0.5, epsilon = 1e-12);

    let electrical = f.tech.arc_shapes(&inst, &ShapeOptions::electrical()).unwrap();
    assert_eq!(electrical.len(), 1);
}

#[test]
fn builders_run_in_parallel() {
    let f = fixture();
    let tech = &f.tech;
    let template = tech.node(f.contact).unwrap();
    let expected = tech
        .node_shapes(&NodeInst::new(template, Point::zero()), &ShapeOptions::default())
        .unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    let mut builder = ShapeBuilder::new();
                    (0..50)
                        .map(|_| {
                            builder
                                .node_shapes(
                                    tech,
                                    &NodeInst::new(template, Point::zero()),
                                    &ShapeOptions::default(),
                                )
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for shapes in handle.join().unwrap() {
                assert_eq!(shapes, expected);
            }
        }
    });
}

#[test]
fn unknown_template_is_not_found() {
    let f = fixture();
    let inst = NodeInst::with_size(NodeId(99), Point::zero(), Dims::default());
    assert!(matches!(
        f.tech.node_shapes(&inst, &ShapeOptions::default()),
        Err(crate::Error::NotFound { .. })
    ));
}
