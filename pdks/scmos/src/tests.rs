use approx::assert_abs_diff_eq;
use geometry::prelude::*;
use technology::prelude::*;
use test_log::test;

use crate::layers::ScmosLayer;
use crate::{Params, Scmos, MAX_METALS, NUM_METALS, SECOND_POLY};

fn assert_bbox(shape: &ShapeElement, left: f64, bot: f64, right: f64, top: f64) {
    let bbox = shape.polygon.bbox().unwrap();
    assert_abs_diff_eq!(bbox.left(), left, epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.bot(), bot, epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.right(), right, epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.top(), top, epsilon = 1e-9);
}

fn default_tech() -> std::sync::Arc<Technology> {
    TechHandle::new(Scmos).unwrap().current()
}

#[test]
fn default_build_is_consistent() {
    let tech = default_tech();
    assert_eq!(tech.name(), "scmos");
    assert!(tech.issues().is_empty(), "{:?}", tech.issues());
    assert_eq!(Params::from_state(tech.state()), Params::default());

    // Every real layer plus a pin layer for each arc-carrying conductor.
    assert_eq!(
        tech.layers().len(),
        ScmosLayer::ALL.len() + usize::from(MAX_METALS) + 4
    );
    assert!(tech.find_layer("pseudo-metal-1").unwrap().is_pseudo());
    assert_eq!(tech.arcs().len(), usize::from(MAX_METALS) + 5);
}

#[test]
fn mosis_maps_every_real_layer() {
    let tech = default_tech();
    let mosis = tech.foundry("mosis").unwrap();
    for layer in ScmosLayer::ALL {
        let id = tech.find_layer(layer.name()).unwrap().id();
        assert_eq!(mosis.gds_layer(id), Some(layer.gds()));
    }
    let pin = tech.find_layer("pseudo-metal-1").unwrap().id();
    assert_eq!(mosis.gds_layer(pin), None);
}

#[test]
fn parameters_toggle_unused_templates() {
    let handle = TechHandle::new(Scmos).unwrap();
    let tech = handle.current();
    assert!(!tech.find_arc("metal-4").unwrap().is_not_used());
    assert!(tech.find_arc("metal-5").unwrap().is_not_used());
    assert!(tech.find_arc("polysilicon-2").unwrap().is_not_used());
    assert!(!tech.find_node("metal-3-metal-4-con").unwrap().is_not_used());
    assert!(tech.find_node("metal-4-metal-5-con").unwrap().is_not_used());
    assert!(tech.find_node("via-4-node").unwrap().is_not_used());
    assert!(!tech.find_node("via-3-node").unwrap().is_not_used());
    assert!(tech.find_node("metal-5-pin").unwrap().is_not_used());

    let tech = handle.set_param(NUM_METALS, 2i64).unwrap();
    assert!(tech.find_arc("metal-3").unwrap().is_not_used());
    assert!(tech.find_node("metal-2-metal-3-con").unwrap().is_not_used());
    assert!(!tech.find_node("metal-1-metal-2-con").unwrap().is_not_used());

    let tech = handle.set_param(SECOND_POLY, true).unwrap();
    assert!(!tech.find_arc("polysilicon-2").unwrap().is_not_used());
    assert!(!tech.find_node("metal-1-polysilicon-2-con").unwrap().is_not_used());
    assert!(!tech.find_node("polysilicon-2-node").unwrap().is_not_used());
    // The earlier change is kept.
    assert_eq!(Params::from_state(tech.state()).num_metals, 2);

    assert!(handle.set_param(NUM_METALS, 7i64).is_err());
    assert!(handle.set_param(NUM_METALS, true).is_err());
    assert_eq!(Params::from_state(&handle.state()).num_metals, 2);
}

#[test]
fn top_metal_is_wider() {
    let tech = default_tech();
    let m1 = tech.find_arc("metal-1").unwrap();
    let m6 = tech.find_arc("metal-6").unwrap();
    assert_eq!(m1.base_extend(), 600);
    assert_eq!(m6.base_extend(), 1000);
    assert_eq!(tech.find_node("metal-1-pin").unwrap().default_size(), Dims::square(1200));
    assert_eq!(tech.find_node("metal-6-pin").unwrap().default_size(), Dims::square(2000));
}

#[test]
fn old_names() {
    let tech = default_tech();
    assert_eq!(
        tech.convert_old_node_name("metal-1-polysilicon-con").map(|s| s.as_str()),
        Some("metal-1-polysilicon-1-con")
    );
    assert_eq!(
        tech.convert_old_arc_name("polysilicon").map(|s| s.as_str()),
        Some("polysilicon-1")
    );
    assert_eq!(tech.convert_old_layer_name("metal-1"), None);
}

#[test]
fn poly_contact_shapes() {
    let tech = default_tech();
    let template = tech.find_node("metal-1-polysilicon-1-con").unwrap();
    let inst = NodeInst::new(template, Point::zero());
    let shapes = tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 3);
    assert_eq!(shapes[0].layer, tech.find_layer("metal-1").unwrap().id());
    assert_bbox(&shapes[0], -2., -2., 2., 2.);
    assert_bbox(&shapes[1], -2.5, -2.5, 2.5, 2.5);
    assert_eq!(shapes[2].layer, tech.find_layer("poly-cut").unwrap().id());
    assert_bbox(&shapes[2], -1., -1., 1., 1.);
}

#[test]
fn active_contact_grows_cuts() {
    let tech = default_tech();
    let template = tech.find_node("metal-1-n-active-con").unwrap();
    let cut = tech.find_layer("active-cut").unwrap().id();

    let inst = NodeInst::new(template, Point::zero());
    let shapes = tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 5);
    assert_bbox(&shapes[0], -1.5, -1.5, 1.5, 1.5);
    assert_bbox(&shapes[3], -7.5, -7.5, 7.5, 7.5);
    assert_bbox(&shapes[4], -1., -1., 1., 1.);

    let inst = NodeInst::with_size(template.id(), Point::zero(), Dims::square(8000));
    let shapes = tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    let cuts: Vec<_> = shapes.iter().filter(|s| s.layer == cut).collect();
    assert_eq!(cuts.len(), 4);
    for c in cuts {
        let bbox = c.polygon.bbox().unwrap();
        assert_abs_diff_eq!(bbox.width(), 2., epsilon = 1e-9);
        assert!(bbox.left() >= -3.5 - 1e-9 && bbox.right() <= 3.5 + 1e-9);
    }
}

#[test]
fn transistor_boxes() {
    let tech = default_tech();
    let template = tech.find_node("n-transistor").unwrap();
    assert!(template.is_serpentine());
    let inst = NodeInst::new(template, Point::zero());

    let shapes = tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 6);
    assert_eq!(shapes[0].layer, tech.find_layer("n-active").unwrap().id());
    assert_bbox(&shapes[0], -3., -1.5, 3., 1.5);
    assert_bbox(&shapes[1], -1., -1.5, 1., 1.5);
    assert_bbox(&shapes[2], -1., 1.5, 1., 3.5);
    assert_bbox(&shapes[3], -1., -3.5, 1., -1.5);
    assert_bbox(&shapes[4], -4., -3.5, 4., 3.5);
    assert_bbox(&shapes[5], -5., -5.5, 5., 5.5);
    assert_eq!(shapes[5].layer, tech.find_layer("p-well").unwrap().id());

    let shapes = tech.node_shapes(&inst, &ShapeOptions::electrical()).unwrap();
    assert_eq!(shapes.len(), 7);
    assert_eq!(shapes[0].port, Some(1));
    assert_bbox(&shapes[0], -3., -1.5, 0., 1.5);
    assert_eq!(shapes[1].port, Some(3));
    assert_bbox(&shapes[1], 0., -1.5, 3., 1.5);
}

#[test]
fn p_transistor_uses_n_well() {
    let tech = default_tech();
    let template = tech.find_node("p-transistor").unwrap();
    let inst = NodeInst::new(template, Point::zero());
    let shapes = tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
    let n_well = tech.find_layer("n-well").unwrap().id();
    assert_eq!(shapes.last().unwrap().layer, n_well);
}

#[test]
fn serpentine_transistor() {
    let tech = default_tech();
    let template = tech.find_node("n-transistor").unwrap();
    let inst = NodeInst::new(template, Point::zero()).traced_points([
        Point::new(0, 0),
        Point::new(0, 4000),
        Point::new(4000, 4000),
    ]);
    let shapes = tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();

    // Active, gate, one cap per poly layer, select, well.
    assert_eq!(shapes.len(), 6);
    assert_eq!(shapes[1].polygon.len(), 6);
    assert_eq!(shapes[2].polygon.len(), 4);
    assert_bbox(&shapes[2], 10., 9., 12., 11.);
    assert_bbox(&shapes[3], -1., -2., 1., 0.);
    assert_eq!(shapes[3].port, None);

    let poly = tech.find_layer("polysilicon-1").unwrap().id();
    assert!(shapes[2..4].iter().all(|s| s.layer == poly));
}

#[test]
fn nanotube_transistor() {
    let tech = default_tech();
    let template = tech.find_node("cnt-transistor").unwrap();
    assert!(template.is_cnt());
    let inst = NodeInst::new(template, Point::zero());
    let shapes = tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();

    let tube = tech.find_layer("nanotube").unwrap().id();
    let rails: Vec<_> = shapes.iter().filter(|s| s.layer == tube).collect();
    assert_eq!(rails.len(), 10);
    assert_bbox(rails[0], -4.75, -2., -4.25, 2.);
    assert_bbox(shapes.last().unwrap(), -4.75, -1., 4.75, 1.);
}

#[test]
fn arcs_on_default_technology() {
    let tech = default_tech();
    let arc = tech.find_arc("p-active").unwrap();
    let inst = ArcInst::new(arc, Point::new(0, 0), Point::new(4000, 0));
    let shapes = tech.arc_shapes(&inst, &ShapeOptions::default()).unwrap();
    assert_eq!(shapes.len(), 3);
    assert_bbox(&shapes[0], -1.5, -1.5, 11.5, 1.5);
    assert_bbox(&shapes[2], -7.5, -7.5, 17.5, 7.5);
}

#[test]
fn parallel_shape_generation() {
    let tech = default_tech();
    let template = tech.find_node("metal-1-p-active-con").unwrap();
    let expected = tech
        .node_shapes(&NodeInst::new(template, Point::zero()), &ShapeOptions::default())
        .unwrap();
    std::thread::scope(|s| {
        for i in 0..4 {
            let tech = &tech;
            let expected = &expected;
            s.spawn(move || {
                let mut b = ShapeBuilder::new();
                for _ in 0..50 {
                    let inst = NodeInst::new(template, Point::zero());
                    let shapes = b.node_shapes(tech, &inst, &ShapeOptions::default()).unwrap();
                    assert_eq!(&shapes, expected, "thread {}", i);
                }
            });
        }
    });
}
