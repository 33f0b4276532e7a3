use geometry::prelude::*;

use super::multicut::MultiCutData;
use super::serpentine::{self, Centerline};
use super::{nanotube, ShapeBuilder, ShapeElement, ShapeOptions, TraceBreak};
use crate::edge::eval_box;
use crate::function::{is_field_poly, is_gate_poly, Function, FunctionExtras};
use crate::instance::{NodeInst, TracePoint};
use crate::node::{NodeLayer, NodeTemplate, Representation};
use crate::tech::Technology;

pub(super) fn node_shapes(
    b: &mut ShapeBuilder,
    tech: &Technology,
    template: &NodeTemplate,
    inst: &NodeInst,
    opts: &ShapeOptions,
    out: &mut Vec<ShapeElement>,
) {
    let xform = Transformation::from_offset_and_orientation(inst.center.to_fpoint(), inst.orientation);
    let layers = template.layers_for(opts.electrical);

    if let Some(trace) = &inst.trace {
        if template.is_serpentine() {
            if let Some(line) = first_piece(trace).and_then(Centerline::new) {
                serpentine_shapes(b, tech, template, layers, &line, inst, &xform, opts, out);
                return;
            }
        } else if template.holds_outline() {
            if let Some(first) = layers.first() {
                if opts.accepts(tech, first.layer) {
                    for piece in split_trace(trace, opts.trace_breaks) {
                        out.push(b.emit(piece, &xform, first.layer, first.style, first.port, opts));
                    }
                }
            }
            return;
        }
    }

    for layer in layers {
        if !opts.accepts(tech, layer.layer) {
            continue;
        }
        layer_shapes(b, layer, inst, &xform, opts, out);
    }
}

fn layer_shapes(
    b: &mut ShapeBuilder,
    layer: &NodeLayer,
    inst: &NodeInst,
    xform: &Transformation,
    opts: &ShapeOptions,
    out: &mut Vec<ShapeElement>,
) {
    match &layer.repr {
        Representation::Box([lo, hi]) => {
            let rect = eval_box(lo, hi, inst.size);
            if layer.nanotube {
                let tubes = nanotube::rails(rect, inst.overrides.tube_count, inst.overrides.tube_pitch);
                for tube in tubes {
                    out.push(b.emit(tube.corners(), xform, layer.layer, layer.style, layer.port, opts));
                }
            } else {
                out.push(b.emit(rect.corners(), xform, layer.layer, layer.style, layer.port, opts));
            }
        }
        Representation::Points(points) => {
            let points = points.iter().map(|p| p.eval(inst.size));
            out.push(b.emit(points, xform, layer.layer, layer.style, layer.port, opts));
        }
        Representation::MultiCutBox { corners: [lo, hi], rule } => {
            let cuts = MultiCutData::new(
                lo.eval(inst.size),
                hi.eval(inst.size),
                rule,
                inst.overrides.cut_spacing,
                inst.overrides.cut_alignment,
            );
            for cut in cuts.cuts(opts.reasonable) {
                out.push(b.emit(cut.corners(), xform, layer.layer, layer.style, layer.port, opts));
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn serpentine_shapes(
    b: &mut ShapeBuilder,
    tech: &Technology,
    template: &NodeTemplate,
    layers: &[NodeLayer],
    line: &Centerline,
    inst: &NodeInst,
    xform: &Transformation,
    opts: &ShapeOptions,
    out: &mut Vec<ShapeElement>,
) {
    let split_field_poly = layers.iter().any(|l| layer_is(tech, l, is_gate_poly))
        && layers.iter().any(|l| layer_is(tech, l, is_field_poly));
    let extra = inst
        .overrides
        .serpentine_length
        .map(|len| (len - template.default_length()) as f64 / 2.)
        .unwrap_or(0.);

    for layer in layers {
        if !opts.accepts(tech, layer.layer) {
            continue;
        }
        let Some(ext) = &layer.serpentine else {
            continue;
        };
        if split_field_poly && layer_is(tech, layer, is_field_poly) {
            for cap in serpentine::end_caps(line, ext, extra) {
                out.push(b.emit(cap, xform, layer.layer, layer.style, layer.port, opts));
            }
        } else {
            serpentine::outline(&mut b.buf, line, ext, extra);
            out.push(b.flush(xform, layer.layer, layer.style, layer.port, opts));
        }
    }
}

fn layer_is(
    tech: &Technology,
    layer: &NodeLayer,
    predicate: fn(Function, FunctionExtras) -> bool,
) -> bool {
    tech.layer(layer.layer)
        .map(|l| predicate(l.function(), l.extras()))
        .unwrap_or(false)
}

/// The points of the first piece of a trace.
fn first_piece(trace: &[TracePoint]) -> Option<Vec<FPoint>> {
    let points: Vec<FPoint> = trace
        .iter()
        .map_while(|p| p.map(Point::to_fpoint))
        .collect();
    (!points.is_empty()).then_some(points)
}

/// Splits a trace into its pieces.
///
/// With [`TraceBreak::SentinelOrDuplicate`], a point equal to its predecessor
/// ends the current piece and is itself dropped. Empty pieces are skipped.
pub(crate) fn split_trace(trace: &[TracePoint], breaks: TraceBreak) -> Vec<Vec<FPoint>> {
    let mut pieces = Vec::new();
    let mut current: Vec<FPoint> = Vec::new();
    let mut prev: Option<Point> = None;
    for p in trace {
        match p {
            None => {
                pieces.push(std::mem::take(&mut current));
                prev = None;
            }
            Some(p) if breaks == TraceBreak::SentinelOrDuplicate && prev == Some(*p) => {
                pieces.push(std::mem::take(&mut current));
                prev = None;
            }
            Some(p) => {
                current.push(p.to_fpoint());
                prev = Some(*p);
            }
        }
    }
    pieces.push(current);
    pieces.retain(|p| !p.is_empty());
    pieces
}
