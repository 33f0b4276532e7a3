use geometry::prelude::*;

use super::{ShapeBuilder, ShapeElement, ShapeOptions};
use crate::arc::ArcTemplate;
use crate::instance::ArcInst;
use crate::style::Style;
use crate::tech::Technology;

/// Half-angle of arrow chevrons, in degrees.
const ARROW_ANGLE: f64 = 30.;

pub(super) fn arc_shapes(
    b: &mut ShapeBuilder,
    tech: &Technology,
    template: &ArcTemplate,
    inst: &ArcInst,
    opts: &ShapeOptions,
    out: &mut Vec<ShapeElement>,
) {
    let id = Transformation::identity();
    let angle = inst.angle();
    let back = angle + 180.;
    let head = inst.head.to_fpoint();
    let tail = inst.tail.to_fpoint();
    let bubble = tech.bubble_size() as f64;
    let negated = inst.head_negated || inst.tail_negated;

    for layer in template.layers() {
        if !opts.accepts(tech, layer.layer()) {
            continue;
        }
        let width = 2 * (inst.extend_over_min + layer.grid_extend());
        if negated || width <= 0 {
            let t = if inst.tail_negated {
                tail.offset_polar(back, bubble)
            } else {
                tail
            };
            let h = if inst.head_negated {
                head.offset_polar(angle, bubble)
            } else {
                head
            };
            out.push(b.emit([t, h], &id, layer.layer(), layer.style().zero_width(), None, opts));
            continue;
        }
        let half = width as f64 / 2.;
        let t = if inst.tail_extended {
            tail.offset_polar(angle, half)
        } else {
            tail
        };
        let h = if inst.head_extended {
            head.offset_polar(back, half)
        } else {
            head
        };
        let corners = [
            t.offset_polar(angle + 90., half),
            h.offset_polar(angle + 90., half),
            h.offset_polar(angle - 90., half),
            t.offset_polar(angle - 90., half),
        ];
        out.push(b.emit(corners, &id, layer.layer(), layer.style(), None, opts));
    }

    // Decorations are drawn on the first layer and carry no connectivity.
    if opts.electrical {
        return;
    }
    let Some(first) = template.layers().first() else {
        return;
    };
    if !opts.accepts(tech, first.layer()) {
        return;
    }
    let layer = first.layer();

    let ends = [
        (inst.head_negated, head, angle),
        (inst.tail_negated, tail, back),
    ];
    for (_, end, inward) in ends.into_iter().filter(|(negated, _, _)| *negated) {
        let center = end.offset_polar(inward, bubble / 2.);
        let rim = end.offset_polar(inward, bubble);
        out.push(b.emit([center, rim], &id, layer, Style::Circle, None, opts));
    }

    let len = tech.arrow_length() as f64;
    let arrows = inst.arrows;
    if arrows.body {
        out.push(b.emit([head, tail], &id, layer, Style::Vectors, None, opts));
    }
    if arrows.head {
        let wings = [
            head,
            head.offset_polar(angle + ARROW_ANGLE, len),
            head,
            head.offset_polar(angle - ARROW_ANGLE, len),
        ];
        out.push(b.emit(wings, &id, layer, Style::Vectors, None, opts));
    }
    if arrows.tail {
        let wings = [
            tail,
            tail.offset_polar(back + ARROW_ANGLE, len),
            tail,
            tail.offset_polar(back - ARROW_ANGLE, len),
        ];
        out.push(b.emit(wings, &id, layer, Style::Vectors, None, opts));
    }
}
