//! Outlines of serpentine transistor layers.
//!
//! Each layer is offset to both sides of the gate centerline. Interior joints
//! are mitered by intersecting the offset lines of adjacent segments, and the
//! two open ends are extended along the centerline.

use geometry::prelude::*;
use itertools::Itertools;

use super::buffer::PointBuffer;
use crate::node::SerpentineExtent;

/// A deduplicated centerline with the direction of every segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    points: Vec<FPoint>,
    angles: Vec<f64>,
}

impl Centerline {
    /// Builds a centerline, dropping consecutive duplicate points.
    ///
    /// Returns `None` if fewer than two distinct points remain.
    pub fn new(points: impl IntoIterator<Item = FPoint>) -> Option<Self> {
        let mut pts: Vec<FPoint> = Vec::new();
        for p in points {
            if pts.last() != Some(&p) {
                pts.push(p);
            }
        }
        if pts.len() < 2 {
            return None;
        }
        let angles = pts
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.angle_to(*b))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            points: pts,
            angles,
        })
    }

    /// The centerline vertices.
    #[inline]
    pub fn points(&self) -> &[FPoint] {
        &self.points
    }

    /// The number of segments.
    #[inline]
    pub fn segments(&self) -> usize {
        self.angles.len()
    }

    fn first(&self) -> (FPoint, f64) {
        (self.points[0], self.angles[0])
    }

    fn last(&self) -> (FPoint, f64) {
        (
            self.points[self.points.len() - 1],
            self.angles[self.angles.len() - 1],
        )
    }

    /// The offset vertex at centerline point `i`, `dist` to the side given by
    /// `turn` (90 for left, -90 for right).
    fn offset_vertex(&self, i: usize, ext: &Widths, turn: f64) -> FPoint {
        let dist = if turn > 0. { ext.left } else { ext.right };
        let n = self.segments();
        if i == 0 {
            let (p, a) = self.first();
            return p.offset_polar(a, -ext.bottom).offset_polar(a + turn, dist);
        }
        if i == n {
            let (p, a) = self.last();
            return p.offset_polar(a, ext.top).offset_polar(a + turn, dist);
        }
        let p = self.points[i];
        let (a_in, a_out) = (self.angles[i - 1], self.angles[i]);
        let on_in = p.offset_polar(a_in + turn, dist);
        let on_out = p.offset_polar(a_out + turn, dist);
        intersect(on_in, a_in, on_out, a_out).unwrap_or(on_out)
    }
}

/// Intersects the line through `a` at angle `a_angle` with the line through
/// `b` at angle `b_angle`. Returns `None` for parallel lines.
pub fn intersect(a: FPoint, a_angle: f64, b: FPoint, b_angle: f64) -> Option<FPoint> {
    let (ax, ay) = geometry::cos_sin(a_angle);
    let (bx, by) = geometry::cos_sin(b_angle);
    let cross = ax * by - ay * bx;
    if cross.abs() < 1e-12 {
        return None;
    }
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let t = (dx * by - dy * bx) / cross;
    Some(FPoint::new(a.x + ax * t, a.y + ay * t))
}

/// Layer extents after applying a gate length override, in grid units.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Widths {
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
}

impl Widths {
    fn new(ext: &SerpentineExtent, extra: f64) -> Self {
        Self {
            left: (ext.left as f64 + extra).max(0.),
            right: (ext.right as f64 + extra).max(0.),
            bottom: ext.bottom as f64,
            top: ext.top as f64,
        }
    }
}

/// Writes the outline of one layer into `buf`.
///
/// The outline has `2 * (segments + 1)` vertices: the left side from first
/// to last point, then the right side from last to first.
pub(crate) fn outline(buf: &mut PointBuffer, line: &Centerline, ext: &SerpentineExtent, extra: f64) {
    let widths = Widths::new(ext, extra);
    let n = line.segments();
    buf.reset(2 * (n + 1));
    for i in 0..=n {
        buf.push(line.offset_vertex(i, &widths, 90.));
    }
    for i in (0..=n).rev() {
        buf.push(line.offset_vertex(i, &widths, -90.));
    }
}

/// The end caps of a field-poly layer: a quad past each open end of the centerline.
///
/// Caps of zero length are omitted.
pub(crate) fn end_caps(line: &Centerline, ext: &SerpentineExtent, extra: f64) -> Vec<[FPoint; 4]> {
    let w = Widths::new(ext, extra);
    let mut caps = Vec::with_capacity(2);
    if w.bottom > 0. {
        let (p, a) = line.first();
        let q = p.offset_polar(a, -w.bottom);
        caps.push([
            q.offset_polar(a + 90., w.left),
            p.offset_polar(a + 90., w.left),
            p.offset_polar(a - 90., w.right),
            q.offset_polar(a - 90., w.right),
        ]);
    }
    if w.top > 0. {
        let (p, a) = line.last();
        let q = p.offset_polar(a, w.top);
        caps.push([
            p.offset_polar(a + 90., w.left),
            q.offset_polar(a + 90., w.left),
            q.offset_polar(a - 90., w.right),
            p.offset_polar(a - 90., w.right),
        ]);
    }
    caps
}
