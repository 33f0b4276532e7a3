//! Carbon-nanotube rails.

use geometry::prelude::*;

/// The number of tubes drawn when an instance does not say otherwise.
pub const DEFAULT_TUBE_COUNT: u32 = 10;

/// Lays out `count` equal rails across `bounds`, left to right, each spanning
/// the full height.
///
/// `pitch` is the gap between neighboring rails. When absent, rails and gaps
/// share the width equally.
pub fn rails(bounds: Rect, count: Option<u32>, pitch: Option<i64>) -> Vec<Rect> {
    let n = count.unwrap_or(DEFAULT_TUBE_COUNT).max(1) as f64;
    let span = bounds.width();
    let pitch = match pitch {
        Some(pitch) => pitch as f64,
        None => span / (2. * n - 1.),
    };
    let diameter = ((span - (n - 1.) * pitch) / n).max(0.);
    (0..n as usize)
        .map(|i| {
            let left = bounds.left() + i as f64 * (diameter + pitch);
            Rect::from_sides(left, bounds.bot(), left + diameter, bounds.top())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pitch_splits_evenly() {
        let rails = rails(Rect::from_sides(0., 0., 190., 50.), None, None);
        assert_eq!(rails.len(), 10);
        assert_eq!(rails[0], Rect::from_sides(0., 0., 10., 50.));
        assert_eq!(rails[9], Rect::from_sides(180., 0., 190., 50.));
    }

    #[test]
    fn explicit_count_and_pitch() {
        let rails = rails(Rect::from_sides(-50., -10., 50., 10.), Some(3), Some(20));
        assert_eq!(rails.len(), 3);
        assert_eq!(rails[1], Rect::from_sides(-10., -10., 10., 10.));
    }

    #[test]
    fn oversized_pitch_clamps_diameter() {
        let rails = rails(Rect::from_sides(0., 0., 10., 10.), Some(2), Some(100));
        assert_eq!(rails.len(), 2);
        assert_eq!(rails[0].width(), 0.);
    }

    #[test]
    fn zero_count_draws_one_tube() {
        let rails = rails(Rect::from_sides(0., 0., 10., 10.), Some(0), None);
        assert_eq!(rails, vec![Rect::from_sides(0., 0., 10., 10.)]);
    }
}
