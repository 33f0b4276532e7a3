//! Layout of multi-cut contact arrays.
//!
//! Cut indices are not raster order when both axes have more than two cuts:
//! perimeter cuts come first (bottom row, top row, left column, right
//! column, corners only once), then interior cuts in raster order. The
//! first [`MultiCutData::cuts_reasonable`] indices are therefore exactly the
//! perimeter.

use geometry::prelude::*;

use crate::instance::CutAlignment;
use crate::node::CutRule;

/// The cut array of one multi-cut layer on one node instance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MultiCutData {
    center: FPoint,
    area: FPoint,
    cut: Dims,
    sep: f64,
    cuts_x: usize,
    cuts_y: usize,
    alignment: CutAlignment,
}

/// `1 + floor(area / (cut + sep))`, at least 1.
fn count_cuts(area: f64, cut: i64, sep: i64) -> usize {
    let pitch = (cut + sep) as f64;
    if area <= 0. || pitch <= 0. {
        return 1;
    }
    1 + (area / pitch).floor() as usize
}

impl MultiCutData {
    /// Lays out cuts whose centers lie within the box from `lo` to `hi`.
    ///
    /// `lo` and `hi` are the evaluated corners of the cut-center region and
    /// are used as given; an inverted region yields a single cut.
    /// `spacing` replaces both of the rule's separations.
    pub fn new(
        lo: FPoint,
        hi: FPoint,
        rule: &CutRule,
        spacing: Option<i64>,
        alignment: CutAlignment,
    ) -> Self {
        let area = FPoint::new(hi.x - lo.x, hi.y - lo.y);
        let sep_1d = spacing.unwrap_or(rule.sep_1d);
        let sep_2d = spacing.unwrap_or(rule.sep_2d);
        let (cw, ch) = (rule.size.w(), rule.size.h());

        let mut sep = sep_1d;
        let mut cuts_x = count_cuts(area.x, cw, sep_1d);
        let mut cuts_y = count_cuts(area.y, ch, sep_1d);
        if cuts_x > 1 && cuts_y > 1 {
            let x2 = count_cuts(area.x, cw, sep_2d);
            let y2 = count_cuts(area.y, ch, sep_2d);
            if x2 == 1 || y2 == 1 {
                // The array is really a line: keep the longer axis.
                if area.x > area.y {
                    cuts_y = 1;
                } else {
                    cuts_x = 1;
                }
            } else {
                sep = sep_2d;
                cuts_x = x2;
                cuts_y = y2;
            }
        }

        Self {
            center: FPoint::new((lo.x + hi.x) / 2., (lo.y + hi.y) / 2.),
            area,
            cut: rule.size,
            sep: sep as f64,
            cuts_x: cuts_x.max(1),
            cuts_y: cuts_y.max(1),
            alignment,
        }
    }

    /// The number of cuts along x.
    #[inline]
    pub fn cuts_x(&self) -> usize {
        self.cuts_x
    }

    /// The number of cuts along y.
    #[inline]
    pub fn cuts_y(&self) -> usize {
        self.cuts_y
    }

    /// The separation used between cuts, in grid units.
    #[inline]
    pub fn separation(&self) -> f64 {
        self.sep
    }

    /// The total number of cuts.
    #[inline]
    pub fn cuts_total(&self) -> usize {
        self.cuts_x * self.cuts_y
    }

    /// The number of perimeter cuts when both axes have more than two cuts,
    /// or [`MultiCutData::cuts_total`] otherwise.
    pub fn cuts_reasonable(&self) -> usize {
        if self.cuts_x > 2 && self.cuts_y > 2 {
            2 * self.cuts_x + 2 * (self.cuts_y - 2)
        } else {
            self.cuts_total()
        }
    }

    /// The number of cuts to emit in the given mode.
    pub fn cut_count(&self, reasonable: bool) -> usize {
        if reasonable {
            self.cuts_reasonable()
        } else {
            self.cuts_total()
        }
    }

    /// The `(x, y)` array position of cut `index`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// # use technology::node::CutRule;
    /// # use technology::instance::CutAlignment;
    /// # use technology::shape::multicut::MultiCutData;
    /// let rule = CutRule::new(Dims::square(4), 2, 2);
    /// let data = MultiCutData::new(
    ///     FPoint::new(0., 0.),
    ///     FPoint::new(12., 12.),
    ///     &rule,
    ///     None,
    ///     CutAlignment::Centered,
    /// );
    /// assert_eq!((data.cuts_x(), data.cuts_y()), (3, 3));
    /// assert_eq!(data.position(2), (2, 0));
    /// assert_eq!(data.position(3), (0, 2));
    /// assert_eq!(data.position(6), (0, 1));
    /// assert_eq!(data.position(7), (2, 1));
    /// assert_eq!(data.position(8), (1, 1));
    /// ```
    pub fn position(&self, index: usize) -> (usize, usize) {
        let (nx, ny) = (self.cuts_x, self.cuts_y);
        if nx <= 2 || ny <= 2 {
            return (index % nx, index / nx);
        }
        let side = ny - 2;
        if index < nx {
            (index, 0)
        } else if index < 2 * nx {
            (index - nx, ny - 1)
        } else if index < 2 * nx + side {
            (0, index - 2 * nx + 1)
        } else if index < 2 * nx + 2 * side {
            (nx - 1, index - 2 * nx - side + 1)
        } else {
            let interior = index - self.cuts_reasonable();
            let width = nx - 2;
            (1 + interior % width, 1 + interior / width)
        }
    }

    fn offset(&self, i: usize, n: usize, cut: i64, area: f64) -> f64 {
        let pitch = cut as f64 + self.sep;
        let twice = 2. * i as f64;
        let span = (n - 1) as f64;
        let base = (twice - span) * pitch / 2.;
        let slack = area - span * pitch;
        match self.alignment {
            CutAlignment::Centered => base,
            CutAlignment::Spread => {
                if twice < span {
                    base - slack / 2.
                } else if twice > span {
                    base + slack / 2.
                } else {
                    base
                }
            }
            CutAlignment::Corner => base - slack / 2.,
        }
    }

    /// The center of cut `index`, relative to the node center.
    pub fn cut_center(&self, index: usize) -> FPoint {
        let (ix, iy) = self.position(index);
        FPoint::new(
            self.center.x + self.offset(ix, self.cuts_x, self.cut.w(), self.area.x),
            self.center.y + self.offset(iy, self.cuts_y, self.cut.h(), self.area.y),
        )
    }

    /// The rectangle of cut `index`, relative to the node center.
    pub fn cut_rect(&self, index: usize) -> Rect {
        Rect::from_center(
            self.cut_center(index),
            self.cut.w() as f64,
            self.cut.h() as f64,
        )
    }

    /// Iterates over the cuts to emit in the given mode.
    pub fn cuts(&self, reasonable: bool) -> impl Iterator<Item = Rect> + '_ {
        (0..self.cut_count(reasonable)).map(|i| self.cut_rect(i))
    }
}
