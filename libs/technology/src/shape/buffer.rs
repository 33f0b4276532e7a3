//! A reusable vertex buffer.

use geometry::prelude::*;

/// A growable buffer of vertices, reused across shape computations.
///
/// Capacity grows to the larger of twice the old capacity and the requested
/// size, and is never released.
#[derive(Debug, Default, Clone)]
pub(crate) struct PointBuffer {
    points: Vec<FPoint>,
}

impl PointBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Clears the buffer and makes room for at least `n` vertices.
    pub(crate) fn reset(&mut self, n: usize) {
        self.points.clear();
        self.reserve(n);
    }

    fn reserve(&mut self, n: usize) {
        let cap = self.points.capacity();
        if n > cap {
            let target = std::cmp::max(2 * cap, n);
            self.points.reserve_exact(target - self.points.len());
        }
    }

    pub(crate) fn push(&mut self, p: FPoint) {
        if self.points.len() == self.points.capacity() {
            self.reserve(self.points.len() + 1);
        }
        self.points.push(p);
    }

    pub(crate) fn extend(&mut self, points: impl IntoIterator<Item = FPoint>) {
        for p in points {
            self.push(p);
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.points.capacity()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[FPoint] {
        &self.points
    }

    /// Copies the buffered vertices out through `f`, leaving the buffer empty.
    pub(crate) fn drain_mapped(&mut self, f: impl Fn(FPoint) -> FPoint) -> Polygon {
        let points = self.points.drain(..).map(f).collect();
        Polygon::from_verts(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_geometrically_and_never_shrinks() {
        let mut buf = PointBuffer::new();
        buf.reset(4);
        assert!(buf.capacity() >= 4);
        let cap = buf.capacity();
        buf.reset(cap + 1);
        assert!(buf.capacity() >= 2 * cap);
        let cap = buf.capacity();
        buf.reset(1);
        assert_eq!(buf.capacity(), cap);
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn drain_empties_buffer() {
        let mut buf = PointBuffer::new();
        buf.extend([FPoint::new(1., 2.), FPoint::new(3., 4.)]);
        let cap = buf.capacity();
        let poly = buf.drain_mapped(|p| p * 2.);
        assert_eq!(poly.points(), &[FPoint::new(2., 4.), FPoint::new(6., 8.)]);
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), cap);
    }
}
