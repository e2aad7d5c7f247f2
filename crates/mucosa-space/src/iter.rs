//! Lazy, restartable iteration over a grid rectangle.

use crate::extent::GridExtents;
use mucosa_core::{Axis, GridPoint};

/// A lazy, restartable walk over every cell of a [`GridExtents`].
///
/// [`next_along`](GridIterator::next_along) yields the current cell and
/// advances one step along the chosen axis, carrying into the
/// perpendicular axis at the end of each row/column; the sequence is
/// finite and visits each cell exactly once. The [`Iterator`] impl
/// advances along X (row-major).
#[derive(Clone, Debug)]
pub struct GridIterator {
    extents: GridExtents,
    current: Option<GridPoint>,
}

impl GridIterator {
    /// Start a walk at the low corner of `extents`.
    pub fn new(extents: GridExtents) -> Self {
        Self {
            current: Some(extents.origin_point()),
            extents,
        }
    }

    /// The cell the iterator is standing on, if not exhausted.
    pub fn get(&self) -> Option<GridPoint> {
        self.current
    }

    /// Rewind to the low corner.
    pub fn restart(&mut self) {
        self.current = Some(self.extents.origin_point());
    }

    /// The rectangle being walked.
    pub fn extents(&self) -> &GridExtents {
        &self.extents
    }

    /// Yield the current cell, then step one cell along `axis`.
    ///
    /// Stepping past the end of `axis` resets it to its origin and carries
    /// one step along the perpendicular axis; carrying past that axis
    /// exhausts the iterator.
    pub fn next_along(&mut self, axis: Axis) -> Option<GridPoint> {
        let cell = self.current?;

        let mut next = cell;
        next[axis] += 1;
        if next[axis] >= self.extents.high(axis) {
            next[axis] = self.extents.origin(axis);
            let other = axis.other();
            next[other] += 1;
            if next[other] >= self.extents.high(other) {
                self.current = None;
                return Some(cell);
            }
        }
        self.current = Some(next);
        Some(cell)
    }
}

impl Iterator for GridIterator {
    type Item = GridPoint;

    fn next(&mut self) -> Option<GridPoint> {
        self.next_along(Axis::X)
    }
}
