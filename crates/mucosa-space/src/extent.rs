//! Axis-aligned rectangular domains at space and grid scale.

use crate::error::SpaceError;
use mucosa_core::{Axis, GridPoint, Side, SpacePoint};

/// A continuous-space rectangle `[origin, origin + extent)` per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpaceExtents {
    origin: SpacePoint,
    extents: [f64; 2],
}

impl SpaceExtents {
    /// Create a rectangle. Extents must be finite and strictly positive.
    pub fn new(origin: SpacePoint, extents: [f64; 2]) -> Result<Self, SpaceError> {
        for axis in Axis::BOTH {
            let v = extents[axis.index()];
            if !v.is_finite() {
                return Err(SpaceError::NonFiniteExtent { axis, value: v });
            }
            if v <= 0.0 {
                return Err(SpaceError::EmptyExtent { axis });
            }
        }
        Ok(Self { origin, extents })
    }

    /// Low corner of the rectangle.
    pub fn origin_point(&self) -> SpacePoint {
        self.origin
    }

    /// High corner (`origin + extents`).
    pub fn high_point(&self) -> SpacePoint {
        SpacePoint::new(self.high(Axis::X), self.high(Axis::Y))
    }

    /// Low edge coordinate on `axis`.
    pub fn origin(&self, axis: Axis) -> f64 {
        self.origin[axis]
    }

    /// Length of the rectangle along `axis`.
    pub fn extent(&self, axis: Axis) -> f64 {
        self.extents[axis.index()]
    }

    /// High edge coordinate on `axis` (exclusive).
    pub fn high(&self, axis: Axis) -> f64 {
        self.origin[axis] + self.extents[axis.index()]
    }

    /// Whether `pt` lies inside `[origin, origin + extent)` on both axes.
    pub fn contains(&self, pt: &SpacePoint) -> bool {
        Axis::BOTH
            .into_iter()
            .all(|a| pt[a] >= self.origin(a) && pt[a] < self.high(a))
    }
}

/// An integer grid rectangle `[origin, origin + extent)` per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridExtents {
    origin: GridPoint,
    extents: [i32; 2],
}

impl GridExtents {
    /// Create a grid rectangle. Extents must be at least one cell.
    pub fn new(origin: GridPoint, extents: [i32; 2]) -> Result<Self, SpaceError> {
        for axis in Axis::BOTH {
            if extents[axis.index()] < 1 {
                return Err(SpaceError::EmptyExtent { axis });
            }
        }
        Ok(Self { origin, extents })
    }

    /// Low corner cell.
    pub fn origin_point(&self) -> GridPoint {
        self.origin
    }

    /// Low edge coordinate on `axis`.
    pub fn origin(&self, axis: Axis) -> i32 {
        self.origin[axis]
    }

    /// Number of cells along `axis`.
    pub fn extent(&self, axis: Axis) -> i32 {
        self.extents[axis.index()]
    }

    /// One past the last cell on `axis`.
    pub fn high(&self, axis: Axis) -> i32 {
        self.origin[axis] + self.extents[axis.index()]
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.extents[0] as usize * self.extents[1] as usize
    }

    /// Whether `pt` is a cell of this rectangle.
    pub fn contains(&self, pt: &GridPoint) -> bool {
        Axis::BOTH
            .into_iter()
            .all(|a| pt[a] >= self.origin(a) && pt[a] < self.high(a))
    }

    /// Low corner lifted to space scale (unit cells).
    pub fn low_corner(&self) -> SpacePoint {
        self.origin.into()
    }

    /// High corner lifted to space scale (unit cells).
    pub fn high_corner(&self) -> SpacePoint {
        SpacePoint::new(self.high(Axis::X) as f64, self.high(Axis::Y) as f64)
    }

    /// This rectangle lifted to space scale, one space unit per cell.
    ///
    /// Used to build grid-scale [`Borders`](crate::Borders) that share the
    /// classification logic of their space-scale counterpart.
    pub fn to_space_scale(&self) -> SpaceExtents {
        SpaceExtents {
            origin: self.origin.into(),
            extents: [self.extents[0] as f64, self.extents[1] as f64],
        }
    }

    /// The cells of the border row/column on the named edge.
    ///
    /// For the low side of `axis` this is the line `coord[axis] == origin`;
    /// for the high side, `coord[axis] == high - 1`. Cells are yielded in
    /// increasing order along the perpendicular axis.
    pub fn edge_cells(&self, axis: Axis, side: Side) -> impl Iterator<Item = GridPoint> + '_ {
        let fixed = match side {
            Side::Low => self.origin(axis),
            Side::High => self.high(axis) - 1,
        };
        let other = axis.other();
        (self.origin(other)..self.high(other)).map(move |v| {
            let mut pt = GridPoint::new(0, 0);
            pt[axis] = fixed;
            pt[other] = v;
            pt
        })
    }
}
