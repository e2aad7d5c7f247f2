//! 2D coordinate types and the axis/side vocabulary.
//!
//! The tissue model is strictly two-dimensional, so coordinates are fixed
//! `[T; 2]` arrays indexed by [`Axis`] rather than variable-length vectors.

use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two grid axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The horizontal axis.
    X,
    /// The vertical axis. Compartments stack along Y in the tissue layout.
    Y,
}

impl Axis {
    /// Both axes, in the order boundary resolution evaluates them (X first).
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    /// Array index of this axis.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// The perpendicular axis.
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// One side of an axis-aligned rectangular domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// The edge at the axis origin.
    Low,
    /// The edge at origin + extent.
    High,
}

impl Side {
    /// Both sides, low first.
    pub const BOTH: [Side; 2] = [Side::Low, Side::High];

    /// Array index of this side.
    pub fn index(self) -> usize {
        match self {
            Side::Low => 0,
            Side::High => 1,
        }
    }

    /// Step direction across this side: `-1` for low, `+1` for high.
    pub fn step(self) -> i32 {
        match self {
            Side::Low => -1,
            Side::High => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Low => f.write_str("low"),
            Side::High => f.write_str("high"),
        }
    }
}

/// A continuous-space location within (or near) a compartment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpacePoint(pub [f64; 2]);

impl SpacePoint {
    /// Construct from components.
    pub fn new(x: f64, y: f64) -> Self {
        Self([x, y])
    }

    /// The X component.
    pub fn x(self) -> f64 {
        self.0[0]
    }

    /// The Y component.
    pub fn y(self) -> f64 {
        self.0[1]
    }
}

impl Index<Axis> for SpacePoint {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        &self.0[axis.index()]
    }
}

impl IndexMut<Axis> for SpacePoint {
    fn index_mut(&mut self, axis: Axis) -> &mut f64 {
        &mut self.0[axis.index()]
    }
}

impl fmt::Display for SpacePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0[0], self.0[1])
    }
}

/// An integer grid cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint(pub [i32; 2]);

impl GridPoint {
    /// Construct from components.
    pub fn new(x: i32, y: i32) -> Self {
        Self([x, y])
    }

    /// The X component.
    pub fn x(self) -> i32 {
        self.0[0]
    }

    /// The Y component.
    pub fn y(self) -> i32 {
        self.0[1]
    }

    /// This point shifted by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self([self.0[0] + dx, self.0[1] + dy])
    }
}

impl Index<Axis> for GridPoint {
    type Output = i32;

    fn index(&self, axis: Axis) -> &i32 {
        &self.0[axis.index()]
    }
}

impl IndexMut<Axis> for GridPoint {
    fn index_mut(&mut self, axis: Axis) -> &mut i32 {
        &mut self.0[axis.index()]
    }
}

impl From<GridPoint> for SpacePoint {
    /// Lift a grid coordinate to space scale (cell corner, unit cells).
    fn from(pt: GridPoint) -> Self {
        SpacePoint::new(pt.x() as f64, pt.y() as f64)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0[0], self.0[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_indexing() {
        let mut pt = SpacePoint::new(1.0, 2.0);
        assert_eq!(pt[Axis::X], 1.0);
        pt[Axis::Y] += 0.5;
        assert_eq!(pt.y(), 2.5);
    }

    #[test]
    fn other_axis_is_involution() {
        for axis in Axis::BOTH {
            assert_eq!(axis.other().other(), axis);
        }
    }

    #[test]
    fn grid_offset() {
        assert_eq!(GridPoint::new(3, 4).offset(-1, 2), GridPoint::new(2, 6));
    }
}
