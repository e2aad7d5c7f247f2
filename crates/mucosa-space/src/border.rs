//! Edge classification and signed border distances.

use crate::extent::{GridExtents, SpaceExtents};
use mucosa_core::{Axis, GridPoint, Side, SpacePoint};

/// Whether an edge connects onward or is a hard wall.
///
/// This is symmetric configuration only: a permeable edge means a neighbor
/// region exists there, an impermeable edge is a wall. The consequence of a
/// crossing — hand off to the neighbor, or mirror back inside — is decided
/// by the caller, never by [`Borders`] itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// A neighbor region lies beyond this edge.
    Permeable,
    /// Hard wall; nothing lies beyond.
    Impermeable,
}

/// Per-axis classification of a point against a rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundState {
    /// Within `[origin, origin + extent)` on this axis.
    InBound,
    /// Below the low edge.
    OutLow,
    /// At or above the high edge.
    OutHigh,
}

impl BoundState {
    /// The violated side, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            BoundState::InBound => None,
            BoundState::OutLow => Some(Side::Low),
            BoundState::OutHigh => Some(Side::High),
        }
    }
}

/// Result of a bounds check: one [`BoundState`] per axis.
///
/// Axes are classified independently, so a corner overshoot reports both
/// axes out of bounds; callers resolve consequences in axis order X then Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundsReport {
    states: [BoundState; 2],
}

impl BoundsReport {
    /// Whether the point is inside on both axes.
    pub fn inside(&self) -> bool {
        self.states.iter().all(|s| *s == BoundState::InBound)
    }

    /// Classification on `axis`.
    pub fn state(&self, axis: Axis) -> BoundState {
        self.states[axis.index()]
    }
}

/// Classifies and measures coordinates against a rectangular domain with
/// per-(axis, side) edge semantics.
///
/// One instance serves a compartment's continuous space; a second, built
/// via [`Borders::for_grid`], serves its integer grid at unit cell scale.
/// All edges start [`EdgeKind::Impermeable`].
#[derive(Clone, Debug, PartialEq)]
pub struct Borders {
    extents: SpaceExtents,
    edges: [[EdgeKind; 2]; 2],
}

impl Borders {
    /// Borders over a continuous-space rectangle, all edges impermeable.
    pub fn new(extents: SpaceExtents) -> Self {
        Self {
            extents,
            edges: [[EdgeKind::Impermeable; 2]; 2],
        }
    }

    /// Borders over a grid rectangle lifted to unit-cell space scale.
    pub fn for_grid(grid: &GridExtents) -> Self {
        Self::new(grid.to_space_scale())
    }

    /// The underlying rectangle.
    pub fn extents(&self) -> &SpaceExtents {
        &self.extents
    }

    /// Set the edge kind for one (axis, side).
    pub fn set_edge(&mut self, axis: Axis, side: Side, kind: EdgeKind) {
        self.edges[axis.index()][side.index()] = kind;
    }

    /// The edge kind of one (axis, side).
    pub fn edge(&self, axis: Axis, side: Side) -> EdgeKind {
        self.edges[axis.index()][side.index()]
    }

    /// Classify a continuous-space point per axis.
    pub fn bounds_check(&self, pt: &SpacePoint) -> BoundsReport {
        let mut states = [BoundState::InBound; 2];
        for axis in Axis::BOTH {
            let v = pt[axis];
            states[axis.index()] = if v < self.extents.origin(axis) {
                BoundState::OutLow
            } else if v >= self.extents.high(axis) {
                BoundState::OutHigh
            } else {
                BoundState::InBound
            };
        }
        BoundsReport { states }
    }

    /// Classify a grid cell coordinate per axis.
    pub fn bounds_check_grid(&self, pt: &GridPoint) -> BoundsReport {
        self.bounds_check(&SpacePoint::from(*pt))
    }

    /// Signed distance from `pt` to the named edge: negative below the low
    /// edge, positive above the high edge, measured along `axis`.
    pub fn distance_from_border(&self, pt: &SpacePoint, axis: Axis, side: Side) -> f64 {
        match side {
            Side::Low => pt[axis] - self.extents.origin(axis),
            Side::High => pt[axis] - self.extents.high(axis),
        }
    }

    /// Mirror an out-of-bounds point back inside, axis by axis.
    ///
    /// An overshoot of `d` beyond an edge lands exactly `d` inside that
    /// edge — never wrapped, never clamped. In-bounds axes are untouched.
    /// A single mirror pass assumes the overshoot is smaller than the
    /// domain extent.
    pub fn reflect(&self, pt: &mut SpacePoint) {
        let report = self.bounds_check(pt);
        for axis in Axis::BOTH {
            match report.state(axis) {
                BoundState::InBound => {}
                BoundState::OutLow => {
                    pt[axis] =
                        self.extents.origin(axis) - self.distance_from_border(pt, axis, Side::Low);
                }
                BoundState::OutHigh => {
                    pt[axis] =
                        self.extents.high(axis) - self.distance_from_border(pt, axis, Side::High);
                }
            }
        }
    }

    /// Whether a grid cell sits on the border row/column of a permeable
    /// edge of this (grid-scale) rectangle.
    ///
    /// Used to restrict ghost merging to boundary-adjacent cells.
    pub fn grid_boundary_cell(&self, pt: &GridPoint) -> bool {
        for axis in Axis::BOTH {
            let v = pt[axis] as f64;
            if self.edge(axis, Side::Low) == EdgeKind::Permeable
                && (v - self.extents.origin(axis)).abs() < 0.5
            {
                return true;
            }
            if self.edge(axis, Side::High) == EdgeKind::Permeable
                && (v - (self.extents.high(axis) - 1.0)).abs() < 0.5
            {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mucosa_core::GridPoint;
    use proptest::prelude::*;

    fn borders_10x4() -> Borders {
        Borders::new(SpaceExtents::new(SpacePoint::new(0.0, 0.0), [10.0, 4.0]).unwrap())
    }

    #[test]
    fn classifies_each_axis_independently() {
        let b = borders_10x4();
        let report = b.bounds_check(&SpacePoint::new(-0.5, 4.5));
        assert!(!report.inside());
        assert_eq!(report.state(Axis::X), BoundState::OutLow);
        assert_eq!(report.state(Axis::Y), BoundState::OutHigh);

        let inside = b.bounds_check(&SpacePoint::new(0.0, 3.999));
        assert!(inside.inside());
    }

    #[test]
    fn high_edge_is_exclusive() {
        let b = borders_10x4();
        let report = b.bounds_check(&SpacePoint::new(10.0, 2.0));
        assert_eq!(report.state(Axis::X), BoundState::OutHigh);
    }

    #[test]
    fn signed_distances() {
        let b = borders_10x4();
        let pt = SpacePoint::new(-0.25, 4.75);
        assert_eq!(b.distance_from_border(&pt, Axis::X, Side::Low), -0.25);
        assert_eq!(b.distance_from_border(&pt, Axis::Y, Side::High), 0.75);
        assert_eq!(b.distance_from_border(&pt, Axis::Y, Side::Low), 4.75);
    }

    #[test]
    fn reflect_mirrors_overshoot() {
        let b = borders_10x4();
        let mut pt = SpacePoint::new(-0.5, 4.25);
        b.reflect(&mut pt);
        assert_eq!(pt, SpacePoint::new(0.5, 3.75));
    }

    #[test]
    fn reflect_leaves_inbound_axes_alone() {
        let b = borders_10x4();
        let mut pt = SpacePoint::new(3.25, -1.0);
        b.reflect(&mut pt);
        assert_eq!(pt, SpacePoint::new(3.25, 1.0));
    }

    #[test]
    fn permeability_does_not_change_classification() {
        let mut b = borders_10x4();
        b.set_edge(Axis::Y, Side::High, EdgeKind::Permeable);
        let pt = SpacePoint::new(5.0, 4.5);
        assert_eq!(b.bounds_check(&pt).state(Axis::Y), BoundState::OutHigh);
    }

    #[test]
    fn grid_boundary_cells_track_permeable_edges() {
        let grid = GridExtents::new(GridPoint::new(0, 0), [10, 4]).unwrap();
        let mut b = Borders::for_grid(&grid);
        b.set_edge(Axis::Y, Side::High, EdgeKind::Permeable);

        assert!(b.grid_boundary_cell(&GridPoint::new(3, 3)));
        assert!(!b.grid_boundary_cell(&GridPoint::new(3, 0)));
        assert!(!b.grid_boundary_cell(&GridPoint::new(0, 2)));

        b.set_edge(Axis::Y, Side::Low, EdgeKind::Permeable);
        assert!(b.grid_boundary_cell(&GridPoint::new(3, 0)));
    }

    proptest! {
        #[test]
        fn reflection_law(
            overshoot in 0.001f64..3.9,
            x in 0.0f64..9.99,
        ) {
            let b = borders_10x4();

            let mut below = SpacePoint::new(x, -overshoot);
            b.reflect(&mut below);
            prop_assert!((below.y() - overshoot).abs() < 1e-12);
            prop_assert_eq!(below.x(), x);

            let mut above = SpacePoint::new(x, 4.0 + overshoot);
            b.reflect(&mut above);
            prop_assert!((above.y() - (4.0 - overshoot)).abs() < 1e-12);
        }

        #[test]
        fn inside_points_classify_inbound(
            x in 0.0f64..9.999,
            y in 0.0f64..3.999,
        ) {
            let b = borders_10x4();
            prop_assert!(b.bounds_check(&SpacePoint::new(x, y)).inside());
        }
    }
}
