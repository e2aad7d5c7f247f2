//! Per-cell field value storage and ghost snapshots.

use crate::error::SyncError;
use indexmap::IndexMap;
use mucosa_core::{Axis, FieldId, GridPoint, LayerId};
use mucosa_space::{Borders, GridExtents, GridIterator};

/// An immutable copy of one partition's field values, as exchanged between
/// processes during diffuser synchronization.
///
/// Coordinates are in the owning compartment's global grid frame; the
/// receiving side decides which cells it cares about.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSnapshot {
    layer: LayerId,
    grid: GridExtents,
    field_count: usize,
    values: Vec<f64>,
}

impl LayerSnapshot {
    /// Assemble a snapshot from raw parts, validating the value count.
    pub fn from_parts(
        layer: LayerId,
        grid: GridExtents,
        field_count: usize,
        values: Vec<f64>,
    ) -> Result<Self, SyncError> {
        let expected = grid.cell_count() * field_count;
        if values.len() != expected {
            return Err(SyncError::MalformedSnapshot {
                layer,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            layer,
            grid,
            field_count,
            values,
        })
    }

    /// The layer this snapshot was taken from.
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// The partition rectangle the snapshot covers.
    pub fn grid(&self) -> &GridExtents {
        &self.grid
    }

    /// Number of field slots per cell.
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// The value vector of one cell, if covered.
    pub fn cell(&self, pt: &GridPoint) -> Option<&[f64]> {
        let idx = cell_index(&self.grid, pt)?;
        let start = idx * self.field_count;
        Some(&self.values[start..start + self.field_count])
    }
}

/// Row-major flat index of `pt` within `grid`.
fn cell_index(grid: &GridExtents, pt: &GridPoint) -> Option<usize> {
    if !grid.contains(pt) {
        return None;
    }
    let col = (pt[Axis::X] - grid.origin(Axis::X)) as usize;
    let row = (pt[Axis::Y] - grid.origin(Axis::Y)) as usize;
    Some(row * grid.extent(Axis::X) as usize + col)
}

/// A compartment's per-cell field values over its local partition, plus a
/// cache of ghost cells merged from other partitions' snapshots.
///
/// Every local cell holds one `f64` slot per registered field, in
/// registration order. Ghost entries are transient: they reflect the last
/// completed synchronization round and are only ever replaced wholesale by
/// [`merge_snapshot`](FieldLayer::merge_snapshot), never mutated locally.
#[derive(Clone, Debug)]
pub struct FieldLayer {
    layer: LayerId,
    grid: GridExtents,
    field_count: usize,
    values: Vec<f64>,
    ghost: IndexMap<GridPoint, Vec<f64>>,
}

impl FieldLayer {
    /// Allocate storage over `grid`, seeding every cell with `initial`
    /// (one value per registered field).
    pub fn new(layer: LayerId, grid: GridExtents, initial: &[f64]) -> Self {
        let field_count = initial.len();
        let mut values = Vec::with_capacity(grid.cell_count() * field_count);
        for _ in GridIterator::new(grid) {
            values.extend_from_slice(initial);
        }
        Self {
            layer,
            grid,
            field_count,
            values,
            ghost: IndexMap::new(),
        }
    }

    /// This layer's synchronization id.
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// The local partition rectangle covered by live storage.
    pub fn grid(&self) -> &GridExtents {
        &self.grid
    }

    /// Number of field slots per cell.
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// The live value vector of a local cell.
    pub fn cell(&self, pt: &GridPoint) -> Option<&[f64]> {
        let idx = cell_index(&self.grid, pt)?;
        let start = idx * self.field_count;
        Some(&self.values[start..start + self.field_count])
    }

    /// Mutable access to a local cell's value vector.
    pub fn cell_mut(&mut self, pt: &GridPoint) -> Option<&mut [f64]> {
        let idx = cell_index(&self.grid, pt)?;
        let start = idx * self.field_count;
        Some(&mut self.values[start..start + self.field_count])
    }

    /// Mutable access to one field slot of a local cell.
    pub fn value_mut(&mut self, pt: &GridPoint, field: FieldId) -> Option<&mut f64> {
        let idx = field.0 as usize;
        self.cell_mut(pt)?.get_mut(idx)
    }

    /// A ghost cell's value vector from the last completed round.
    pub fn ghost_cell(&self, pt: &GridPoint) -> Option<&[f64]> {
        self.ghost.get(pt).map(Vec::as_slice)
    }

    /// One field slot of a ghost cell.
    pub fn ghost_value(&self, pt: &GridPoint, field: FieldId) -> Option<f64> {
        self.ghost_cell(pt)?.get(field.0 as usize).copied()
    }

    /// Number of cached ghost cells.
    pub fn ghost_len(&self) -> usize {
        self.ghost.len()
    }

    /// Copy the live local values into a snapshot for transmission.
    pub fn snapshot(&self) -> LayerSnapshot {
        LayerSnapshot {
            layer: self.layer,
            grid: self.grid,
            field_count: self.field_count,
            values: self.values.clone(),
        }
    }

    /// Merge a non-local snapshot into the ghost cache.
    ///
    /// Only cells that lie outside the local partition and on a permeable
    /// boundary row/column of `compartment_borders` (the compartment's
    /// grid-scale borders) are retained; everything else in the snapshot
    /// is ignored. Cells already cached are overwritten, so repeated
    /// rounds converge on the sender's latest completed state.
    pub fn merge_snapshot(
        &mut self,
        snapshot: &LayerSnapshot,
        compartment_borders: &Borders,
    ) -> Result<(), SyncError> {
        if snapshot.field_count != self.field_count {
            return Err(SyncError::MalformedSnapshot {
                layer: snapshot.layer,
                expected: snapshot.grid.cell_count() * self.field_count,
                actual: snapshot.values.len(),
            });
        }
        for pt in GridIterator::new(snapshot.grid) {
            if self.grid.contains(&pt) || !compartment_borders.grid_boundary_cell(&pt) {
                continue;
            }
            if let Some(cell) = snapshot.cell(&pt) {
                self.ghost.insert(pt, cell.to_vec());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mucosa_core::Side;
    use mucosa_space::EdgeKind;

    fn grid(origin: (i32, i32), extents: [i32; 2]) -> GridExtents {
        GridExtents::new(GridPoint::new(origin.0, origin.1), extents).unwrap()
    }

    #[test]
    fn seeds_every_cell_with_initial_values() {
        let layer = FieldLayer::new(LayerId(0), grid((0, 0), [4, 3]), &[1.5, 0.0]);
        assert_eq!(layer.field_count(), 2);
        for pt in GridIterator::new(*layer.grid()) {
            assert_eq!(layer.cell(&pt), Some(&[1.5, 0.0][..]));
        }
    }

    #[test]
    fn cell_mut_round_trips() {
        let mut layer = FieldLayer::new(LayerId(0), grid((0, 0), [4, 3]), &[0.0]);
        let pt = GridPoint::new(2, 1);
        *layer.value_mut(&pt, FieldId(0)).unwrap() = 9.25;
        assert_eq!(layer.cell(&pt), Some(&[9.25][..]));
        assert_eq!(layer.cell(&GridPoint::new(3, 1)), Some(&[0.0][..]));
        assert!(layer.cell(&GridPoint::new(4, 0)).is_none());
    }

    #[test]
    fn snapshot_carries_live_values() {
        let mut layer = FieldLayer::new(LayerId(3), grid((0, 0), [2, 2]), &[0.5]);
        *layer.value_mut(&GridPoint::new(1, 1), FieldId(0)).unwrap() = 2.0;
        let snap = layer.snapshot();
        assert_eq!(snap.layer(), LayerId(3));
        assert_eq!(snap.cell(&GridPoint::new(1, 1)), Some(&[2.0][..]));
        assert_eq!(snap.cell(&GridPoint::new(0, 1)), Some(&[0.5][..]));
    }

    #[test]
    fn from_parts_validates_length() {
        let err = LayerSnapshot::from_parts(LayerId(1), grid((0, 0), [2, 2]), 2, vec![0.0; 7]);
        assert!(matches!(err, Err(SyncError::MalformedSnapshot { expected: 8, actual: 7, .. })));
    }

    /// Compartment grid 4 wide, 4 tall, split into two vertical-stripe
    /// partitions of two rows each; the high-Y edge is permeable.
    fn boundary_setup() -> (FieldLayer, Borders) {
        let local = grid((0, 0), [4, 2]);
        let compartment = grid((0, 0), [4, 4]);
        let mut borders = Borders::for_grid(&compartment);
        borders.set_edge(Axis::Y, Side::High, EdgeKind::Permeable);
        (FieldLayer::new(LayerId(0), local, &[0.0]), borders)
    }

    #[test]
    fn merge_keeps_only_non_local_permeable_boundary_cells() {
        let (mut layer, borders) = boundary_setup();
        let remote = FieldLayer::new(LayerId(0), grid((0, 2), [4, 2]), &[7.0]);
        layer.merge_snapshot(&remote.snapshot(), &borders).unwrap();

        // Only the y == 3 row sits on the permeable high-Y boundary.
        assert_eq!(layer.ghost_len(), 4);
        assert_eq!(layer.ghost_value(&GridPoint::new(1, 3), FieldId(0)), Some(7.0));
        assert_eq!(layer.ghost_cell(&GridPoint::new(1, 2)), None);
        // Local cells are never ghosted.
        assert_eq!(layer.ghost_cell(&GridPoint::new(1, 1)), None);
    }

    #[test]
    fn merge_overwrites_stale_ghosts() {
        let (mut layer, borders) = boundary_setup();
        let mut remote = FieldLayer::new(LayerId(0), grid((0, 2), [4, 2]), &[1.0]);
        layer.merge_snapshot(&remote.snapshot(), &borders).unwrap();
        assert_eq!(layer.ghost_value(&GridPoint::new(0, 3), FieldId(0)), Some(1.0));

        // Mutation on the remote side is invisible until the next merge.
        *remote.value_mut(&GridPoint::new(0, 3), FieldId(0)).unwrap() = 4.0;
        assert_eq!(layer.ghost_value(&GridPoint::new(0, 3), FieldId(0)), Some(1.0));

        layer.merge_snapshot(&remote.snapshot(), &borders).unwrap();
        assert_eq!(layer.ghost_value(&GridPoint::new(0, 3), FieldId(0)), Some(4.0));
    }

    #[test]
    fn merge_rejects_field_count_mismatch() {
        let (mut layer, borders) = boundary_setup();
        let remote = FieldLayer::new(LayerId(0), grid((0, 2), [4, 2]), &[1.0, 2.0]);
        assert!(layer.merge_snapshot(&remote.snapshot(), &borders).is_err());
    }
}
