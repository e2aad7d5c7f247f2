//! Compartment geometry and adjacency configuration.

use crate::error::ConfigError;
use mucosa_core::{Axis, CompartmentKind, GridPoint, Side, SpacePoint};
use mucosa_space::{GridExtents, SpaceExtents};

/// What lies beyond one edge of a compartment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderSpec {
    /// A hard wall; agents crossing it are reflected back inside.
    Wall,
    /// Another compartment; agents crossing it are handed over.
    Compartment(CompartmentKind),
}

/// Builder for one compartment's geometry, borders, and RNG seed.
///
/// Dimensions are requested in continuous-space units; [`resolved_extents`]
/// rounds them so the grid tiles the space exactly (the space is widened to
/// the next whole cell, never truncated). All borders default to
/// [`BorderSpec::Wall`].
///
/// [`resolved_extents`]: CompartmentConfig::resolved_extents
#[derive(Clone, Debug)]
pub struct CompartmentConfig {
    kind: CompartmentKind,
    space: [f64; 2],
    cell_size: f64,
    borders: [[BorderSpec; 2]; 2],
    seed: u64,
}

impl CompartmentConfig {
    /// Start a configuration for `kind` with the requested dimensions.
    ///
    /// The RNG seed defaults to the kind's index so that distinct
    /// compartments draw distinct streams even when left unseeded.
    pub fn new(kind: CompartmentKind, width: f64, height: f64, cell_size: f64) -> Self {
        Self {
            kind,
            space: [width, height],
            cell_size,
            borders: [[BorderSpec::Wall; 2]; 2],
            seed: kind.index() as u64,
        }
    }

    /// Declare what lies beyond the `(axis, side)` edge.
    pub fn border(mut self, axis: Axis, side: Side, spec: BorderSpec) -> Self {
        self.borders[axis.index()][side.index()] = spec;
        self
    }

    /// Override the movement RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The compartment being configured.
    pub fn kind(&self) -> CompartmentKind {
        self.kind
    }

    /// The configured spec for one edge.
    pub fn border_spec(&self, axis: Axis, side: Side) -> BorderSpec {
        self.borders[axis.index()][side.index()]
    }

    /// The configured RNG seed.
    pub fn rng_seed(&self) -> u64 {
        self.seed
    }

    /// Check dimensions, cell size, and adjacency for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for axis in Axis::BOTH {
            let v = self.space[axis.index()];
            if !v.is_finite() {
                return Err(ConfigError::NonFiniteExtent { axis, value: v });
            }
            if v <= 0.0 {
                return Err(ConfigError::NonPositiveExtent { axis, value: v });
            }
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::NonPositiveCellSize {
                value: self.cell_size,
            });
        }
        for axis in Axis::BOTH {
            for side in Side::BOTH {
                if self.border_spec(axis, side) == BorderSpec::Compartment(self.kind) {
                    return Err(ConfigError::SelfAdjacent { kind: self.kind });
                }
            }
        }
        Ok(())
    }

    /// The space and grid rectangles this configuration resolves to, with
    /// the cell size.
    ///
    /// The grid gets `ceil(requested / cell_size)` cells per axis and the
    /// space is re-derived as `cells * cell_size`, so every cell has the
    /// same size and the grid covers the whole space. Origins are zero.
    pub fn resolved_extents(&self) -> Result<(SpaceExtents, GridExtents, f64), ConfigError> {
        self.validate()?;
        let mut cells = [0i32; 2];
        let mut sized = [0.0f64; 2];
        for axis in Axis::BOTH {
            let n = (self.space[axis.index()] / self.cell_size).ceil().max(1.0);
            cells[axis.index()] = n as i32;
            sized[axis.index()] = n * self.cell_size;
        }
        let space = SpaceExtents::new(SpacePoint::new(0.0, 0.0), sized)?;
        let grid = GridExtents::new(GridPoint::new(0, 0), cells)?;
        Ok((space, grid, self.cell_size))
    }
}
