//! Mucosa: the distributed spatial core of a grid-based tissue simulation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Mucosa sub-crates. For most users, adding `mucosa` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use mucosa::prelude::*;
//!
//! // Two stacked compartments joined along their shared Y edge.
//! let lumen = CompartmentConfig::new(CompartmentKind::Lumen, 10.0, 10.0, 1.0).border(
//!     Axis::Y,
//!     Side::High,
//!     BorderSpec::Compartment(CompartmentKind::Epithelium),
//! );
//! let epithelium = CompartmentConfig::new(CompartmentKind::Epithelium, 10.0, 4.0, 1.0).border(
//!     Axis::Y,
//!     Side::Low,
//!     BorderSpec::Compartment(CompartmentKind::Lumen),
//! );
//!
//! let mut tissue = Tissue::new();
//! for config in [lumen, epithelium] {
//!     let (space, grid, _) = config.resolved_extents().unwrap();
//!     tissue
//!         .build(&config, Box::new(LocalGrid::new(space, grid)))
//!         .unwrap();
//! }
//!
//! // A microbe near the top of the lumen...
//! let microbe = Agent::new(AgentClass(0), AgentState(0));
//! tissue
//!     .get_mut(CompartmentKind::Lumen)
//!     .unwrap()
//!     .add_agent(microbe, SpacePoint::new(5.0, 9.5));
//!
//! // ...crosses the permeable edge and lands in the epithelium's frame.
//! let accepted = tissue
//!     .move_to(CompartmentKind::Lumen, microbe.id, SpacePoint::new(5.0, 10.5))
//!     .unwrap();
//! assert!(accepted);
//! let epithelium = tissue.get(CompartmentKind::Epithelium).unwrap();
//! assert_eq!(epithelium.location(microbe.id), Some(SpacePoint::new(5.0, 0.5)));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `mucosa-core` | IDs, kinds, points, the agent record |
//! | [`space`] | `mucosa-space` | Extents, borders, the grid iterator |
//! | [`grid`] | `mucosa-grid` | Substrate trait, partition, layers, push plans |
//! | [`compartment`] | `mucosa-compartment` | Compartments, the tissue registry, sync |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and identifiers (`mucosa-core`).
///
/// Strongly-typed ids, [`types::CompartmentKind`], the 2D point types, and
/// the [`types::Agent`] record.
pub use mucosa_core as types;

/// Rectangular domains and border semantics (`mucosa-space`).
///
/// [`space::SpaceExtents`]/[`space::GridExtents`], [`space::Borders`] with
/// per-edge permeability and mirror reflection, and the restartable
/// [`space::GridIterator`].
pub use mucosa_space as space;

/// The distributed-grid substrate boundary (`mucosa-grid`).
///
/// The [`grid::GridContext`] trait the transport implements, the
/// [`grid::Partition`] wrapper, [`grid::PushPlan`], and per-cell
/// [`grid::FieldLayer`] storage with its ghost cache.
pub use mucosa_grid as grid;

/// Compartments and the tissue registry (`mucosa-compartment`).
///
/// [`compartment::Compartment`], [`compartment::CompartmentConfig`], the
/// [`compartment::Tissue`] registry, and the two synchronization
/// protocols.
pub use mucosa_compartment as compartment;

/// Common imports for typical Mucosa usage.
///
/// ```rust
/// use mucosa::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mucosa_core::{
        Agent, AgentClass, AgentId, AgentState, Axis, CompartmentKind, FieldDef, FieldId,
        GridPoint, LayerId, Rank, Side, SpacePoint,
    };

    // Space
    pub use mucosa_space::{
        Borders, BoundState, EdgeKind, GridExtents, GridIterator, SpaceError, SpaceExtents,
    };

    // Grid substrate
    pub use mucosa_grid::{
        FieldLayer, GridContext, LayerSnapshot, LocalGrid, Partition, PushPlan, SyncError,
    };

    // Compartments
    pub use mucosa_compartment::{
        BorderSpec, Compartment, CompartmentConfig, ConfigError, FieldError, FieldSlot, MoveError,
        Tissue,
    };
}
