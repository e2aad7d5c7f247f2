//! Compartment orchestration for the Mucosa tissue model.
//!
//! A [`Compartment`] couples one spatial region's geometry and borders to
//! its partition of the distributed grid: agent placement and seeded
//! random motion, field (cytokine) registration and per-cell access, and
//! the two collective synchronization protocols that push border agents
//! and field layers to the ranks across a compartment boundary.
//!
//! The [`Tissue`] registry holds at most one compartment per kind and
//! carries every operation that crosses frames: coordinate transforms into
//! a neighboring compartment, directed [`Tissue::move_to`] transfers, and
//! offset queries that follow a coordinate over the border.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod compartment;
mod config;
mod error;
mod registry;
mod sync;

pub use compartment::{Compartment, FieldSlot};
pub use config::{BorderSpec, CompartmentConfig};
pub use error::{ConfigError, FieldError, MoveError};
pub use registry::Tissue;
