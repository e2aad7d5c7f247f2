//! Distributed-grid substrate boundary and field-layer storage.
//!
//! The real inter-process transport (buffer-zone exchange, message
//! routing) lives outside this workspace; this crate defines the
//! [`GridContext`] trait it must implement, the [`Partition`] wrapper the
//! compartment layer drives, the [`PushPlan`] contract ("push this set of
//! identifiers to this rank"), and the per-cell [`FieldLayer`] storage
//! with its ghost cache. [`LocalGrid`] is a single-process reference
//! substrate for tests and undistributed runs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod layer;
mod local;
mod partition;
mod push;

pub use context::GridContext;
pub use error::SyncError;
pub use layer::{FieldLayer, LayerSnapshot};
pub use local::LocalGrid;
pub use partition::{local_count, Partition};
pub use push::PushPlan;
