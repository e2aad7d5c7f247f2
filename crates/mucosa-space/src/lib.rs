//! Rectangular domains, border classification, and grid iteration.
//!
//! Leaf spatial crate: nothing here knows about compartments, partitions,
//! or processes. [`Borders`] classifies coordinates against a rectangle and
//! computes signed edge distances; the wrap-versus-reflect consequence of a
//! crossing is always the caller's decision.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod border;
mod error;
mod extent;
mod iter;

pub use border::{Borders, BoundState, BoundsReport, EdgeKind};
pub use error::SpaceError;
pub use extent::{GridExtents, SpaceExtents};
pub use iter::GridIterator;
