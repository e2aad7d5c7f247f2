//! Core types for the Mucosa tissue simulation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! fundamental vocabulary shared across the workspace: strongly-typed
//! identifiers, the compartment enumeration, 2D coordinate types, the agent
//! record, and field definitions.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod agent;
mod field;
mod id;
mod kind;
mod point;

pub use agent::Agent;
pub use field::FieldDef;
pub use id::{AgentClass, AgentId, AgentState, FieldId, LayerId, Rank};
pub use kind::CompartmentKind;
pub use point::{Axis, GridPoint, Side, SpacePoint};
