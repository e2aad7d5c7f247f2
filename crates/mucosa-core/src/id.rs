//! Strongly-typed identifiers.

use crate::kind::CompartmentKind;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a process within a distributed run.
///
/// Rank `0` is conventionally the root process. Ranks are assigned by the
/// transport layer and are stable for the lifetime of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for unique [`AgentId`] allocation.
static AGENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-wide unique agent identity.
///
/// The core moves, queries, and relocates agents by identity; it never
/// interprets the agent's state. Identities created on different processes
/// are disambiguated by the transport; within a process
/// [`AgentId::next`] hands out ids from a monotonic atomic counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u64);

impl AgentId {
    /// Allocate a fresh, process-unique agent id.
    ///
    /// Each call returns an id that has never been returned before within
    /// this process. Thread-safe.
    pub fn next() -> Self {
        Self(AGENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a registered field (cytokine) within a compartment.
///
/// Fields are registered in order; `FieldId(n)` is the n-th slot of every
/// per-cell value vector in that compartment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a compartment's field layer during synchronization.
///
/// A compartment owns exactly one field layer, so the id is derived from
/// the compartment kind; layer snapshots pushed across processes carry it
/// so receivers can route them to the right compartment instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

impl LayerId {
    /// The layer id of `kind`'s field layer.
    pub fn for_compartment(kind: CompartmentKind) -> Self {
        Self(kind.index() as u32)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classifies an agent (bacterium, epithelial cell, T cell, ...).
///
/// Interpreted only by the external rule components; the core uses it as an
/// opaque filter key for spatial queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentClass(pub u32);

impl fmt::Display for AgentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque agent state, carried but never interpreted by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentState(pub u32);

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
