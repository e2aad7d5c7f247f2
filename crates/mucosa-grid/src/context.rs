//! The substrate trait implemented by the distributed grid primitive.

use crate::error::SyncError;
use crate::layer::LayerSnapshot;
use crate::push::PushPlan;
use mucosa_core::{Agent, AgentId, AgentState, GridPoint, LayerId, Rank, SpacePoint};
use mucosa_space::{GridExtents, SpaceExtents};
use smallvec::SmallVec;
use std::any::Any;

/// One compartment's distributed grid, as provided by the transport layer.
///
/// The real implementation wraps an MPI-style shared discrete space: it
/// owns this process's partition of the compartment grid, the agents
/// located there, and the collective buffer-zone machinery. This core only
/// ever drives it through this trait; [`LocalGrid`](crate::LocalGrid) is
/// the single-process reference implementation.
///
/// # Ownership queries
///
/// [`owner_rank`](GridContext::owner_rank) must answer for any cell of the
/// compartment grid and for cells up to one step beyond its edges; how the
/// halo resolves (periodic process grid, clamping) is the substrate's
/// process-topology decision.
///
/// # Collective calls
///
/// The two `exchange_*` methods are collective: every rank in the run must
/// call them in phase-aligned lockstep, and they block until the round
/// completes for this process. Both also perform the substrate's own
/// intra-compartment buffer-zone exchange; the plan argument only carries
/// the *additional* cross-compartment pushes selected by the caller.
pub trait GridContext: Any {
    /// This process's rank.
    fn rank(&self) -> Rank;

    /// Number of processes in the run.
    fn world_size(&self) -> usize;

    /// Continuous-space bounds of the local partition.
    fn local_space(&self) -> SpaceExtents;

    /// Grid bounds of the local partition.
    fn local_grid(&self) -> GridExtents;

    /// The rank owning `pt`, which may lie up to one cell outside the
    /// compartment grid (see trait docs).
    fn owner_rank(&self, pt: GridPoint) -> Option<Rank>;

    /// Place an agent at a continuous-space location. Returns `false` if
    /// the location is outside the compartment space or the id is already
    /// present.
    fn add_agent(&mut self, agent: Agent, pt: SpacePoint) -> bool;

    /// Remove and return an agent.
    fn remove_agent(&mut self, id: AgentId) -> Option<Agent>;

    /// Move an existing agent to a new location. Returns `false` if the
    /// agent is unknown or the location is outside the compartment space.
    fn move_agent(&mut self, id: AgentId, pt: SpacePoint) -> bool;

    /// Current location of an agent.
    fn location(&self, id: AgentId) -> Option<SpacePoint>;

    /// The agent record for an id.
    fn agent(&self, id: AgentId) -> Option<Agent>;

    /// Overwrite an agent's opaque state. Returns `false` if unknown.
    fn set_state(&mut self, id: AgentId, state: AgentState) -> bool;

    /// All agents whose location falls in grid cell `pt`.
    fn agents_at(&self, pt: GridPoint) -> SmallVec<[Agent; 8]>;

    /// Collective agent exchange for this phase (see trait docs).
    fn exchange_agents(&mut self, extra: &PushPlan<AgentId>) -> Result<(), SyncError>;

    /// Collective field-layer exchange for this phase (see trait docs).
    ///
    /// `local` is this partition's snapshot; `extra` names the ranks that
    /// must additionally receive it. Returns the non-local snapshots this
    /// process received in the round.
    fn exchange_layers(
        &mut self,
        local: LayerSnapshot,
        extra: &PushPlan<LayerId>,
    ) -> Result<Vec<LayerSnapshot>, SyncError>;
}

impl dyn GridContext {
    /// Attempt to downcast to a concrete substrate type.
    ///
    /// Lets tests and substrate-aware callers reach past the trait object
    /// without widening the trait itself.
    pub fn downcast_ref<T: GridContext>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Mutable counterpart of [`downcast_ref`](Self::downcast_ref).
    pub fn downcast_mut<T: GridContext>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}
