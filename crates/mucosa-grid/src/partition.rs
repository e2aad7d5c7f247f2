//! Partition sizing and the wrapper around the substrate trait object.

use crate::context::GridContext;
use crate::error::SyncError;
use crate::layer::LayerSnapshot;
use crate::push::PushPlan;
use mucosa_core::{
    Agent, AgentClass, AgentId, AgentState, Axis, GridPoint, LayerId, Rank, SpacePoint,
};
use mucosa_space::{GridExtents, SpaceExtents};
use smallvec::SmallVec;

/// Load-balanced share of `global` items owned by `rank` out of
/// `world_size` processes.
///
/// Every rank receives `global / world_size`; ranks below the remainder
/// receive one extra, so summing over all ranks reproduces `global`
/// exactly and no two shares differ by more than one.
pub fn local_count(global: usize, rank: Rank, world_size: usize) -> usize {
    debug_assert!(world_size >= 1, "world size must be at least 1");
    let base = global / world_size;
    let remainder = global - base * world_size;
    base + usize::from((rank.0 as usize) < remainder)
}

/// A compartment's view of its local partition of the distributed grid.
///
/// Owns the substrate trait object and layers the compartment-level
/// conveniences over it: continuous ↔ grid coordinate conversion at the
/// compartment's cell size, offset rank queries, and class-filtered cell
/// queries. Everything stateful lives in the substrate.
pub struct Partition {
    ctx: Box<dyn GridContext>,
    cell_size: f64,
    space: SpaceExtents,
    grid: GridExtents,
}

impl Partition {
    /// Wrap a substrate for a compartment with the given full extents and
    /// cell size.
    pub fn new(
        ctx: Box<dyn GridContext>,
        cell_size: f64,
        space: SpaceExtents,
        grid: GridExtents,
    ) -> Self {
        Self {
            ctx,
            cell_size,
            space,
            grid,
        }
    }

    /// This process's rank.
    pub fn rank(&self) -> Rank {
        self.ctx.rank()
    }

    /// Number of processes in the run.
    pub fn world_size(&self) -> usize {
        self.ctx.world_size()
    }

    /// Full compartment space bounds.
    pub fn space(&self) -> &SpaceExtents {
        &self.space
    }

    /// Full compartment grid bounds.
    pub fn grid(&self) -> &GridExtents {
        &self.grid
    }

    /// Continuous-space bounds of the local partition.
    pub fn local_space(&self) -> SpaceExtents {
        self.ctx.local_space()
    }

    /// Grid bounds of the local partition.
    pub fn local_grid(&self) -> GridExtents {
        self.ctx.local_grid()
    }

    /// Grid cell containing a continuous-space point.
    pub fn space_to_grid(&self, pt: &SpacePoint) -> GridPoint {
        let mut out = GridPoint::new(0, 0);
        for axis in Axis::BOTH {
            let offset = (pt[axis] - self.space.origin(axis)) / self.cell_size;
            out[axis] = self.grid.origin(axis) + offset.floor() as i32;
        }
        out
    }

    /// Center of a grid cell in continuous space.
    pub fn grid_to_space(&self, pt: &GridPoint) -> SpacePoint {
        let mut out = SpacePoint::new(0.0, 0.0);
        for axis in Axis::BOTH {
            let cells = (pt[axis] - self.grid.origin(axis)) as f64;
            out[axis] = self.space.origin(axis) + (cells + 0.5) * self.cell_size;
        }
        out
    }

    /// The rank owning grid cell `pt`.
    pub fn owner_rank(&self, pt: GridPoint) -> Option<Rank> {
        self.ctx.owner_rank(pt)
    }

    /// The rank owning the cell `(dx, dy)` away from `pt`.
    pub fn rank_at(&self, pt: GridPoint, dx: i32, dy: i32) -> Option<Rank> {
        self.ctx.owner_rank(pt.offset(dx, dy))
    }

    /// Place an agent. See [`GridContext::add_agent`].
    pub fn add_agent(&mut self, agent: Agent, pt: SpacePoint) -> bool {
        self.ctx.add_agent(agent, pt)
    }

    /// Remove and return an agent.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        self.ctx.remove_agent(id)
    }

    /// Move an existing agent.
    pub fn move_agent(&mut self, id: AgentId, pt: SpacePoint) -> bool {
        self.ctx.move_agent(id, pt)
    }

    /// Current location of an agent.
    pub fn location(&self, id: AgentId) -> Option<SpacePoint> {
        self.ctx.location(id)
    }

    /// The agent record for an id.
    pub fn agent(&self, id: AgentId) -> Option<Agent> {
        self.ctx.agent(id)
    }

    /// Overwrite an agent's opaque state.
    pub fn set_state(&mut self, id: AgentId, state: AgentState) -> bool {
        self.ctx.set_state(id, state)
    }

    /// Agents in grid cell `pt`, optionally restricted to one class.
    pub fn agents_at(&self, pt: GridPoint, class: Option<AgentClass>) -> SmallVec<[Agent; 8]> {
        let mut agents = self.ctx.agents_at(pt);
        if let Some(class) = class {
            agents.retain(|a| a.class == class);
        }
        agents
    }

    /// Collective agent exchange.
    pub fn exchange_agents(&mut self, extra: &PushPlan<AgentId>) -> Result<(), SyncError> {
        self.ctx.exchange_agents(extra)
    }

    /// Collective field-layer exchange.
    pub fn exchange_layers(
        &mut self,
        local: LayerSnapshot,
        extra: &PushPlan<LayerId>,
    ) -> Result<Vec<LayerSnapshot>, SyncError> {
        self.ctx.exchange_layers(local, extra)
    }

    /// The substrate trait object, for downcasting.
    pub fn context(&self) -> &dyn GridContext {
        self.ctx.as_ref()
    }

    /// Mutable substrate trait object.
    pub fn context_mut(&mut self) -> &mut dyn GridContext {
        self.ctx.as_mut()
    }
}
