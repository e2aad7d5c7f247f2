//! Single-process reference substrate.

use crate::context::GridContext;
use crate::error::SyncError;
use crate::layer::LayerSnapshot;
use crate::push::PushPlan;
use indexmap::IndexMap;
use mucosa_core::{Agent, AgentId, AgentState, Axis, GridPoint, LayerId, Rank, SpacePoint};
use mucosa_space::{GridExtents, SpaceExtents};
use smallvec::SmallVec;

/// A [`GridContext`] for undistributed runs and tests: one process owns
/// the entire compartment.
///
/// Agent storage is a flat id-indexed map scanned on cell queries; fine
/// for the agent counts this substrate is meant for. Exchange calls are
/// loopback no-ops — with a world of one there is nobody to push to.
pub struct LocalGrid {
    space: SpaceExtents,
    grid: GridExtents,
    cell_size: f64,
    agents: IndexMap<AgentId, (Agent, SpacePoint)>,
}

impl LocalGrid {
    /// A grid owning all of `space` / `grid`.
    pub fn new(space: SpaceExtents, grid: GridExtents) -> Self {
        let cell_size = space.extent(Axis::X) / grid.extent(Axis::X) as f64;
        Self {
            space,
            grid,
            cell_size,
            agents: IndexMap::new(),
        }
    }

    /// Number of stored agents.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    fn cell_of(&self, pt: &SpacePoint) -> GridPoint {
        let mut out = GridPoint::new(0, 0);
        for axis in Axis::BOTH {
            let offset = (pt[axis] - self.space.origin(axis)) / self.cell_size;
            out[axis] = self.grid.origin(axis) + offset.floor() as i32;
        }
        out
    }
}

impl GridContext for LocalGrid {
    fn rank(&self) -> Rank {
        Rank(0)
    }

    fn world_size(&self) -> usize {
        1
    }

    fn local_space(&self) -> SpaceExtents {
        self.space
    }

    fn local_grid(&self) -> GridExtents {
        self.grid
    }

    fn owner_rank(&self, _pt: GridPoint) -> Option<Rank> {
        // Single process: the halo resolves to the only rank there is.
        Some(Rank(0))
    }

    fn add_agent(&mut self, agent: Agent, pt: SpacePoint) -> bool {
        if !self.space.contains(&pt) || self.agents.contains_key(&agent.id) {
            return false;
        }
        self.agents.insert(agent.id, (agent, pt));
        true
    }

    fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.shift_remove(&id).map(|(agent, _)| agent)
    }

    fn move_agent(&mut self, id: AgentId, pt: SpacePoint) -> bool {
        if !self.space.contains(&pt) {
            return false;
        }
        match self.agents.get_mut(&id) {
            Some(entry) => {
                entry.1 = pt;
                true
            }
            None => false,
        }
    }

    fn location(&self, id: AgentId) -> Option<SpacePoint> {
        self.agents.get(&id).map(|(_, pt)| *pt)
    }

    fn agent(&self, id: AgentId) -> Option<Agent> {
        self.agents.get(&id).map(|(agent, _)| *agent)
    }

    fn set_state(&mut self, id: AgentId, state: AgentState) -> bool {
        match self.agents.get_mut(&id) {
            Some(entry) => {
                entry.0.state = state;
                true
            }
            None => false,
        }
    }

    fn agents_at(&self, pt: GridPoint) -> SmallVec<[Agent; 8]> {
        self.agents
            .values()
            .filter(|(_, loc)| self.cell_of(loc) == pt)
            .map(|(agent, _)| *agent)
            .collect()
    }

    fn exchange_agents(&mut self, _extra: &PushPlan<AgentId>) -> Result<(), SyncError> {
        Ok(())
    }

    fn exchange_layers(
        &mut self,
        _local: LayerSnapshot,
        _extra: &PushPlan<LayerId>,
    ) -> Result<Vec<LayerSnapshot>, SyncError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mucosa_core::AgentClass;

    fn local_grid() -> LocalGrid {
        let space = SpaceExtents::new(SpacePoint::new(0.0, 0.0), [10.0, 10.0]).unwrap();
        let grid = GridExtents::new(GridPoint::new(0, 0), [10, 10]).unwrap();
        LocalGrid::new(space, grid)
    }

    fn agent() -> Agent {
        Agent::new(AgentClass(0), AgentState(0))
    }

    #[test]
    fn add_move_remove_lifecycle() {
        let mut g = local_grid();
        let a = agent();
        assert!(g.add_agent(a, SpacePoint::new(1.5, 2.5)));
        assert!(!g.add_agent(a, SpacePoint::new(3.0, 3.0)), "duplicate id");
        assert_eq!(g.location(a.id), Some(SpacePoint::new(1.5, 2.5)));

        assert!(g.move_agent(a.id, SpacePoint::new(7.25, 0.5)));
        assert_eq!(g.agents_at(GridPoint::new(7, 0)).len(), 1);
        assert!(g.agents_at(GridPoint::new(1, 2)).is_empty());

        assert_eq!(g.remove_agent(a.id).map(|a| a.id), Some(a.id));
        assert_eq!(g.location(a.id), None);
    }

    #[test]
    fn rejects_out_of_space_locations() {
        let mut g = local_grid();
        let a = agent();
        assert!(!g.add_agent(a, SpacePoint::new(10.0, 5.0)));
        assert!(g.add_agent(a, SpacePoint::new(9.999, 5.0)));
        assert!(!g.move_agent(a.id, SpacePoint::new(-0.1, 5.0)));
    }

    #[test]
    fn set_state_is_visible_in_queries() {
        let mut g = local_grid();
        let a = agent();
        g.add_agent(a, SpacePoint::new(4.5, 4.5));
        assert!(g.set_state(a.id, AgentState(3)));
        let found = g.agents_at(GridPoint::new(4, 4));
        assert_eq!(found[0].state, AgentState(3));
    }

    #[test]
    fn exchanges_are_loopback_noops() {
        let mut g = local_grid();
        assert!(g.exchange_agents(&PushPlan::new()).is_ok());
        let snap = LayerSnapshot::from_parts(
            LayerId(0),
            GridExtents::new(GridPoint::new(0, 0), [10, 10]).unwrap(),
            0,
            Vec::new(),
        )
        .unwrap();
        assert_eq!(g.exchange_layers(snap, &PushPlan::new()).unwrap(), Vec::new());
    }
}
