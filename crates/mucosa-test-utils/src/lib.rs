//! Test utilities and mock substrates for Mucosa development.
//!
//! Provides [`StripedGrid`], a deterministic multi-rank mock of the
//! [`GridContext`] substrate trait: it simulates one rank of a striped
//! domain decomposition, answers ownership queries from a periodic
//! process topology, and records every collective exchange so tests can
//! assert on the push plans the core produced.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use indexmap::IndexMap;
use mucosa_core::{
    Agent, AgentId, AgentState, Axis, GridPoint, LayerId, Rank, SpacePoint,
};
use mucosa_grid::{local_count, GridContext, LayerSnapshot, PushPlan, SyncError};
use mucosa_space::{GridExtents, SpaceExtents};
use smallvec::SmallVec;
use std::collections::VecDeque;

/// One rank of a striped decomposition of a compartment grid.
///
/// The compartment grid is cut into `world_size` stripes along one axis,
/// sized by [`local_count`]; this instance plays `rank`, owning the
/// corresponding stripe. Ownership queries wrap periodically, matching
/// the periodic process grid of the real transport: one step past the low
/// edge of the grid resolves to the stripe at the high edge, and vice
/// versa.
///
/// Nothing actually crosses process boundaries. `exchange_agents` and
/// `exchange_layers` record the plans (and snapshots) they were handed,
/// and layer exchanges drain a queue of scripted incoming snapshots so
/// tests can play the receiving side.
pub struct StripedGrid {
    axis: Axis,
    rank: Rank,
    world_size: usize,
    space: SpaceExtents,
    grid: GridExtents,
    local_space: SpaceExtents,
    local_grid: GridExtents,
    agents: IndexMap<AgentId, (Agent, SpacePoint)>,
    agent_plans: Vec<PushPlan<AgentId>>,
    layer_plans: Vec<(LayerSnapshot, PushPlan<LayerId>)>,
    incoming: VecDeque<Vec<LayerSnapshot>>,
}

impl StripedGrid {
    /// Mock rank `rank` of `world_size`, striping `grid` along `axis`.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is outside the world or the stripe would be empty;
    /// mocks fail loudly rather than returning errors.
    pub fn new(
        space: SpaceExtents,
        grid: GridExtents,
        axis: Axis,
        rank: Rank,
        world_size: usize,
    ) -> Self {
        assert!((rank.0 as usize) < world_size, "rank outside the world");
        let share = local_count(grid.extent(axis) as usize, rank, world_size);
        assert!(share > 0, "stripe for rank {rank} would be empty");

        let mut origin = grid.origin_point();
        origin[axis] = stripe_start(&grid, axis, rank, world_size);
        let mut extents = [grid.extent(Axis::X), grid.extent(Axis::Y)];
        extents[axis.index()] = share as i32;
        let local_grid =
            GridExtents::new(origin, extents).unwrap_or_else(|err| panic!("stripe extents: {err}"));

        let local_space = space_of(&space, &grid, &local_grid);

        Self {
            axis,
            rank,
            world_size,
            space,
            grid,
            local_space,
            local_grid,
            agents: IndexMap::new(),
            agent_plans: Vec::new(),
            layer_plans: Vec::new(),
            incoming: VecDeque::new(),
        }
    }

    /// Script the snapshots the next layer exchange will "receive".
    pub fn queue_incoming(&mut self, snapshots: Vec<LayerSnapshot>) {
        self.incoming.push_back(snapshots);
    }

    /// Every plan handed to `exchange_agents`, in call order.
    pub fn agent_plans(&self) -> &[PushPlan<AgentId>] {
        &self.agent_plans
    }

    /// Every `(snapshot, plan)` handed to `exchange_layers`, in call order.
    pub fn layer_plans(&self) -> &[(LayerSnapshot, PushPlan<LayerId>)] {
        &self.layer_plans
    }

    /// The stripe owning a grid coordinate on the decomposition axis,
    /// wrapped periodically into the grid.
    fn stripe_of(&self, coord: i32) -> Rank {
        let extent = self.grid.extent(self.axis);
        let origin = self.grid.origin(self.axis);
        let wrapped = origin + (coord - origin).rem_euclid(extent);
        for r in 0..self.world_size {
            let rank = Rank(r as u32);
            let start = stripe_start(&self.grid, self.axis, rank, self.world_size);
            let share = local_count(extent as usize, rank, self.world_size) as i32;
            if wrapped >= start && wrapped < start + share {
                return rank;
            }
        }
        unreachable!("wrapped coordinate {wrapped} outside every stripe")
    }

    fn cell_of(&self, pt: &SpacePoint) -> GridPoint {
        let mut out = GridPoint::new(0, 0);
        for axis in Axis::BOTH {
            let cell = self.space.extent(axis) / self.grid.extent(axis) as f64;
            let offset = (pt[axis] - self.space.origin(axis)) / cell;
            out[axis] = self.grid.origin(axis) + offset.floor() as i32;
        }
        out
    }
}

/// First cell of `rank`'s stripe along `axis`.
fn stripe_start(grid: &GridExtents, axis: Axis, rank: Rank, world_size: usize) -> i32 {
    let extent = grid.extent(axis) as usize;
    let before: usize = (0..rank.0)
        .map(|r| local_count(extent, Rank(r), world_size))
        .sum();
    grid.origin(axis) + before as i32
}

/// The sub-rectangle of `space` covered by `local` cells of `grid`.
fn space_of(space: &SpaceExtents, grid: &GridExtents, local: &GridExtents) -> SpaceExtents {
    let mut origin = SpacePoint::new(0.0, 0.0);
    let mut extents = [0.0; 2];
    for axis in Axis::BOTH {
        let cell = space.extent(axis) / grid.extent(axis) as f64;
        origin[axis] = space.origin(axis) + (local.origin(axis) - grid.origin(axis)) as f64 * cell;
        extents[axis.index()] = local.extent(axis) as f64 * cell;
    }
    SpaceExtents::new(origin, extents).unwrap_or_else(|err| panic!("stripe space: {err}"))
}

impl GridContext for StripedGrid {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn world_size(&self) -> usize {
        self.world_size
    }

    fn local_space(&self) -> SpaceExtents {
        self.local_space
    }

    fn local_grid(&self) -> GridExtents {
        self.local_grid
    }

    fn owner_rank(&self, pt: GridPoint) -> Option<Rank> {
        Some(self.stripe_of(pt[self.axis]))
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

    fn exchange_agents(&mut self, extra: &PushPlan<AgentId>) -> Result<(), SyncError> {
        self.agent_plans.push(extra.clone());
        Ok(())
    }

    fn exchange_layers(
        &mut self,
        local: LayerSnapshot,
        extra: &PushPlan<LayerId>,
    ) -> Result<Vec<LayerSnapshot>, SyncError> {
        self.layer_plans.push((local, extra.clone()));
        Ok(self.incoming.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mucosa_core::AgentClass;

    fn grid_10() -> (SpaceExtents, GridExtents) {
        (
            SpaceExtents::new(SpacePoint::new(0.0, 0.0), [10.0, 10.0]).unwrap(),
            GridExtents::new(GridPoint::new(0, 0), [10, 10]).unwrap(),
        )
    }

    #[test]
    fn stripes_partition_the_grid() {
        let (space, grid) = grid_10();
        let g0 = StripedGrid::new(space, grid, Axis::Y, Rank(0), 3);
        let g1 = StripedGrid::new(space, grid, Axis::Y, Rank(1), 3);
        let g2 = StripedGrid::new(space, grid, Axis::Y, Rank(2), 3);

        // 10 rows over 3 ranks: 4 + 3 + 3.
        assert_eq!(g0.local_grid().origin(Axis::Y), 0);
        assert_eq!(g0.local_grid().extent(Axis::Y), 4);
        assert_eq!(g1.local_grid().origin(Axis::Y), 4);
        assert_eq!(g1.local_grid().extent(Axis::Y), 3);
        assert_eq!(g2.local_grid().origin(Axis::Y), 7);
        assert_eq!(g2.local_grid().extent(Axis::Y), 3);
        // Stripes span the full perpendicular axis.
        assert_eq!(g1.local_grid().extent(Axis::X), 10);

        assert_eq!(g0.local_space().origin(Axis::Y), 0.0);
        assert_eq!(g1.local_space().origin(Axis::Y), 4.0);
        assert_eq!(g1.local_space().extent(Axis::Y), 3.0);
    }

    #[test]
    fn ownership_follows_stripes() {
        let (space, grid) = grid_10();
        let g = StripedGrid::new(space, grid, Axis::Y, Rank(0), 3);
        assert_eq!(g.owner_rank(GridPoint::new(5, 0)), Some(Rank(0)));
        assert_eq!(g.owner_rank(GridPoint::new(5, 3)), Some(Rank(0)));
        assert_eq!(g.owner_rank(GridPoint::new(5, 4)), Some(Rank(1)));
        assert_eq!(g.owner_rank(GridPoint::new(5, 9)), Some(Rank(2)));
    }

    #[test]
    fn ownership_wraps_periodically_at_the_halo() {
        let (space, grid) = grid_10();
        let g = StripedGrid::new(space, grid, Axis::Y, Rank(0), 2);
        // One step below row 0 wraps to row 9 (rank 1); one step above
        // row 9 wraps to row 0 (rank 0).
        assert_eq!(g.owner_rank(GridPoint::new(3, -1)), Some(Rank(1)));
        assert_eq!(g.owner_rank(GridPoint::new(3, 10)), Some(Rank(0)));
    }

    #[test]
    fn records_exchanges_and_replays_scripted_snapshots() {
        let (space, grid) = grid_10();
        let mut g = StripedGrid::new(space, grid, Axis::Y, Rank(0), 2);

        let mut plan = PushPlan::new();
        plan.insert(Rank(1), AgentId(7));
        g.exchange_agents(&plan).unwrap();
        assert_eq!(g.agent_plans(), &[plan]);

        let snap = LayerSnapshot::from_parts(LayerId(2), g.local_grid(), 1, vec![0.0; 50]).unwrap();
        g.queue_incoming(vec![snap.clone()]);
        let received = g
            .exchange_layers(snap.clone(), &PushPlan::new())
            .unwrap();
        assert_eq!(received, vec![snap.clone()]);
        // Queue drained: the next round receives nothing.
        assert!(g.exchange_layers(snap, &PushPlan::new()).unwrap().is_empty());
        assert_eq!(g.layer_plans().len(), 2);
    }

    #[test]
    fn agents_live_in_the_full_compartment_space() {
        let (space, grid) = grid_10();
        let mut g = StripedGrid::new(space, grid, Axis::Y, Rank(0), 2);
        let a = Agent::new(AgentClass(0), AgentState(0));
        assert!(g.add_agent(a, SpacePoint::new(2.5, 8.5)));
        assert_eq!(g.agents_at(GridPoint::new(2, 8)).len(), 1);
    }
}
