//! Push-plan construction for the two synchronization protocols.
//!
//! The substrate handles intra-compartment buffer zones on its own; what
//! this module computes is the *additional* cross-compartment traffic: for
//! every edge where a neighbor compartment is configured and this
//! partition actually reaches the compartment border, the agents (or the
//! layer id) of the border row/column, grouped by the rank owning the
//! cell one step across the edge.

use crate::compartment::Compartment;
use mucosa_core::{AgentId, Axis, LayerId, Side};
use mucosa_grid::PushPlan;
use smallvec::SmallVec;

/// The edges where this partition touches a configured neighbor.
///
/// An edge qualifies when an adjacency is configured for it and the local
/// partition's corner coincides with the compartment border on that axis
/// (within half a grid unit — interior partitions of a striped
/// decomposition never push across compartments).
pub(crate) fn border_edges(c: &Compartment) -> SmallVec<[(Axis, Side); 4]> {
    let local = c.partition().local_grid();
    let mut out = SmallVec::new();
    for axis in Axis::BOTH {
        for side in Side::BOTH {
            if c.adjacent(axis, side).is_none() {
                continue;
            }
            let corner = match side {
                Side::Low => local.low_corner(),
                Side::High => local.high_corner(),
            };
            let distance = c.grid_borders().distance_from_border(&corner, axis, side);
            if distance.abs() < 0.5 {
                out.push((axis, side));
            }
        }
    }
    out
}

/// Agents sitting on qualifying border rows/columns, grouped by the rank
/// owning the cell one step across. Own-rank groups are dropped.
pub(crate) fn agent_push_plan(c: &Compartment) -> PushPlan<AgentId> {
    let mut plan = PushPlan::new();
    let partition = c.partition();
    let local = partition.local_grid();
    let own = partition.rank();
    for (axis, side) in border_edges(c) {
        let (dx, dy) = offset_across(axis, side);
        for cell in local.edge_cells(axis, side) {
            let Some(target) = partition.rank_at(cell, dx, dy) else {
                continue;
            };
            if target == own {
                continue;
            }
            for agent in partition.agents_at(cell, None) {
                plan.insert(target, agent.id);
            }
        }
    }
    plan
}

/// This compartment's layer id, once per distinct rank owning cells across
/// a qualifying edge. Own-rank entries are dropped.
pub(crate) fn layer_push_plan(c: &Compartment) -> PushPlan<LayerId> {
    let mut plan = PushPlan::new();
    let partition = c.partition();
    let local = partition.local_grid();
    let own = partition.rank();
    let layer = LayerId::for_compartment(c.kind());
    for (axis, side) in border_edges(c) {
        let (dx, dy) = offset_across(axis, side);
        for cell in local.edge_cells(axis, side) {
            let Some(target) = partition.rank_at(cell, dx, dy) else {
                continue;
            };
            if target != own {
                plan.insert(target, layer);
            }
        }
    }
    plan
}

/// Unit offset pointing across the `(axis, side)` edge.
fn offset_across(axis: Axis, side: Side) -> (i32, i32) {
    match axis {
        Axis::X => (side.step(), 0),
        Axis::Y => (0, side.step()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BorderSpec, CompartmentConfig};
    use mucosa_core::{Agent, AgentClass, AgentState, CompartmentKind, GridPoint, Rank, SpacePoint};
    use mucosa_test_utils::StripedGrid;

    /// Epithelium 10x10, lumen below, lamina propria above, striped
    /// decomposition along Y.
    fn epithelium(rank: u32, world_size: usize) -> Compartment {
        let config = CompartmentConfig::new(CompartmentKind::Epithelium, 10.0, 10.0, 1.0)
            .border(Axis::Y, Side::Low, BorderSpec::Compartment(CompartmentKind::Lumen))
            .border(
                Axis::Y,
                Side::High,
                BorderSpec::Compartment(CompartmentKind::LaminaPropria),
            );
        let (space, grid, _) = config.resolved_extents().unwrap();
        let ctx = StripedGrid::new(space, grid, Axis::Y, Rank(rank), world_size);
        Compartment::new(&config, Box::new(ctx)).unwrap()
    }

    fn agent() -> Agent {
        Agent::new(AgentClass(0), AgentState(0))
    }

    #[test]
    fn only_compartment_border_edges_qualify() {
        // Rank 0 of 2 owns rows [0, 5): it reaches the low-Y compartment
        // border but not the high-Y one, and the X walls never qualify.
        let c = epithelium(0, 2);
        let edges = border_edges(&c);
        assert_eq!(edges.as_slice(), &[(Axis::Y, Side::Low)]);

        let c = epithelium(1, 2);
        let edges = border_edges(&c);
        assert_eq!(edges.as_slice(), &[(Axis::Y, Side::High)]);
    }

    #[test]
    fn agents_on_the_border_row_are_planned_across() {
        let mut c = epithelium(0, 2);
        let on_border = agent();
        let interior = agent();
        c.add_agent(on_border, SpacePoint::new(3.5, 0.5));
        c.add_agent(interior, SpacePoint::new(3.5, 2.5));

        // One step below row 0 wraps to row 9, owned by rank 1.
        let plan = c.agent_push_plan();
        assert_eq!(plan.ranks().collect::<Vec<_>>(), vec![Rank(1)]);
        let ids: Vec<_> = plan.ids_for(Rank(1)).unwrap().iter().copied().collect();
        assert_eq!(ids, vec![on_border.id]);
    }

    #[test]
    fn own_rank_groups_are_suppressed() {
        // A world of one: every neighbor cell wraps back to rank 0, so
        // nothing is ever planned.
        let mut c = epithelium(0, 1);
        c.add_agent(agent(), SpacePoint::new(3.5, 0.5));
        c.add_agent(agent(), SpacePoint::new(3.5, 9.5));
        assert!(c.agent_push_plan().is_empty());
        assert!(c.layer_push_plan().is_empty());
    }

    #[test]
    fn layer_plan_names_each_destination_once() {
        let mut c = epithelium(1, 2);
        c.add_field("IL6", 0.0).unwrap();
        c.initialize_field_layer().unwrap();

        let plan = c.layer_push_plan();
        assert_eq!(plan.len(), 1);
        let ids: Vec<_> = plan.ids_for(Rank(0)).unwrap().iter().copied().collect();
        assert_eq!(ids, vec![LayerId::for_compartment(CompartmentKind::Epithelium)]);
    }

    #[test]
    fn synchronize_cells_hands_the_plan_to_the_substrate() {
        let mut c = epithelium(0, 2);
        let a = agent();
        c.add_agent(a, SpacePoint::new(7.5, 0.5));
        c.synchronize_cells().unwrap();

        let striped = c
            .partition()
            .context()
            .downcast_ref::<StripedGrid>()
            .unwrap();
        assert_eq!(striped.agent_plans().len(), 1);
        assert!(striped.agent_plans()[0].ids_for(Rank(1)).unwrap().contains(&a.id));
    }

    #[test]
    fn interior_cells_never_appear_in_plans() {
        let mut c = epithelium(0, 2);
        c.add_agent(agent(), SpacePoint::new(5.5, 4.5));
        assert!(c.agent_push_plan().is_empty());
    }

    #[test]
    fn grid_point_offsets_point_across_each_edge() {
        assert_eq!(offset_across(Axis::X, Side::Low), (-1, 0));
        assert_eq!(offset_across(Axis::Y, Side::High), (0, 1));
        let pt = GridPoint::new(4, 0).offset(0, -1);
        assert_eq!(pt, GridPoint::new(4, -1));
    }
}
