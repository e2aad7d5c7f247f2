//! The tissue registry: one live compartment per kind, plus every
//! operation that crosses compartment frames.

use crate::compartment::{Compartment, FieldSlot};
use crate::config::CompartmentConfig;
use crate::error::{ConfigError, FieldError, MoveError};
use mucosa_core::{
    Agent, AgentClass, AgentId, Axis, CompartmentKind, GridPoint, Rank, Side, SpacePoint,
};
use mucosa_grid::GridContext;
use smallvec::SmallVec;

/// The set of built compartments and the coordinate transforms between
/// them.
///
/// Holds at most one compartment per [`CompartmentKind`]. All
/// cross-compartment operations — resolving an out-of-bounds coordinate to
/// the neighboring frame, directed agent transfer, field reads at an
/// offset — go through here, so a single borrow of the tissue settles
/// which compartments an operation touches. There is no global instance;
/// callers own a `Tissue` and pass it where needed.
#[derive(Default)]
pub struct Tissue {
    slots: [Option<Compartment>; CompartmentKind::COUNT],
}

impl Tissue {
    /// An empty tissue.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Build and register the compartment a configuration describes.
    ///
    /// Fails if a compartment of that kind is already built; tear it down
    /// first to rebuild.
    pub fn build(
        &mut self,
        config: &CompartmentConfig,
        ctx: Box<dyn GridContext>,
    ) -> Result<CompartmentKind, ConfigError> {
        let kind = config.kind();
        if self.slots[kind.index()].is_some() {
            return Err(ConfigError::AlreadyBuilt { kind });
        }
        let compartment = Compartment::new(config, ctx)?;
        self.slots[kind.index()] = Some(compartment);
        Ok(kind)
    }

    /// Remove and return one compartment.
    pub fn teardown(&mut self, kind: CompartmentKind) -> Option<Compartment> {
        self.slots[kind.index()].take()
    }

    /// Remove every compartment.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// The compartment of `kind`, if built.
    pub fn get(&self, kind: CompartmentKind) -> Option<&Compartment> {
        self.slots[kind.index()].as_ref()
    }

    /// Mutable access to the compartment of `kind`.
    pub fn get_mut(&mut self, kind: CompartmentKind) -> Option<&mut Compartment> {
        self.slots[kind.index()].as_mut()
    }

    /// The built compartment beyond one edge of `kind`, if any.
    pub fn adjacent(&self, kind: CompartmentKind, axis: Axis, side: Side) -> Option<&Compartment> {
        let neighbor = self.get(kind)?.adjacent(axis, side)?;
        self.get(neighbor)
    }

    /// Resolve a continuous-space coordinate expressed in `from`'s frame.
    ///
    /// In bounds, the point is untouched and the result is `Some(from)`.
    /// Out of bounds, the first axis (X before Y) whose crossed edge has a
    /// built neighbor wins: the coordinate is shifted into that neighbor's
    /// frame and the neighbor is returned. The resolution is a single hop;
    /// the result is never re-transformed. No qualifying axis (a wall, an
    /// unbuilt neighbor on every crossed edge, or `from` itself unbuilt)
    /// yields `None` with the point untouched.
    pub fn transform_space(
        &self,
        from: CompartmentKind,
        pt: &mut SpacePoint,
    ) -> Option<CompartmentKind> {
        let source = self.get(from)?;
        let report = source.space_borders().bounds_check(pt);
        if report.inside() {
            return Some(from);
        }
        for axis in Axis::BOTH {
            let Some(side) = report.state(axis).side() else {
                continue;
            };
            let Some(kind) = source.adjacent(axis, side) else {
                continue;
            };
            let Some(target) = self.get(kind) else {
                continue;
            };
            let (s, t) = (source.space(), target.space());
            let shift = match side {
                Side::Low => t.origin(axis) + t.extent(axis) - s.origin(axis),
                Side::High => t.origin(axis) - s.extent(axis),
            };
            pt[axis] += shift;
            return Some(kind);
        }
        None
    }

    /// Grid-scale counterpart of [`transform_space`](Tissue::transform_space).
    pub fn transform_grid(
        &self,
        from: CompartmentKind,
        pt: &mut GridPoint,
    ) -> Option<CompartmentKind> {
        let source = self.get(from)?;
        let report = source.grid_borders().bounds_check_grid(pt);
        if report.inside() {
            return Some(from);
        }
        for axis in Axis::BOTH {
            let Some(side) = report.state(axis).side() else {
                continue;
            };
            let Some(kind) = source.adjacent(axis, side) else {
                continue;
            };
            let Some(target) = self.get(kind) else {
                continue;
            };
            let (s, t) = (source.grid(), target.grid());
            let shift = match side {
                Side::Low => t.origin(axis) + t.extent(axis) - s.origin(axis),
                Side::High => t.origin(axis) - s.extent(axis),
            };
            pt[axis] += shift;
            return Some(kind);
        }
        None
    }

    /// Move an agent of `from` to a coordinate in `from`'s frame,
    /// crossing into a neighbor when the coordinate does.
    ///
    /// Same-compartment moves are local partition moves. Cross-compartment
    /// moves add the agent to the resolved neighbor at the transformed
    /// coordinate and remove it from the source only once the neighbor
    /// accepted; the returned flag is that acceptance. Coordinates
    /// resolving to no built compartment are an error and leave the agent
    /// where it was.
    pub fn move_to(
        &mut self,
        from: CompartmentKind,
        id: AgentId,
        pt: SpacePoint,
    ) -> Result<bool, MoveError> {
        if self.get(from).is_none() {
            return Err(MoveError::MissingCompartment(from));
        }
        let mut target_pt = pt;
        let target = self
            .transform_space(from, &mut target_pt)
            .ok_or(MoveError::Unresolvable { from, point: pt })?;
        if target == from {
            let source = self
                .get_mut(from)
                .ok_or(MoveError::MissingCompartment(from))?;
            if source.location(id).is_none() {
                return Err(MoveError::UnknownAgent(id));
            }
            return Ok(source.move_local(id, target_pt));
        }
        let (source, target) = self
            .pair_mut(from, target)
            .ok_or(MoveError::MissingCompartment(target))?;
        let agent = source.agent(id).ok_or(MoveError::UnknownAgent(id))?;
        // Add before removing so a refused handoff leaves the agent where
        // it was.
        let accepted = target.add_agent(agent, target_pt);
        if accepted {
            source.remove_agent(id);
        }
        Ok(accepted)
    }

    /// Agents in the cell `offset` away from `pt`, both in `from`'s grid
    /// frame, following the coordinate into a neighbor when it crosses.
    ///
    /// The neighbor is queried at the transformed coordinate. Unresolvable
    /// coordinates yield an empty result.
    pub fn agents_at(
        &self,
        from: CompartmentKind,
        pt: GridPoint,
        offset: (i32, i32),
        class: Option<AgentClass>,
    ) -> SmallVec<[Agent; 8]> {
        let mut pt = pt.offset(offset.0, offset.1);
        let Some(kind) = self.transform_grid(from, &mut pt) else {
            return SmallVec::new();
        };
        match self.get(kind) {
            Some(compartment) => compartment.agents_at(pt, class),
            None => SmallVec::new(),
        }
    }

    /// Resolve one field slot at the cell `offset` away from `pt` in
    /// `from`'s grid frame, crossing into a neighbor when the coordinate
    /// does. The field name is looked up in the resolved compartment.
    pub fn field_value(
        &mut self,
        from: CompartmentKind,
        name: &str,
        pt: GridPoint,
        offset: (i32, i32),
    ) -> Result<FieldSlot<'_>, FieldError> {
        let mut pt = pt.offset(offset.0, offset.1);
        let kind = self
            .transform_grid(from, &mut pt)
            .ok_or(FieldError::NotFound { point: pt })?;
        let compartment = self.slots[kind.index()]
            .as_mut()
            .ok_or(FieldError::NotFound { point: pt })?;
        let field = compartment.field(name)?;
        compartment.field_slot(field, pt)
    }

    /// The rank owning a grid coordinate in `from`'s frame, following the
    /// coordinate into a neighbor when it crosses.
    pub fn rank_at(&self, from: CompartmentKind, pt: GridPoint) -> Option<Rank> {
        let mut pt = pt;
        let kind = self.transform_grid(from, &mut pt)?;
        self.get(kind)?.partition().owner_rank(pt)
    }

    /// Mutable access to two distinct compartments at once.
    fn pair_mut(
        &mut self,
        a: CompartmentKind,
        b: CompartmentKind,
    ) -> Option<(&mut Compartment, &mut Compartment)> {
        let (i, j) = (a.index(), b.index());
        debug_assert_ne!(i, j, "pair_mut requires distinct kinds");
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let (head, tail) = self.slots.split_at_mut(hi);
        let low = head[lo].as_mut()?;
        let high = tail[0].as_mut()?;
        if i < j {
            Some((low, high))
        } else {
            Some((high, low))
        }
    }
}
