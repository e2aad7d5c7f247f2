//! A single tissue compartment over its distributed grid partition.

use crate::config::{BorderSpec, CompartmentConfig};
use crate::error::{ConfigError, FieldError, MoveError};
use crate::sync;
use indexmap::IndexMap;
use mucosa_core::{
    Agent, AgentClass, AgentId, AgentState, Axis, CompartmentKind, FieldDef, FieldId, GridPoint,
    LayerId, Side, SpacePoint,
};
use mucosa_grid::{FieldLayer, GridContext, Partition, PushPlan, SyncError};
use mucosa_space::{Borders, EdgeKind, GridExtents, GridIterator, SpaceExtents};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;
use std::f64::consts::TAU;

/// Where a field lookup resolved, and the access it grants.
///
/// Local cells hand out mutable slots; ghost cells are read-only copies of
/// another partition's last completed synchronization round, so only the
/// value crosses the boundary.
#[derive(Debug)]
pub enum FieldSlot<'a> {
    /// The cell is owned by this partition.
    Local(&'a mut f64),
    /// The cell was merged from a non-local snapshot.
    Ghost(f64),
}

impl FieldSlot<'_> {
    /// The current value, wherever it lives.
    pub fn get(&self) -> f64 {
        match self {
            FieldSlot::Local(v) => **v,
            FieldSlot::Ghost(v) => *v,
        }
    }

    /// Whether this slot is a read-only ghost.
    pub fn is_ghost(&self) -> bool {
        matches!(self, FieldSlot::Ghost(_))
    }
}

/// One spatial region of the tissue: geometry, borders, adjacency, agents,
/// fields, and the movement RNG.
///
/// A compartment owns this process's partition of its distributed grid
/// (via [`Partition`]) and everything layered on top: reflective walls,
/// permeable edges toward neighboring compartments, the registered field
/// set, and the per-compartment ChaCha8 stream that makes random motion
/// replayable. Cross-compartment operations live on
/// [`Tissue`](crate::Tissue); everything here stays within one kind.
pub struct Compartment {
    kind: CompartmentKind,
    cell_size: f64,
    space_borders: Borders,
    grid_borders: Borders,
    adjacent: [[Option<CompartmentKind>; 2]; 2],
    partition: Partition,
    fields: Vec<FieldDef>,
    field_ids: IndexMap<String, FieldId>,
    layer: Option<FieldLayer>,
    rng: ChaCha8Rng,
}

impl Compartment {
    /// Build a compartment from its configuration and a substrate.
    ///
    /// The substrate's local partition must be a sub-rectangle of the grid
    /// the configuration resolves to.
    pub fn new(config: &CompartmentConfig, ctx: Box<dyn GridContext>) -> Result<Self, ConfigError> {
        let (space, grid, cell_size) = config.resolved_extents()?;

        let local = ctx.local_grid();
        let fits = Axis::BOTH.into_iter().all(|a| {
            local.origin(a) >= grid.origin(a) && local.high(a) <= grid.high(a)
        });
        if !fits {
            return Err(ConfigError::PartitionOutOfBounds { local, grid });
        }

        let mut space_borders = Borders::new(space);
        let mut grid_borders = Borders::for_grid(&grid);
        let mut adjacent = [[None; 2]; 2];
        for axis in Axis::BOTH {
            for side in Side::BOTH {
                if let BorderSpec::Compartment(neighbor) = config.border_spec(axis, side) {
                    adjacent[axis.index()][side.index()] = Some(neighbor);
                    space_borders.set_edge(axis, side, EdgeKind::Permeable);
                    grid_borders.set_edge(axis, side, EdgeKind::Permeable);
                }
            }
        }

        Ok(Self {
            kind: config.kind(),
            cell_size,
            space_borders,
            grid_borders,
            adjacent,
            partition: Partition::new(ctx, cell_size, space, grid),
            fields: Vec::new(),
            field_ids: IndexMap::new(),
            layer: None,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed()),
        })
    }

    /// This compartment's kind.
    pub fn kind(&self) -> CompartmentKind {
        self.kind
    }

    /// Full continuous-space bounds.
    pub fn space(&self) -> &SpaceExtents {
        self.partition.space()
    }

    /// Full grid bounds.
    pub fn grid(&self) -> &GridExtents {
        self.partition.grid()
    }

    /// Edge length of one grid cell in space units.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Space-scale borders (reflection, bounds checks).
    pub fn space_borders(&self) -> &Borders {
        &self.space_borders
    }

    /// Grid-scale borders (boundary-cell tests during sync).
    pub fn grid_borders(&self) -> &Borders {
        &self.grid_borders
    }

    /// The neighbor configured beyond one edge, if any.
    pub fn adjacent(&self, axis: Axis, side: Side) -> Option<CompartmentKind> {
        self.adjacent[axis.index()][side.index()]
    }

    /// The partition wrapper over the substrate.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Mutable partition access.
    pub fn partition_mut(&mut self) -> &mut Partition {
        &mut self.partition
    }

    /// A restartable iterator over the local partition's cells.
    pub fn begin(&self) -> GridIterator {
        GridIterator::new(self.partition.local_grid())
    }

    // ---- agents -------------------------------------------------------

    /// Place an agent at a continuous-space location. `false` if the
    /// location is out of bounds or the id is already present.
    pub fn add_agent(&mut self, agent: Agent, pt: SpacePoint) -> bool {
        self.partition.add_agent(agent, pt)
    }

    /// Place an agent uniformly at random within the local partition.
    pub fn add_agent_to_random_location(&mut self, agent: Agent) -> bool {
        let local = self.partition.local_space();
        let mut pt = SpacePoint::new(0.0, 0.0);
        for axis in Axis::BOTH {
            pt[axis] = local.origin(axis) + self.rng.gen::<f64>() * local.extent(axis);
        }
        self.partition.add_agent(agent, pt)
    }

    /// Remove and return an agent.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        self.partition.remove_agent(id)
    }

    /// Current location of an agent.
    pub fn location(&self, id: AgentId) -> Option<SpacePoint> {
        self.partition.location(id)
    }

    /// The agent record for an id.
    pub fn agent(&self, id: AgentId) -> Option<Agent> {
        self.partition.agent(id)
    }

    /// Overwrite an agent's opaque state. `false` if unknown.
    pub fn set_state(&mut self, id: AgentId, state: AgentState) -> bool {
        self.partition.set_state(id, state)
    }

    /// Move an agent within this compartment. `false` if the agent is
    /// unknown or the location is out of bounds.
    pub fn move_local(&mut self, id: AgentId, pt: SpacePoint) -> bool {
        self.partition.move_agent(id, pt)
    }

    /// Displace an agent by a random step of at most `max_speed`.
    ///
    /// The angle is uniform over the full circle and the radius uniform
    /// over `[0, max_speed)`, drawn from this compartment's seeded stream.
    /// Random motion treats the compartment as a closed box: overshoot
    /// past any edge is mirrored back inside, permeable or not. Handoff
    /// to a neighbor only ever happens through directed
    /// [`Tissue::move_to`](crate::Tissue::move_to) calls.
    ///
    /// `max_speed` is assumed smaller than the compartment extents; the
    /// single mirror pass does not wrap larger overshoots.
    pub fn move_random(&mut self, id: AgentId, max_speed: f64) -> Result<SpacePoint, MoveError> {
        let mut pt = self
            .partition
            .location(id)
            .ok_or(MoveError::UnknownAgent(id))?;
        let angle = self.rng.gen::<f64>() * TAU;
        let radius = self.rng.gen::<f64>() * max_speed;
        pt[Axis::X] += radius * angle.cos();
        pt[Axis::Y] += radius * angle.sin();
        self.space_borders.reflect(&mut pt);
        let moved = self.partition.move_agent(id, pt);
        debug_assert!(moved, "reflected location must be in bounds");
        Ok(pt)
    }

    /// Agents in one grid cell, optionally restricted to a class.
    pub fn agents_at(&self, pt: GridPoint, class: Option<AgentClass>) -> SmallVec<[Agent; 8]> {
        self.partition.agents_at(pt, class)
    }

    /// Agents in the Moore neighborhood of `pt` within Chebyshev distance
    /// `range`, the center cell included.
    pub fn neighbors(
        &self,
        pt: GridPoint,
        range: i32,
        class: Option<AgentClass>,
    ) -> SmallVec<[Agent; 8]> {
        let grid = *self.partition.grid();
        let mut out = SmallVec::new();
        for dy in -range..=range {
            for dx in -range..=range {
                let cell = pt.offset(dx, dy);
                if grid.contains(&cell) {
                    out.extend(self.partition.agents_at(cell, class));
                }
            }
        }
        out
    }

    /// Grid cell containing a continuous-space point.
    pub fn space_to_grid(&self, pt: &SpacePoint) -> GridPoint {
        self.partition.space_to_grid(pt)
    }

    /// Center of a grid cell in continuous space.
    pub fn grid_to_space(&self, pt: &GridPoint) -> SpacePoint {
        self.partition.grid_to_space(pt)
    }

    // ---- fields -------------------------------------------------------

    /// Register a field. The name is qualified with the compartment name
    /// unless it already is. Registration closes once the layer exists.
    pub fn add_field(&mut self, name: &str, initial: f64) -> Result<FieldId, FieldError> {
        if self.layer.is_some() {
            return Err(FieldError::LayerInitialized);
        }
        let qualified = self.qualify(name);
        if self.field_ids.contains_key(&qualified) {
            return Err(FieldError::DuplicateField { name: qualified });
        }
        let id = FieldId(self.fields.len() as u32);
        self.fields.push(FieldDef::new(qualified.clone(), initial));
        self.field_ids.insert(qualified, id);
        Ok(id)
    }

    /// Look up a field id by bare or qualified name.
    pub fn field(&self, name: &str) -> Result<FieldId, FieldError> {
        let qualified = self.qualify(name);
        self.field_ids
            .get(&qualified)
            .copied()
            .ok_or(FieldError::UnknownField { name: qualified })
    }

    /// The definition behind a field id.
    pub fn field_def(&self, id: FieldId) -> Result<&FieldDef, FieldError> {
        self.fields
            .get(id.0 as usize)
            .ok_or(FieldError::UnknownFieldId(id))
    }

    /// All registered fields, in registration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// The field layer, once initialized.
    pub fn layer(&self) -> Option<&FieldLayer> {
        self.layer.as_ref()
    }

    /// Allocate the field layer and run one diffuser synchronization.
    ///
    /// Idempotent: a second call re-synchronizes without reseeding. A
    /// compartment with no registered fields has no layer and this is a
    /// no-op.
    pub fn initialize_field_layer(&mut self) -> Result<(), SyncError> {
        if self.fields.is_empty() {
            return Ok(());
        }
        if self.layer.is_none() {
            let initial: Vec<f64> = self.fields.iter().map(|def| def.initial).collect();
            self.layer = Some(FieldLayer::new(
                LayerId::for_compartment(self.kind),
                self.partition.local_grid(),
                &initial,
            ));
        }
        self.synchronize_diffuser()
    }

    /// Resolve one field slot of one grid cell.
    ///
    /// Local cells yield a mutable slot, ghost cells a read-only value;
    /// anything else is [`FieldError::NotFound`].
    pub fn field_slot(&mut self, field: FieldId, pt: GridPoint) -> Result<FieldSlot<'_>, FieldError> {
        if field.0 as usize >= self.fields.len() {
            return Err(FieldError::UnknownFieldId(field));
        }
        let layer = self.layer.as_mut().ok_or(FieldError::LayerNotInitialized)?;
        if layer.grid().contains(&pt) {
            match layer.value_mut(&pt, field) {
                Some(slot) => Ok(FieldSlot::Local(slot)),
                None => Err(FieldError::NotFound { point: pt }),
            }
        } else {
            layer
                .ghost_value(&pt, field)
                .map(FieldSlot::Ghost)
                .ok_or(FieldError::NotFound { point: pt })
        }
    }

    /// Read one field slot without taking a mutable borrow.
    pub fn field_value(&self, field: FieldId, pt: GridPoint) -> Result<f64, FieldError> {
        if field.0 as usize >= self.fields.len() {
            return Err(FieldError::UnknownFieldId(field));
        }
        let layer = self.layer.as_ref().ok_or(FieldError::LayerNotInitialized)?;
        let slot = field.0 as usize;
        if let Some(cell) = layer.cell(&pt) {
            return Ok(cell[slot]);
        }
        layer
            .ghost_value(&pt, field)
            .ok_or(FieldError::NotFound { point: pt })
    }

    fn qualify(&self, name: &str) -> String {
        let prefix = self.kind.name();
        if name.starts_with(prefix) && name[prefix.len()..].starts_with('.') {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        }
    }

    // ---- synchronization ---------------------------------------------

    /// The cross-compartment agent pushes this phase requires.
    pub fn agent_push_plan(&self) -> PushPlan<AgentId> {
        sync::agent_push_plan(self)
    }

    /// The cross-compartment layer pushes this phase requires.
    pub fn layer_push_plan(&self) -> PushPlan<LayerId> {
        sync::layer_push_plan(self)
    }

    /// Run the collective agent exchange for this phase.
    ///
    /// Collective: every rank must call this in lockstep. Blocks until
    /// this process's round completes.
    pub fn synchronize_cells(&mut self) -> Result<(), SyncError> {
        let plan = self.agent_push_plan();
        self.partition.exchange_agents(&plan)
    }

    /// Run the collective field-layer exchange for this phase.
    ///
    /// Sends this partition's snapshot to every rank the push plan names
    /// and merges received non-local snapshots into the ghost cache,
    /// keeping only permeable boundary cells outside the local partition.
    /// No-op before the layer is initialized. Collective, like
    /// [`synchronize_cells`](Compartment::synchronize_cells).
    pub fn synchronize_diffuser(&mut self) -> Result<(), SyncError> {
        let snapshot = match &self.layer {
            Some(layer) => layer.snapshot(),
            None => return Ok(()),
        };
        let plan = self.layer_push_plan();
        let incoming = self.partition.exchange_layers(snapshot, &plan)?;
        if let Some(layer) = self.layer.as_mut() {
            for snap in &incoming {
                if snap.layer() != layer.layer() {
                    continue;
                }
                layer.merge_snapshot(snap, &self.grid_borders)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mucosa_grid::LocalGrid;

    fn compartment(config: CompartmentConfig) -> Compartment {
        let (space, grid, _) = config.resolved_extents().unwrap();
        Compartment::new(&config, Box::new(LocalGrid::new(space, grid))).unwrap()
    }

    fn lumen_10x10() -> Compartment {
        compartment(CompartmentConfig::new(CompartmentKind::Lumen, 10.0, 10.0, 1.0))
    }

    fn agent() -> Agent {
        Agent::new(AgentClass(0), AgentState(0))
    }

    #[test]
    fn rejects_partition_outside_grid() {
        let config = CompartmentConfig::new(CompartmentKind::Lumen, 4.0, 4.0, 1.0);
        let space = SpaceExtents::new(SpacePoint::new(0.0, 0.0), [8.0, 8.0]).unwrap();
        let grid = GridExtents::new(GridPoint::new(0, 0), [8, 8]).unwrap();
        let err = Compartment::new(&config, Box::new(LocalGrid::new(space, grid)));
        assert!(matches!(err, Err(ConfigError::PartitionOutOfBounds { .. })));
    }

    #[test]
    fn permeable_edges_follow_border_specs() {
        let config = CompartmentConfig::new(CompartmentKind::Epithelium, 10.0, 4.0, 1.0)
            .border(Axis::Y, Side::Low, BorderSpec::Compartment(CompartmentKind::Lumen))
            .border(
                Axis::Y,
                Side::High,
                BorderSpec::Compartment(CompartmentKind::LaminaPropria),
            );
        let c = compartment(config);
        assert_eq!(c.adjacent(Axis::Y, Side::Low), Some(CompartmentKind::Lumen));
        assert_eq!(c.adjacent(Axis::X, Side::Low), None);
        assert_eq!(c.space_borders().edge(Axis::Y, Side::Low), EdgeKind::Permeable);
        assert_eq!(c.space_borders().edge(Axis::X, Side::High), EdgeKind::Impermeable);
        assert_eq!(c.grid_borders().edge(Axis::Y, Side::High), EdgeKind::Permeable);
    }

    #[test]
    fn move_random_is_deterministic_per_seed() {
        let config = || {
            CompartmentConfig::new(CompartmentKind::Lumen, 10.0, 10.0, 1.0).seed(42)
        };
        let mut a = compartment(config());
        let mut b = compartment(config());
        let start = SpacePoint::new(5.0, 5.0);
        let id_a = agent();
        let id_b = agent();
        a.add_agent(id_a, start);
        b.add_agent(id_b, start);
        for _ in 0..16 {
            let pa = a.move_random(id_a.id, 1.5).unwrap();
            let pb = b.move_random(id_b.id, 1.5).unwrap();
            assert_eq!(pa, pb);
            assert!(a.space().contains(&pa));
        }
    }

    #[test]
    fn move_random_steps_stay_within_max_speed() {
        let mut c = lumen_10x10();
        let a = agent();
        c.add_agent(a, SpacePoint::new(5.0, 5.0));
        let mut prev = SpacePoint::new(5.0, 5.0);
        for _ in 0..64 {
            let next = c.move_random(a.id, 0.75).unwrap();
            let dx = next.x() - prev.x();
            let dy = next.y() - prev.y();
            // Reflection can only shorten the apparent step.
            assert!((dx * dx + dy * dy).sqrt() <= 0.75 + 1e-9);
            prev = next;
        }
    }

    #[test]
    fn move_random_rejects_unknown_agents() {
        let mut c = lumen_10x10();
        assert!(matches!(
            c.move_random(AgentId(u64::MAX), 1.0),
            Err(MoveError::UnknownAgent(_))
        ));
    }

    #[test]
    fn random_placement_lands_in_bounds() {
        let mut c = lumen_10x10();
        for _ in 0..32 {
            let a = agent();
            assert!(c.add_agent_to_random_location(a));
            let loc = c.location(a.id).unwrap();
            assert!(c.space().contains(&loc));
        }
    }

    #[test]
    fn neighbors_cover_the_moore_neighborhood() {
        let mut c = lumen_10x10();
        let center = agent();
        let near = agent();
        let far = agent();
        c.add_agent(center, SpacePoint::new(5.5, 5.5));
        c.add_agent(near, SpacePoint::new(6.5, 4.5));
        c.add_agent(far, SpacePoint::new(8.5, 5.5));
        let found = c.neighbors(GridPoint::new(5, 5), 1, None);
        assert_eq!(found.len(), 2);
        let wide = c.neighbors(GridPoint::new(5, 5), 3, None);
        assert_eq!(wide.len(), 3);
    }

    #[test]
    fn class_filter_applies_to_queries() {
        let mut c = lumen_10x10();
        c.add_agent(Agent::new(AgentClass(1), AgentState(0)), SpacePoint::new(2.5, 2.5));
        c.add_agent(Agent::new(AgentClass(2), AgentState(0)), SpacePoint::new(2.5, 2.5));
        assert_eq!(c.agents_at(GridPoint::new(2, 2), None).len(), 2);
        assert_eq!(c.agents_at(GridPoint::new(2, 2), Some(AgentClass(1))).len(), 1);
        assert_eq!(c.neighbors(GridPoint::new(2, 2), 1, Some(AgentClass(2))).len(), 1);
    }

    #[test]
    fn field_registration_is_ordered_and_closed_after_init() {
        let mut c = lumen_10x10();
        let il6 = c.add_field("IL6", 0.5).unwrap();
        let il10 = c.add_field("IL10", 0.0).unwrap();
        assert_eq!(il6, FieldId(0));
        assert_eq!(il10, FieldId(1));
        assert_eq!(c.field("IL6").unwrap(), il6);
        assert_eq!(c.field("lumen.IL6").unwrap(), il6);
        assert_eq!(c.field_def(il10).unwrap().name, "lumen.IL10");
        assert!(matches!(
            c.add_field("IL6", 1.0),
            Err(FieldError::DuplicateField { .. })
        ));

        c.initialize_field_layer().unwrap();
        assert!(matches!(c.add_field("TNF", 0.0), Err(FieldError::LayerInitialized)));
    }

    #[test]
    fn layer_seeds_initials_and_slots_are_writable() {
        let mut c = lumen_10x10();
        let il6 = c.add_field("IL6", 0.25).unwrap();
        c.initialize_field_layer().unwrap();

        let pt = GridPoint::new(3, 4);
        assert_eq!(c.field_value(il6, pt).unwrap(), 0.25);
        match c.field_slot(il6, pt).unwrap() {
            FieldSlot::Local(slot) => *slot = 2.0,
            FieldSlot::Ghost(_) => panic!("local cell resolved as ghost"),
        }
        assert_eq!(c.field_value(il6, pt).unwrap(), 2.0);
    }

    #[test]
    fn field_access_errors() {
        let mut c = lumen_10x10();
        let il6 = c.add_field("IL6", 0.0).unwrap();
        assert!(matches!(
            c.field_slot(il6, GridPoint::new(0, 0)),
            Err(FieldError::LayerNotInitialized)
        ));
        c.initialize_field_layer().unwrap();
        assert!(matches!(
            c.field_slot(FieldId(9), GridPoint::new(0, 0)),
            Err(FieldError::UnknownFieldId(FieldId(9)))
        ));
        // Outside the grid and never ghosted.
        assert!(matches!(
            c.field_slot(il6, GridPoint::new(0, 10)),
            Err(FieldError::NotFound { .. })
        ));
        assert!(matches!(c.field("TNF"), Err(FieldError::UnknownField { .. })));
    }

    #[test]
    fn initialize_without_fields_is_a_noop() {
        let mut c = lumen_10x10();
        c.initialize_field_layer().unwrap();
        assert!(c.layer().is_none());
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut c = lumen_10x10();
        let il6 = c.add_field("IL6", 1.0).unwrap();
        c.initialize_field_layer().unwrap();
        if let FieldSlot::Local(slot) = c.field_slot(il6, GridPoint::new(0, 0)).unwrap() {
            *slot = 5.0;
        }
        c.initialize_field_layer().unwrap();
        assert_eq!(c.field_value(il6, GridPoint::new(0, 0)).unwrap(), 5.0);
    }

    #[test]
    fn begin_walks_the_local_partition() {
        let c = lumen_10x10();
        assert_eq!(c.begin().count(), 100);
    }
}
