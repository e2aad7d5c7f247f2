//! Identifiers grouped by destination rank for a synchronization round.

use indexmap::IndexMap;
use mucosa_core::Rank;
use std::collections::BTreeSet;

/// A set of identifiers to push, grouped by destination rank.
///
/// This is the whole of the wire contract this core imposes on the
/// transport: "push this set of identifiers to this rank". Instantiated
/// with [`AgentId`](mucosa_core::AgentId) for agent synchronization and
/// [`LayerId`](mucosa_core::LayerId) for field-layer synchronization.
/// Ranks keep insertion order; ids within a rank are deduplicated and
/// ordered, so identical selections produce identical plans.
#[derive(Clone, Debug, PartialEq)]
pub struct PushPlan<I> {
    by_rank: IndexMap<Rank, BTreeSet<I>>,
}

impl<I: Copy + Ord> PushPlan<I> {
    /// An empty plan.
    pub fn new() -> Self {
        Self {
            by_rank: IndexMap::new(),
        }
    }

    /// Mark `id` for transmission to `rank`.
    pub fn insert(&mut self, rank: Rank, id: I) {
        self.by_rank.entry(rank).or_default().insert(id);
    }

    /// Whether nothing needs pushing.
    pub fn is_empty(&self) -> bool {
        self.by_rank.values().all(|ids| ids.is_empty())
    }

    /// The destination ranks, in first-insertion order.
    pub fn ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        self.by_rank.keys().copied()
    }

    /// The ids destined for `rank`, if any.
    pub fn ids_for(&self, rank: Rank) -> Option<&BTreeSet<I>> {
        self.by_rank.get(&rank)
    }

    /// Iterate over `(rank, ids)` groups.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, &BTreeSet<I>)> + '_ {
        self.by_rank.iter().map(|(r, ids)| (*r, ids))
    }

    /// Total number of `(rank, id)` pairs.
    pub fn len(&self) -> usize {
        self.by_rank.values().map(BTreeSet::len).sum()
    }
}

impl<I: Copy + Ord> Default for PushPlan<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mucosa_core::AgentId;

    #[test]
    fn groups_and_deduplicates() {
        let mut plan = PushPlan::new();
        plan.insert(Rank(2), AgentId(7));
        plan.insert(Rank(1), AgentId(3));
        plan.insert(Rank(2), AgentId(7));
        plan.insert(Rank(2), AgentId(4));

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.ranks().collect::<Vec<_>>(), vec![Rank(2), Rank(1)]);
        let to_two: Vec<_> = plan.ids_for(Rank(2)).unwrap().iter().copied().collect();
        assert_eq!(to_two, vec![AgentId(4), AgentId(7)]);
    }

    #[test]
    fn empty_plan() {
        let plan: PushPlan<AgentId> = PushPlan::new();
        assert!(plan.is_empty());
        assert_eq!(plan.ids_for(Rank(0)), None);
    }
}
