//! The agent record consumed (never interpreted) by the spatial core.

use crate::id::{AgentClass, AgentId, AgentState};

/// An individual simulated cell or microbe.
///
/// The spatial core moves agents, stores them in grid cells, and filters
/// queries by class; the meaning of `class` and `state` belongs entirely to
/// the external rule components. Small and `Copy` so spatial queries can
/// return owned values without lifetime plumbing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Agent {
    /// Process-wide unique identity.
    pub id: AgentId,
    /// Classification used for query filtering.
    pub class: AgentClass,
    /// Opaque behavioral state.
    pub state: AgentState,
}

impl Agent {
    /// Construct an agent with a freshly allocated id.
    pub fn new(class: AgentClass, state: AgentState) -> Self {
        Self {
            id: AgentId::next(),
            class,
            state,
        }
    }

    /// Copy of this agent with a different state.
    pub fn with_state(self, state: AgentState) -> Self {
        Self { state, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_state_preserves_identity() {
        let a = Agent::new(AgentClass(1), AgentState(0));
        let b = a.with_state(AgentState(7));
        assert_eq!(a.id, b.id);
        assert_eq!(b.state, AgentState(7));
    }
}
