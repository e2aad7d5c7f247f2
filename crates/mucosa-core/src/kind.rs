//! The closed enumeration of tissue compartments.

use std::fmt;

/// A named, statically-typed spatial region of the simulated gut tissue.
///
/// Exactly one live compartment per kind exists in a process; the registry
/// in `mucosa-compartment` enforces this. Absence of a neighbor (the
/// source model's "invalid" member) is expressed as
/// `Option<CompartmentKind>` being `None`, never as an extra variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompartmentKind {
    /// The gut lumen, where bacteria first appear.
    Lumen,
    /// The epithelial cell monolayer separating lumen and tissue.
    Epithelium,
    /// The lamina propria, connective tissue hosting immune cells.
    LaminaPropria,
    /// The gastric lymph node draining the tissue.
    GastricLymphNode,
}

impl CompartmentKind {
    /// Number of compartment kinds.
    pub const COUNT: usize = 4;

    /// All kinds in declaration order.
    pub const ALL: [CompartmentKind; Self::COUNT] = [
        CompartmentKind::Lumen,
        CompartmentKind::Epithelium,
        CompartmentKind::LaminaPropria,
        CompartmentKind::GastricLymphNode,
    ];

    /// Position of this kind in [`CompartmentKind::ALL`]; usable as a
    /// registry slot index.
    pub fn index(self) -> usize {
        match self {
            CompartmentKind::Lumen => 0,
            CompartmentKind::Epithelium => 1,
            CompartmentKind::LaminaPropria => 2,
            CompartmentKind::GastricLymphNode => 3,
        }
    }

    /// The configuration name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            CompartmentKind::Lumen => "lumen",
            CompartmentKind::Epithelium => "epithelium",
            CompartmentKind::LaminaPropria => "lamina_propria",
            CompartmentKind::GastricLymphNode => "gastric_lymph_node",
        }
    }

    /// Resolve a configuration name back to a kind.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for CompartmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in CompartmentKind::ALL {
            assert_eq!(CompartmentKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(CompartmentKind::from_name("peyers_patch"), None);
    }

    #[test]
    fn indices_match_all_order() {
        for (i, kind) in CompartmentKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
