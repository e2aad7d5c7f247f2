//! Field (cytokine) definitions.

/// Definition of a diffusible scalar field registered in a compartment.
///
/// Each registered field occupies one slot, in registration order, of every
/// grid cell's value vector. The `name` is qualified with the owning
/// compartment (`"lumen.IL6"`) so layer snapshots remain self-describing
/// when pushed across processes.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    /// Qualified name, `"<compartment>.<field>"`.
    pub name: String,
    /// Value every local cell is seeded with at layer initialization.
    pub initial: f64,
}

impl FieldDef {
    /// Construct a definition with a qualified name.
    pub fn new(name: impl Into<String>, initial: f64) -> Self {
        Self {
            name: name.into(),
            initial,
        }
    }
}
