//! Errors for compartment construction, field access, and transfers.

use mucosa_core::{AgentId, Axis, CompartmentKind, FieldId, GridPoint, SpacePoint};
use mucosa_space::{GridExtents, SpaceError};
use std::error::Error;
use std::fmt;

/// Rejection reasons for a [`CompartmentConfig`](crate::CompartmentConfig).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A spatial extent was zero or negative.
    NonPositiveExtent {
        /// Offending axis.
        axis: Axis,
        /// Configured value.
        value: f64,
    },
    /// A spatial extent was NaN or infinite.
    NonFiniteExtent {
        /// Offending axis.
        axis: Axis,
        /// Configured value.
        value: f64,
    },
    /// Cell size was zero, negative, or non-finite.
    NonPositiveCellSize {
        /// Configured value.
        value: f64,
    },
    /// A border named the compartment itself as its neighbor.
    SelfAdjacent {
        /// The compartment being configured.
        kind: CompartmentKind,
    },
    /// The registry already holds a compartment of this kind.
    AlreadyBuilt {
        /// The duplicate kind.
        kind: CompartmentKind,
    },
    /// The substrate's local partition is not a sub-rectangle of the
    /// compartment grid.
    PartitionOutOfBounds {
        /// Partition reported by the substrate.
        local: GridExtents,
        /// Full compartment grid.
        grid: GridExtents,
    },
    /// Extent construction failed downstream.
    Space(SpaceError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveExtent { axis, value } => {
                write!(f, "extent on axis {axis} must be positive, got {value}")
            }
            ConfigError::NonFiniteExtent { axis, value } => {
                write!(f, "extent on axis {axis} must be finite, got {value}")
            }
            ConfigError::NonPositiveCellSize { value } => {
                write!(f, "cell size must be positive and finite, got {value}")
            }
            ConfigError::SelfAdjacent { kind } => {
                write!(f, "compartment {kind} cannot border itself")
            }
            ConfigError::AlreadyBuilt { kind } => {
                write!(f, "compartment {kind} is already built")
            }
            ConfigError::PartitionOutOfBounds { local, grid } => {
                write!(f, "local partition {local:?} exceeds compartment grid {grid:?}")
            }
            ConfigError::Space(err) => write!(f, "invalid extents: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Space(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(err: SpaceError) -> Self {
        ConfigError::Space(err)
    }
}

/// Failures of field registration and per-cell field access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// Registration attempted after the layer was initialized.
    LayerInitialized,
    /// Cell access attempted before the layer was initialized.
    LayerNotInitialized,
    /// A field with this qualified name is already registered.
    DuplicateField {
        /// The rejected name.
        name: String,
    },
    /// No field registered under this name.
    UnknownField {
        /// The looked-up name.
        name: String,
    },
    /// A field id that no registered field answers to.
    UnknownFieldId(FieldId),
    /// The cell is neither local nor cached as a ghost.
    NotFound {
        /// The requested cell.
        point: GridPoint,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::LayerInitialized => {
                write!(f, "field layer already initialized; registration is closed")
            }
            FieldError::LayerNotInitialized => write!(f, "field layer not initialized"),
            FieldError::DuplicateField { name } => {
                write!(f, "field {name:?} is already registered")
            }
            FieldError::UnknownField { name } => write!(f, "no field named {name:?}"),
            FieldError::UnknownFieldId(id) => write!(f, "no field with id {id}"),
            FieldError::NotFound { point } => {
                write!(f, "cell {point} is neither local nor a cached ghost")
            }
        }
    }
}

impl Error for FieldError {}

/// Failures of agent placement and cross-compartment transfer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveError {
    /// The agent id is not present in the source compartment.
    UnknownAgent(AgentId),
    /// The target coordinate resolves to no built compartment.
    Unresolvable {
        /// Compartment the coordinate was expressed in.
        from: CompartmentKind,
        /// The unresolvable location.
        point: SpacePoint,
    },
    /// A compartment named by the operation has not been built.
    MissingCompartment(CompartmentKind),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::UnknownAgent(id) => write!(f, "agent {id} is not in this compartment"),
            MoveError::Unresolvable { from, point } => {
                write!(f, "{point} (relative to {from}) resolves to no compartment")
            }
            MoveError::MissingCompartment(kind) => {
                write!(f, "compartment {kind} has not been built")
            }
        }
    }
}

impl Error for MoveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_name_context() {
        let err = FieldError::UnknownField {
            name: "lumen.il10".into(),
        };
        assert!(err.to_string().contains("lumen.il10"));
    }

    #[test]
    fn config_error_wraps_space_error() {
        let source = SpaceError::EmptyExtent { axis: Axis::X };
        let err = ConfigError::from(source.clone());
        assert_eq!(err, ConfigError::Space(source));
        assert!(Error::source(&err).is_some());
    }
}
