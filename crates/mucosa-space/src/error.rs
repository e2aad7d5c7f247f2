//! Error types for domain construction.

use mucosa_core::Axis;
use std::error::Error;
use std::fmt;

/// Errors detected when constructing a rectangular domain.
#[derive(Clone, Debug, PartialEq)]
pub enum SpaceError {
    /// An axis extent is zero or negative.
    EmptyExtent {
        /// The offending axis.
        axis: Axis,
    },
    /// An axis extent is NaN or infinite.
    NonFiniteExtent {
        /// The offending axis.
        axis: Axis,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyExtent { axis } => write!(f, "extent on axis {axis} is empty"),
            Self::NonFiniteExtent { axis, value } => {
                write!(f, "extent on axis {axis} is not finite: {value}")
            }
        }
    }
}

impl Error for SpaceError {}
