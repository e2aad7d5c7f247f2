//! Error types for synchronization rounds.

use mucosa_core::LayerId;
use std::error::Error;
use std::fmt;

/// Errors from a collective synchronization round.
///
/// A round either completes for this process or the process is considered
/// failed; there is no partial or timeout mode, so these surface as fatal
/// to the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncError {
    /// The underlying transport reported a failure.
    Transport {
        /// Human-readable description from the transport.
        reason: String,
    },
    /// A received layer snapshot does not match its declared shape.
    MalformedSnapshot {
        /// The snapshot's layer id.
        layer: LayerId,
        /// Expected value count (cells × fields).
        expected: usize,
        /// Actual value count received.
        actual: usize,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { reason } => write!(f, "transport failure: {reason}"),
            Self::MalformedSnapshot {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "malformed snapshot for layer {layer}: expected {expected} values, got {actual}"
            ),
        }
    }
}

impl Error for SyncError {}
