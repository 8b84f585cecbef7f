//! Capture lifecycle states

use std::fmt;

/// Acquisition lifecycle of a capture controller.
///
/// Teardown is not a variant: once released a controller reports no state at
/// all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureState {
    /// Nothing requested yet
    Idle,
    /// Waiting on the host for a stream
    Requesting,
    /// A stream is held and bound to the render sink
    Bound,
    /// The last acquisition failed
    Failed,
}

impl CaptureState {
    /// Whether a stream handle is held in this state
    pub fn holds_stream(&self) -> bool {
        matches!(self, CaptureState::Bound)
    }
}

impl Default for CaptureState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::Idle => write!(f, "idle"),
            CaptureState::Requesting => write!(f, "requesting"),
            CaptureState::Bound => write!(f, "bound"),
            CaptureState::Failed => write!(f, "failed"),
        }
    }
}
