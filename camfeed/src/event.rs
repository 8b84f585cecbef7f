//! Capture events and the webcam error signal
//!
//! Containers observe a controller two ways: a broadcast of every lifecycle
//! [`CaptureEvent`], and a single-slot [`ErrorSignal`] that only ever holds the
//! most recent acquisition failure.

use crate::state::CaptureState;
use camfeed_media::{MediaError, UNKNOWN_ERROR};
use tokio::sync::watch;

/// Event type emitted to the container when acquisition fails
pub const WEBCAM_ERROR_EVENT: &str = "webcam-error";

/// Prefix of every webcam error payload
pub const WEBCAM_ERROR_PREFIX: &str = "Failed to access webcam: ";

/// Build the container-facing message for an acquisition failure
pub fn failure_message(error: &MediaError) -> String {
    format!(
        "{}{}",
        WEBCAM_ERROR_PREFIX,
        error.reason().unwrap_or(UNKNOWN_ERROR)
    )
}

/// Events emitted by a capture controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Lifecycle state changed
    StateChanged {
        /// Previous state
        from: CaptureState,
        /// New state
        to: CaptureState,
    },
    /// A stream was bound to the render sink
    StreamBound {
        /// Bound stream ID
        stream_id: String,
        /// Number of tracks in the stream
        track_count: usize,
    },
    /// Acquisition failed
    WebcamError {
        /// Formatted failure message
        message: String,
    },
    /// A stream's tracks were released
    StreamReleased {
        /// Released stream ID
        stream_id: String,
        /// Tracks that stopped cleanly
        stopped: usize,
        /// Tracks whose stop failed
        failed: usize,
    },
    /// Controller was torn down
    Released,
}

impl CaptureEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            CaptureEvent::StateChanged { .. } => "state-changed",
            CaptureEvent::StreamBound { .. } => "stream-bound",
            CaptureEvent::WebcamError { .. } => WEBCAM_ERROR_EVENT,
            CaptureEvent::StreamReleased { .. } => "stream-released",
            CaptureEvent::Released => "released",
        }
    }

    /// Check if this is an error event
    pub fn is_error_event(&self) -> bool {
        matches!(self, CaptureEvent::WebcamError { .. })
    }

    /// String payload of an error event
    pub fn error_message(&self) -> Option<&str> {
        match self {
            CaptureEvent::WebcamError { message } => Some(message),
            _ => None,
        }
    }
}

/// One emission of the error signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    /// Increases by one for every failed activation
    pub sequence: u64,
    /// Formatted failure message
    pub message: String,
}

/// Receiving side of the single-slot error channel
#[derive(Debug, Clone)]
pub struct ErrorSignal {
    rx: watch::Receiver<Option<ErrorNotice>>,
}

impl ErrorSignal {
    pub(crate) fn new(rx: watch::Receiver<Option<ErrorNotice>>) -> Self {
        Self { rx }
    }

    /// Most recent failure, if any has been emitted
    pub fn latest(&self) -> Option<ErrorNotice> {
        self.rx.borrow().as_ref().cloned()
    }

    /// Whether a failure arrived since this handle last looked
    pub fn has_pending(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next failure.
    ///
    /// Returns `None` once the controller is gone.
    pub async fn next(&mut self) -> Option<ErrorNotice> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().as_ref().cloned()
    }
}

/// Sending side owned by the controller
#[derive(Debug)]
pub(crate) struct ErrorEmitter {
    tx: watch::Sender<Option<ErrorNotice>>,
    sequence: u64,
}

impl ErrorEmitter {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx, sequence: 0 }
    }

    pub(crate) fn subscribe(&self) -> ErrorSignal {
        ErrorSignal::new(self.tx.subscribe())
    }

    /// Replace the slot with a new failure
    pub(crate) fn emit(&mut self, message: String) -> ErrorNotice {
        self.sequence += 1;
        let notice = ErrorNotice {
            sequence: self.sequence,
            message,
        };
        self.tx.send_replace(Some(notice.clone()));
        notice
    }
}
