//! # camfeed - Single-Camera Capture Lifecycle
//!
//! camfeed acquires a live camera stream from an injected host, binds it to a
//! render sink, reports acquisition failures to its container, and guarantees
//! that every camera track is stopped when the feed is torn down.
//!
//! ## Key Features
//!
//! - **Injected host**: the camera comes from a [`MediaHost`], never a global
//! - **Deterministic release**: each track is stopped exactly once
//! - **Teardown wins**: a stream that arrives after teardown is released, not bound
//! - **Container signals**: lifecycle events plus a single-slot `webcam-error` signal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use camfeed::{CaptureController, MockMediaHost, SurfaceSink};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), camfeed::CaptureError> {
//!     let sink = Arc::new(SurfaceSink::new());
//!     let controller = CaptureController::new(Arc::new(MockMediaHost::with_stream(1)), sink.clone());
//!
//!     let errors = controller.error_signal();
//!     controller.activate().await?;
//!     if let Some(notice) = errors.latest() {
//!         eprintln!("{}", notice.message);
//!     }
//!
//!     controller.teardown();
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export media types for easy access
pub use camfeed_media::{
    DrawSurface, ErrorCategory, MediaError, MediaHost, MediaResult, MockMediaHost, MockOutcome,
    MockTrackSource, ReleaseReport, RenderSink, RenderStats, StreamConstraints, StreamHandle,
    SurfaceSink, Track, TrackKind, TrackSettings, TrackSource, TrackState, VideoSurface,
};

// Public API modules
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod state;

// Re-export main API types
pub use config::CaptureConfig;
pub use controller::{CaptureController, CaptureStats, StreamInfo};
pub use error::{CaptureError, CaptureResult};
pub use event::{
    failure_message, CaptureEvent, ErrorNotice, ErrorSignal, WEBCAM_ERROR_EVENT,
    WEBCAM_ERROR_PREFIX,
};
pub use state::CaptureState;

use tracing_subscriber::EnvFilter;

/// Install a `tracing` fmt subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise `default_filter`
/// (for example `"camfeed=debug"`).
pub fn init_logging(default_filter: &str) -> CaptureResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| CaptureError::Initialization {
            reason: format!("Failed to install tracing subscriber: {}", e),
        })
}
