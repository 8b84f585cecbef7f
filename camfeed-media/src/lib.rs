//! # camfeed media
//!
//! Streams, tracks and render sinks for camfeed. This crate owns everything
//! that touches camera resources: the host acquisition seam, exclusive track
//! ownership with guaranteed release, and the surfaces a stream is bound to.

#![warn(clippy::all)]

pub mod error;
pub mod host;
pub mod render;
pub mod tracks;

// Re-export main types
pub use error::{ErrorCategory, MediaError, MediaResult, UNKNOWN_ERROR};
pub use host::{MediaHost, MockMediaHost, MockOutcome, MockTrackSource, StreamConstraints};
pub use render::{
    DrawSurface, RenderSink, RenderStats, SurfaceSink, VideoSurface, MAX_CANVAS_PIXELS,
};
pub use tracks::{
    ReleaseReport, StreamHandle, Track, TrackKind, TrackSettings, TrackSource, TrackState,
};
