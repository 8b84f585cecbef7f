//! Stream and track ownership
//!
//! A [`StreamHandle`] exclusively owns the [`Track`]s the host produced for one
//! acquisition. Tracks move one way, `Active` to `Stopped`, and every track is
//! stopped before its handle goes away.

use crate::error::{MediaError, MediaResult};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Media kind carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    /// Camera video
    Video,
    /// Microphone audio
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Video => write!(f, "video"),
            TrackKind::Audio => write!(f, "audio"),
        }
    }
}

/// Track state enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Track is delivering media
    Active,
    /// Track has been stopped and cannot be restarted
    Stopped,
}

/// Settings reported by the host for a video track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSettings {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Frames per second
    pub frame_rate: f64,
}

impl TrackSettings {
    pub const fn new(width: u32, height: u32, frame_rate: f64) -> Self {
        Self {
            width,
            height,
            frame_rate,
        }
    }

    pub const VGA: Self = Self::new(640, 480, 30.0);
    pub const HD: Self = Self::new(1280, 720, 30.0);

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Host-side handle for releasing the hardware behind one track
pub trait TrackSource: Send + Sync {
    /// Stop delivering media and release the underlying device.
    fn stop(&self) -> MediaResult<()>;
}

/// A single media channel owned by a [`StreamHandle`]
pub struct Track {
    id: String,
    kind: TrackKind,
    settings: Option<TrackSettings>,
    state: TrackState,
    source: Box<dyn TrackSource>,
}

impl Track {
    /// Create an active video track
    pub fn video(source: Box<dyn TrackSource>, settings: TrackSettings) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: TrackKind::Video,
            settings: Some(settings),
            state: TrackState::Active,
            source,
        }
    }

    /// Create an active audio track
    pub fn audio(source: Box<dyn TrackSource>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: TrackKind::Audio,
            settings: None,
            state: TrackState::Active,
            source,
        }
    }

    /// Replace the generated track ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Get track ID
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn settings(&self) -> Option<TrackSettings> {
        self.settings
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TrackState::Active
    }

    /// Stop the track.
    ///
    /// The source is asked to stop at most once over the track's lifetime.
    /// Returns `Ok(false)` when the track was already stopped. A failed stop
    /// still leaves the track `Stopped`; the failure is returned to the caller.
    pub fn stop(&mut self) -> MediaResult<bool> {
        if self.state == TrackState::Stopped {
            return Ok(false);
        }
        self.state = TrackState::Stopped;

        self.source
            .stop()
            .map_err(|e| MediaError::ReleaseFailed {
                track_id: self.id.clone(),
                reason: e.reason().map(str::to_string).unwrap_or_else(|| e.to_string()),
            })?;

        debug!("Stopped {} track {}", self.kind, self.id);
        Ok(true)
    }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("settings", &self.settings)
            .field("state", &self.state)
            .finish()
    }
}

/// Outcome of releasing every track of a stream
#[derive(Debug, Clone, Default)]
pub struct ReleaseReport {
    /// Tracks that stopped cleanly during this release
    pub stopped: usize,
    /// Tracks whose stop failed
    pub failures: Vec<MediaError>,
}

impl ReleaseReport {
    /// Number of tracks a stop was attempted on
    pub fn attempted(&self) -> usize {
        self.stopped + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Exclusive ownership token for the tracks of one acquired stream
#[derive(Debug)]
pub struct StreamHandle {
    id: String,
    tracks: Vec<Track>,
}

impl StreamHandle {
    /// Wrap host-produced tracks
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tracks,
        }
    }

    /// Get stream ID
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Tracks of the video kind
    pub fn video_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.kind() == TrackKind::Video)
    }

    /// Settings of the first video track, if any
    pub fn video_settings(&self) -> Option<TrackSettings> {
        self.video_tracks().find_map(|t| t.settings())
    }

    /// Whether any track is still delivering media
    pub fn is_active(&self) -> bool {
        self.tracks.iter().any(Track::is_active)
    }

    /// Attempt to stop every active track.
    ///
    /// A failure on one track never prevents the others from being stopped.
    pub fn stop_all(&mut self) -> ReleaseReport {
        let mut report = ReleaseReport::default();

        for track in &mut self.tracks {
            match track.stop() {
                Ok(true) => report.stopped += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("Track release failed on stream {}: {}", self.id, e);
                    report.failures.push(e);
                }
            }
        }

        report
    }

    /// Stop every track and consume the handle
    pub fn release(mut self) -> ReleaseReport {
        self.stop_all()
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if self.is_active() {
            warn!("Stream {} dropped with active tracks, stopping them", self.id);
            self.stop_all();
        }
    }
}
