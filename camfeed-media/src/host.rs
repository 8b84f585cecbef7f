//! Host media subsystem seam
//!
//! The host is the only thing that touches camera hardware and permissions.
//! It is injected into the capture controller as a [`MediaHost`] so tests can
//! substitute a deterministic [`MockMediaHost`] built per test.

use crate::error::{MediaError, MediaResult};
use crate::tracks::{StreamHandle, Track, TrackSettings, TrackSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::debug;

/// Capabilities requested from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConstraints {
    /// Request a camera video track
    pub video: bool,
    /// Request a microphone audio track
    pub audio: bool,
}

impl StreamConstraints {
    /// Video only, no audio
    pub const fn camera_only() -> Self {
        Self {
            video: true,
            audio: false,
        }
    }
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self::camera_only()
    }
}

/// Host media subsystem that can hand out a live camera stream
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Request a stream matching `constraints`.
    ///
    /// This may suspend for as long as the host takes (permission prompts,
    /// device start-up). There is no cancellation; callers discard late
    /// results themselves.
    async fn request_stream(&self, constraints: &StreamConstraints) -> MediaResult<StreamHandle>;
}

/// Track source handed out by [`MockMediaHost`]
#[derive(Debug, Clone)]
pub struct MockTrackSource {
    stops: Arc<AtomicUsize>,
    fail: bool,
}

impl MockTrackSource {
    /// Source whose stop calls are counted in the returned counter
    pub fn counted() -> (Self, Arc<AtomicUsize>) {
        let stops = Arc::new(AtomicUsize::new(0));
        (
            Self {
                stops: stops.clone(),
                fail: false,
            },
            stops,
        )
    }

    /// Source whose stop is counted and then fails
    pub fn failing() -> (Self, Arc<AtomicUsize>) {
        let (mut source, stops) = Self::counted();
        source.fail = true;
        (source, stops)
    }
}

impl TrackSource for MockTrackSource {
    fn stop(&self) -> MediaResult<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MediaError::unavailable("mock track refused to stop"));
        }
        Ok(())
    }
}

/// Scripted response of a [`MockMediaHost`] request
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Resolve with a stream of `video_tracks` video tracks
    Stream {
        video_tracks: usize,
        settings: TrackSettings,
    },
    /// Reject with the given error
    Reject(MediaError),
}

/// Deterministic host for tests and demos.
///
/// Requests consume queued outcomes first and fall back to the default
/// outcome once the queue is empty. A gate can hold each request pending
/// until the test releases it.
pub struct MockMediaHost {
    queued: Mutex<VecDeque<MockOutcome>>,
    fallback: MockOutcome,
    gate: Option<Arc<Notify>>,
    fail_track_stops: bool,
    requests: AtomicUsize,
    constraints: Mutex<Vec<StreamConstraints>>,
    track_stops: Mutex<Vec<Arc<AtomicUsize>>>,
}

impl MockMediaHost {
    fn with_fallback(fallback: MockOutcome) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback,
            gate: None,
            fail_track_stops: false,
            requests: AtomicUsize::new(0),
            constraints: Mutex::new(Vec::new()),
            track_stops: Mutex::new(Vec::new()),
        }
    }

    /// Host that resolves every request with `video_tracks` VGA video tracks
    pub fn with_stream(video_tracks: usize) -> Self {
        Self::with_fallback(MockOutcome::Stream {
            video_tracks,
            settings: TrackSettings::VGA,
        })
    }

    /// Host that rejects every request with `error`
    pub fn rejecting(error: MediaError) -> Self {
        Self::with_fallback(MockOutcome::Reject(error))
    }

    /// Queue an outcome for the next request not yet served
    pub fn then(self, outcome: MockOutcome) -> Self {
        self.queued.lock().push_back(outcome);
        self
    }

    /// Hold every request until `gate` is notified once per request
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Make every produced track fail when stopped
    pub fn with_failing_stops(mut self) -> Self {
        self.fail_track_stops = true;
        self
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Constraints of every request, in order
    pub fn requested_constraints(&self) -> Vec<StreamConstraints> {
        self.constraints.lock().clone()
    }

    /// Stop calls per produced track, in production order
    pub fn stop_counts(&self) -> Vec<usize> {
        self.track_stops
            .lock()
            .iter()
            .map(|stops| stops.load(Ordering::SeqCst))
            .collect()
    }

    /// Stop calls across every produced track
    pub fn total_stops(&self) -> usize {
        self.stop_counts().iter().sum()
    }

    fn next_outcome(&self) -> MockOutcome {
        self.queued
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn build_stream(&self, video_tracks: usize, settings: TrackSettings) -> StreamHandle {
        let mut tracks = Vec::with_capacity(video_tracks);
        let mut counters = self.track_stops.lock();

        for _ in 0..video_tracks {
            let (source, stops) = if self.fail_track_stops {
                MockTrackSource::failing()
            } else {
                MockTrackSource::counted()
            };
            counters.push(stops);
            tracks.push(Track::video(Box::new(source), settings));
        }

        StreamHandle::new(tracks)
    }
}

#[async_trait]
impl MediaHost for MockMediaHost {
    async fn request_stream(&self, constraints: &StreamConstraints) -> MediaResult<StreamHandle> {
        let request = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        self.constraints.lock().push(*constraints);
        let outcome = self.next_outcome();

        if let Some(gate) = &self.gate {
            debug!("Mock host holding request {}", request);
            gate.notified().await;
        }

        match outcome {
            MockOutcome::Stream {
                video_tracks,
                settings,
            } => {
                debug!("Mock host resolving request {} with {} tracks", request, video_tracks);
                Ok(self.build_stream(video_tracks, settings))
            }
            MockOutcome::Reject(error) => {
                debug!("Mock host rejecting request {}: {}", request, error);
                Err(error)
            }
        }
    }
}
