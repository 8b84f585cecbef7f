//! Capture controller
//!
//! Owns the single live [`StreamHandle`] of a camera feed. Acquisition is the
//! only suspension point: every `activate` takes a generation number before
//! awaiting the host and checks it again on resume, so a result that was
//! superseded or torn down in the meantime is released instead of bound.
//!
//! Two locks: `transitions` serializes every change of the held stream
//! together with its sink call, and `inner` guards the state itself. The
//! sink is only called with `transitions` held, never `inner`, so a sink can
//! read the controller while binding. Lock order is `transitions` then
//! `inner`.

use crate::config::CaptureConfig;
use crate::error::{CaptureError, CaptureResult};
use crate::event::{failure_message, CaptureEvent, ErrorEmitter, ErrorSignal};
use crate::state::CaptureState;
use camfeed_media::{
    MediaError, MediaHost, ReleaseReport, RenderSink, StreamHandle, TrackKind, TrackSettings,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Capture statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Calls to `activate` that issued a host request
    pub activations: u64,
    /// Acquisitions that ended bound
    pub successful_acquisitions: u64,
    /// Acquisitions that ended failed
    pub failed_acquisitions: u64,
    /// Results discarded because a newer activation or teardown won
    pub stale_results: u64,
    /// Tracks that stopped cleanly
    pub tracks_stopped: u64,
    /// Tracks whose stop failed
    pub release_failures: u64,
}

/// Snapshot of the held stream
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    /// Stream ID
    pub stream_id: String,
    /// Track IDs in host order
    pub track_ids: Vec<String>,
    /// Kinds of the tracks, matching `track_ids`
    pub track_kinds: Vec<TrackKind>,
    /// Settings of the first video track
    pub video_settings: Option<TrackSettings>,
}

impl StreamInfo {
    fn from_stream(stream: &StreamHandle) -> Self {
        Self {
            stream_id: stream.id().to_string(),
            track_ids: stream.tracks().iter().map(|t| t.id().to_string()).collect(),
            track_kinds: stream.tracks().iter().map(|t| t.kind()).collect(),
            video_settings: stream.video_settings(),
        }
    }
}

#[derive(Debug)]
struct ControllerInner {
    state: CaptureState,
    stream: Option<StreamHandle>,
    generation: u64,
    released: bool,
    errors: ErrorEmitter,
}

/// Single-camera capture lifecycle manager
pub struct CaptureController {
    host: Arc<dyn MediaHost>,
    sink: Arc<dyn RenderSink>,
    config: CaptureConfig,
    transitions: Mutex<()>,
    inner: Mutex<ControllerInner>,
    event_tx: broadcast::Sender<CaptureEvent>,
    stats: RwLock<CaptureStats>,
}

impl CaptureController {
    /// Create a controller with the default configuration
    pub fn new(host: Arc<dyn MediaHost>, sink: Arc<dyn RenderSink>) -> Self {
        Self::build(host, sink, CaptureConfig::default())
    }

    /// Create a controller with a custom configuration
    pub fn with_config(
        host: Arc<dyn MediaHost>,
        sink: Arc<dyn RenderSink>,
        config: CaptureConfig,
    ) -> CaptureResult<Self> {
        config.validate()?;
        Ok(Self::build(host, sink, config))
    }

    fn build(host: Arc<dyn MediaHost>, sink: Arc<dyn RenderSink>, config: CaptureConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_buffer_size);

        Self {
            host,
            sink,
            config,
            transitions: Mutex::new(()),
            inner: Mutex::new(ControllerInner {
                state: CaptureState::Idle,
                stream: None,
                generation: 0,
                released: false,
                errors: ErrorEmitter::new(),
            }),
            event_tx,
            stats: RwLock::new(CaptureStats::default()),
        }
    }

    /// Request a camera stream and bind it to the render sink.
    ///
    /// Acquisition failures are not returned: they move the controller to
    /// `Failed` and are emitted on the error signal. The returned state is the
    /// controller's state when this call finishes, which may belong to a newer
    /// activation. Fails only with [`CaptureError::Released`] when the
    /// controller was torn down before or during the request.
    pub async fn activate(&self) -> CaptureResult<CaptureState> {
        let (generation, previous) = {
            let _transition = self.transitions.lock();
            let (generation, previous) = {
                let mut inner = self.inner.lock();
                if inner.released {
                    return Err(CaptureError::Released);
                }

                inner.generation += 1;
                let previous = inner.stream.take();
                self.transition(&mut inner, CaptureState::Requesting);
                (inner.generation, previous)
            };

            if previous.is_some() {
                self.sink.unbind();
            }
            (generation, previous)
        };

        self.stats.write().activations += 1;

        if let Some(stream) = previous {
            debug!("Releasing stream {} before re-acquiring", stream.id());
            self.release_stream(stream);
        }

        info!("Requesting camera stream ({:?})", self.config.constraints);
        let result = self.host.request_stream(&self.config.constraints).await;

        let transition = self.transitions.lock();
        let mut inner = self.inner.lock();
        if inner.released || inner.generation != generation {
            let released = inner.released;
            let current = inner.state;
            drop(inner);
            drop(transition);

            self.discard_stale(generation, result);
            return if released {
                Err(CaptureError::Released)
            } else {
                Ok(current)
            };
        }

        match result {
            Ok(stream) => {
                // Generation cannot move while `transitions` is held
                drop(inner);
                self.sink.bind(&stream);
                let _ = self.event_tx.send(CaptureEvent::StreamBound {
                    stream_id: stream.id().to_string(),
                    track_count: stream.track_count(),
                });
                info!(
                    "Camera stream {} bound with {} tracks",
                    stream.id(),
                    stream.track_count()
                );

                let mut inner = self.inner.lock();
                inner.stream = Some(stream);
                self.transition(&mut inner, CaptureState::Bound);
                drop(inner);
                drop(transition);

                self.stats.write().successful_acquisitions += 1;
                Ok(CaptureState::Bound)
            }
            Err(error) => {
                self.transition(&mut inner, CaptureState::Failed);

                let message = failure_message(&error);
                warn!("{} ({:?})", message, error.category());
                inner.errors.emit(message.clone());
                let _ = self.event_tx.send(CaptureEvent::WebcamError { message });

                self.stats.write().failed_acquisitions += 1;
                Ok(CaptureState::Failed)
            }
        }
    }

    /// Release the held stream and retire the controller.
    ///
    /// Safe from every state and idempotent. A request still in flight is
    /// invalidated; its stream is stopped as soon as it arrives. Track stop
    /// failures are logged and counted, never returned.
    pub fn teardown(&self) {
        let stream = {
            let _transition = self.transitions.lock();
            let stream = {
                let mut inner = self.inner.lock();
                if inner.released {
                    debug!("Capture controller already released");
                    return;
                }

                inner.released = true;
                inner.generation += 1;
                debug!("Tearing down capture controller from {}", inner.state);
                inner.stream.take()
            };

            if stream.is_some() {
                self.sink.unbind();
            }
            stream
        };

        if let Some(stream) = stream {
            self.release_stream(stream);
        }

        let _ = self.event_tx.send(CaptureEvent::Released);
        info!("Capture controller released");
    }

    /// Current state, or `None` once torn down
    pub fn state(&self) -> Option<CaptureState> {
        let inner = self.inner.lock();
        if inner.released {
            None
        } else {
            Some(inner.state)
        }
    }

    /// Whether teardown has run
    pub fn is_released(&self) -> bool {
        self.inner.lock().released
    }

    /// Whether a stream handle is held
    pub fn has_stream(&self) -> bool {
        self.inner.lock().stream.is_some()
    }

    /// Snapshot of the held stream
    pub fn stream_info(&self) -> Option<StreamInfo> {
        self.inner.lock().stream.as_ref().map(StreamInfo::from_stream)
    }

    /// Subscribe to capture events
    pub fn subscribe_events(&self) -> broadcast::Receiver<CaptureEvent> {
        self.event_tx.subscribe()
    }

    /// Handle on the single-slot webcam error signal
    pub fn error_signal(&self) -> ErrorSignal {
        self.inner.lock().errors.subscribe()
    }

    /// Get current statistics
    pub fn stats(&self) -> CaptureStats {
        self.stats.read().clone()
    }

    /// Get current configuration
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    fn transition(&self, inner: &mut ControllerInner, to: CaptureState) {
        let from = inner.state;
        inner.state = to;
        debug!("Capture state {} -> {}", from, to);
        let _ = self.event_tx.send(CaptureEvent::StateChanged { from, to });
    }

    fn discard_stale(&self, generation: u64, result: Result<StreamHandle, MediaError>) {
        self.stats.write().stale_results += 1;

        match result {
            Ok(stream) => {
                debug!(
                    "Activation {} superseded, releasing late stream {}",
                    generation,
                    stream.id()
                );
                self.release_stream(stream);
            }
            Err(error) => {
                debug!(
                    "Activation {} superseded, dropping late failure: {}",
                    generation, error
                );
            }
        }
    }

    fn release_stream(&self, stream: StreamHandle) -> ReleaseReport {
        let stream_id = stream.id().to_string();
        let report = stream.release();

        {
            let mut stats = self.stats.write();
            stats.tracks_stopped += report.stopped as u64;
            stats.release_failures += report.failures.len() as u64;
        }

        if report.is_clean() {
            debug!("Released stream {} ({} tracks)", stream_id, report.stopped);
        } else {
            warn!(
                "Released stream {} with {} of {} track stops failing",
                stream_id,
                report.failures.len(),
                report.attempted()
            );
        }

        let _ = self.event_tx.send(CaptureEvent::StreamReleased {
            stream_id,
            stopped: report.stopped,
            failed: report.failures.len(),
        });

        report
    }
}

impl std::fmt::Debug for CaptureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("state", &self.state())
            .field("has_stream", &self.has_stream())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.teardown();
    }
}
