//! Render sinks for acquired camera streams
//!
//! A [`RenderSink`] makes a bound stream visible. The bundled [`SurfaceSink`]
//! pairs a playable [`VideoSurface`] with a [`DrawSurface`] pixel buffer that
//! downstream consumers can read from or paint into.

use crate::error::{MediaError, MediaResult};
use crate::tracks::{StreamHandle, TrackSettings};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

/// Bytes per RGBA pixel
const RGBA_BYTES: usize = 4;

/// Largest drawing surface a sink will allocate (8K UHD)
pub const MAX_CANVAS_PIXELS: u64 = 7680 * 4320;

/// Buffer length for a `width` x `height` RGBA canvas
fn canvas_len(width: u32, height: u32) -> MediaResult<usize> {
    let too_large = || MediaError::InvalidConfiguration {
        message: format!(
            "Drawing surface {}x{} exceeds {} pixels",
            width, height, MAX_CANVAS_PIXELS
        ),
    };

    let pixels = u64::from(width)
        .checked_mul(u64::from(height))
        .filter(|&pixels| pixels <= MAX_CANVAS_PIXELS)
        .ok_or_else(too_large)?;

    usize::try_from(pixels)
        .ok()
        .and_then(|pixels| pixels.checked_mul(RGBA_BYTES))
        .ok_or_else(too_large)
}

/// Destination for a live stream.
///
/// The capture controller calls `bind` once per successful acquisition, before
/// it reports `Bound`. Sink calls are serialized with the controller's
/// activations and teardowns, so a sink may read the controller's state but
/// must not activate or tear it down from inside `bind` or `unbind`. Binding
/// problems are the sink's own concern and are not reported back.
pub trait RenderSink: Send + Sync {
    /// Attach `stream` to the surface
    fn bind(&self, stream: &StreamHandle);

    /// Detach whatever stream is attached
    fn unbind(&self) {}
}

/// Playable surface showing the bound stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoSurface {
    stream_id: Option<String>,
    track_ids: Vec<String>,
    playing: bool,
}

impl VideoSurface {
    /// ID of the bound stream
    pub fn stream_id(&self) -> Option<&str> {
        self.stream_id.as_deref()
    }

    /// IDs of the video tracks being played
    pub fn track_ids(&self) -> &[String] {
        &self.track_ids
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn attach(&mut self, stream: &StreamHandle) {
        self.stream_id = Some(stream.id().to_string());
        self.track_ids = stream.video_tracks().map(|t| t.id().to_string()).collect();
        self.playing = true;
    }

    fn detach(&mut self) {
        *self = Self::default();
    }
}

/// RGBA pixel buffer sized to the bound video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DrawSurface {
    /// Allocate a zeroed canvas.
    ///
    /// Fails with [`MediaError::InvalidConfiguration`] when the canvas would
    /// exceed [`MAX_CANVAS_PIXELS`].
    pub fn new(width: u32, height: u32) -> MediaResult<Self> {
        Ok(Self {
            width,
            height,
            pixels: vec![0; canvas_len(width, height)?],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Resize, discarding current contents.
    ///
    /// An oversized request leaves the canvas untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> MediaResult<()> {
        let len = canvas_len(width, height)?;
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(len, 0);
        Ok(())
    }

    /// Zero every pixel
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }
}

impl Default for DrawSurface {
    fn default() -> Self {
        let TrackSettings { width, height, .. } = TrackSettings::VGA;
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * RGBA_BYTES],
        }
    }
}

/// Render sink statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Streams bound to the surfaces
    pub binds: u64,
    /// Streams detached from the surfaces
    pub unbinds: u64,
    /// Binds dropped because the surfaces were not mounted or the video
    /// was too large to draw
    pub ignored_binds: u64,
}

#[derive(Debug, Default)]
struct SurfaceState {
    mounted: bool,
    video: VideoSurface,
    canvas: DrawSurface,
    stats: RenderStats,
}

/// Video surface plus drawing surface
#[derive(Debug, Default)]
pub struct SurfaceSink {
    state: RwLock<SurfaceState>,
}

impl SurfaceSink {
    /// Create a sink whose surfaces are already mounted
    pub fn new() -> Self {
        let sink = Self::unmounted();
        sink.mount();
        sink
    }

    /// Create a sink whose surfaces are not mounted yet
    pub fn unmounted() -> Self {
        Self::default()
    }

    pub fn mount(&self) {
        self.state.write().mounted = true;
    }

    /// Unmount the surfaces, detaching any bound stream
    pub fn unmount(&self) {
        let mut state = self.state.write();
        state.mounted = false;
        state.video.detach();
        state.canvas.clear();
    }

    pub fn is_mounted(&self) -> bool {
        self.state.read().mounted
    }

    /// Snapshot of the video surface
    pub fn video(&self) -> VideoSurface {
        self.state.read().video.clone()
    }

    /// Current drawing surface dimensions
    pub fn canvas_size(&self) -> (u32, u32) {
        let state = self.state.read();
        (state.canvas.width(), state.canvas.height())
    }

    /// Run `f` with mutable access to the drawing surface
    pub fn with_canvas<R>(&self, f: impl FnOnce(&mut DrawSurface) -> R) -> R {
        f(&mut self.state.write().canvas)
    }

    pub fn stats(&self) -> RenderStats {
        self.state.read().stats.clone()
    }
}

impl RenderSink for SurfaceSink {
    fn bind(&self, stream: &StreamHandle) {
        let mut state = self.state.write();

        if !state.mounted {
            state.stats.ignored_binds += 1;
            warn!("Surface not mounted, ignoring stream {}", stream.id());
            return;
        }

        let settings = stream.video_settings().unwrap_or(TrackSettings::VGA);
        if let Err(e) = state.canvas.resize(settings.width, settings.height) {
            state.stats.ignored_binds += 1;
            warn!("Ignoring stream {}: {}", stream.id(), e);
            return;
        }

        state.video.attach(stream);
        state.stats.binds += 1;

        info!(
            "Bound stream {} to surface at {}x{}",
            stream.id(),
            settings.width,
            settings.height
        );
    }

    fn unbind(&self) {
        let mut state = self.state.write();
        if state.video.stream_id().is_none() {
            return;
        }

        state.video.detach();
        state.canvas.clear();
        state.stats.unbinds += 1;
        debug!("Surface unbound");
    }
}
