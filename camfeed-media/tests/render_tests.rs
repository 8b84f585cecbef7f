//! Unit tests for render sink functionality
//!
//! This module contains tests for surface binding, mount handling,
//! and drawing surface sizing.

use camfeed_media::*;

fn hd_stream(host_tracks: usize) -> StreamHandle {
    let tracks = (0..host_tracks)
        .map(|i| {
            let (source, _) = MockTrackSource::counted();
            Track::video(Box::new(source), TrackSettings::HD).with_id(format!("cam{}", i))
        })
        .collect();
    StreamHandle::new(tracks)
}

// ============================================================================
// BIND TESTS
// ============================================================================

#[test]
fn test_bind_attaches_video_surface() {
    let sink = SurfaceSink::new();
    let stream = hd_stream(1);

    sink.bind(&stream);

    let video = sink.video();
    assert!(video.is_playing());
    assert_eq!(video.stream_id(), Some(stream.id()));
    assert_eq!(video.track_ids(), &["cam0".to_string()]);
    assert_eq!(sink.stats().binds, 1);
}

#[test]
fn test_bind_sizes_canvas_from_track_settings() {
    let sink = SurfaceSink::new();
    assert_eq!(sink.canvas_size(), (640, 480));

    sink.bind(&hd_stream(1));

    assert_eq!(sink.canvas_size(), (1280, 720));
    let len = sink.with_canvas(|canvas| canvas.pixels().len());
    assert_eq!(len, 1280 * 720 * 4);
}

#[test]
fn test_bind_without_video_track_uses_default_canvas() {
    let sink = SurfaceSink::new();
    let stream = StreamHandle::new(Vec::new());

    sink.bind(&stream);

    assert_eq!(sink.canvas_size(), (640, 480));
    assert!(sink.video().track_ids().is_empty());
    assert!(sink.video().is_playing());
}

#[test]
fn test_unmounted_sink_ignores_bind() {
    let sink = SurfaceSink::unmounted();
    assert!(!sink.is_mounted());

    sink.bind(&hd_stream(1));

    assert!(!sink.video().is_playing());
    assert_eq!(
        sink.stats(),
        RenderStats {
            binds: 0,
            unbinds: 0,
            ignored_binds: 1,
        }
    );
}

#[test]
fn test_oversized_video_is_ignored() {
    let sink = SurfaceSink::new();
    let (source, stops) = MockTrackSource::counted();
    let huge = TrackSettings::new(u32::MAX, u32::MAX, 30.0);
    let stream = StreamHandle::new(vec![Track::video(Box::new(source), huge)]);

    sink.bind(&stream);

    assert!(!sink.video().is_playing());
    assert_eq!(sink.canvas_size(), (640, 480));
    assert_eq!(sink.stats().ignored_binds, 1);
    assert_eq!(sink.stats().binds, 0);

    // Sink keeps working for the next stream
    sink.bind(&hd_stream(1));
    assert_eq!(sink.canvas_size(), (1280, 720));
    assert_eq!(sink.stats().binds, 1);

    drop(stream);
    assert_eq!(stops.load(std::sync::atomic::Ordering::SeqCst), 1);
}

// ============================================================================
// UNBIND TESTS
// ============================================================================

#[test]
fn test_unbind_clears_surfaces() {
    let sink = SurfaceSink::new();
    sink.bind(&hd_stream(1));
    sink.with_canvas(|canvas| canvas.pixels_mut().fill(0xff));

    sink.unbind();

    assert_eq!(sink.video(), VideoSurface::default());
    assert!(sink.with_canvas(|canvas| canvas.pixels().iter().all(|&b| b == 0)));
    assert_eq!(sink.stats().unbinds, 1);
}

#[test]
fn test_unmount_detaches_stream() {
    let sink = SurfaceSink::new();
    sink.bind(&hd_stream(2));
    assert_eq!(sink.video().track_ids().len(), 2);

    sink.unmount();

    assert!(!sink.is_mounted());
    assert!(sink.video().stream_id().is_none());

    sink.mount();
    sink.bind(&hd_stream(1));
    assert_eq!(sink.stats().binds, 2);
}
