//! Unit tests for stream acquisition and release
//!
//! This module contains tests for the mock host, track ownership,
//! and release guarantees.

use camfeed_media::*;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_test::{assert_pending, assert_ready};

// ============================================================================
// HOST TESTS
// ============================================================================

#[tokio::test]
async fn test_host_receives_camera_only_constraints() {
    let host = MockMediaHost::with_stream(1);

    let stream = host
        .request_stream(&StreamConstraints::camera_only())
        .await
        .unwrap();

    assert_eq!(stream.track_count(), 1);
    assert_eq!(
        host.requested_constraints(),
        vec![StreamConstraints {
            video: true,
            audio: false,
        }]
    );
}

#[tokio::test]
async fn test_host_rejection_without_message() {
    let host = MockMediaHost::rejecting(MediaError::AcquisitionDenied { message: None });

    let err = host
        .request_stream(&StreamConstraints::default())
        .await
        .unwrap_err();

    assert_eq!(err.reason(), None);
    assert_eq!(err.category(), ErrorCategory::Permission);
}

#[tokio::test]
async fn test_host_scripted_settings() {
    let host = MockMediaHost::rejecting(MediaError::unavailable("No camera")).then(
        MockOutcome::Stream {
            video_tracks: 1,
            settings: TrackSettings::HD,
        },
    );

    let stream = host
        .request_stream(&StreamConstraints::default())
        .await
        .unwrap();
    assert_eq!(stream.video_settings(), Some(TrackSettings::HD));

    let err = host
        .request_stream(&StreamConstraints::default())
        .await
        .unwrap_err();
    assert_eq!(err.reason(), Some("No camera"));
}

#[test]
fn test_gated_request_stays_pending_until_released() {
    let gate = Arc::new(Notify::new());
    let host = MockMediaHost::with_stream(1).with_gate(gate.clone());
    let constraints = StreamConstraints::camera_only();

    let mut request = tokio_test::task::spawn(host.request_stream(&constraints));
    assert_pending!(request.poll());
    assert_pending!(request.poll());
    assert_eq!(host.request_count(), 1);
    assert!(host.stop_counts().is_empty());

    gate.notify_one();
    assert!(request.is_woken());
    let stream = assert_ready!(request.poll()).unwrap();

    assert_eq!(stream.track_count(), 1);
    assert_eq!(host.stop_counts(), vec![0]);
}

#[test]
fn test_constraints_serialize_like_host_request() {
    let json = serde_json::to_string(&StreamConstraints::camera_only()).unwrap();
    assert_eq!(json, r#"{"video":true,"audio":false}"#);
}

// ============================================================================
// RELEASE TESTS
// ============================================================================

#[tokio::test]
async fn test_release_stops_each_track_once() {
    let host = MockMediaHost::with_stream(3);
    let stream = host
        .request_stream(&StreamConstraints::default())
        .await
        .unwrap();

    let report = stream.release();

    assert_eq!(report.stopped, 3);
    assert!(report.is_clean());
    assert_eq!(host.stop_counts(), vec![1, 1, 1]);
}

#[tokio::test]
async fn test_release_failures_are_reported_not_fatal() {
    let host = MockMediaHost::with_stream(2).with_failing_stops();
    let stream = host
        .request_stream(&StreamConstraints::default())
        .await
        .unwrap();

    let report = stream.release();

    assert_eq!(report.stopped, 0);
    assert_eq!(report.failures.len(), 2);
    assert!(report
        .failures
        .iter()
        .all(|e| e.category() == ErrorCategory::Release));
    assert_eq!(host.total_stops(), 2);
}

#[test]
fn test_mixed_stream_release() {
    let (video_source, video_stops) = MockTrackSource::counted();
    let (audio_source, audio_stops) = MockTrackSource::counted();
    let stream = StreamHandle::new(vec![
        Track::video(Box::new(video_source), TrackSettings::VGA),
        Track::audio(Box::new(audio_source)),
    ]);

    assert_eq!(stream.tracks()[1].kind(), TrackKind::Audio);
    assert!(stream.tracks()[1].settings().is_none());

    drop(stream);

    assert_eq!(video_stops.load(Ordering::SeqCst), 1);
    assert_eq!(audio_stops.load(Ordering::SeqCst), 1);
}
