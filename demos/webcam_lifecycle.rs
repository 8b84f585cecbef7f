//! Webcam Lifecycle Demo
//!
//! Walks a capture controller through its lifecycle against the mock host:
//! a successful bind, a permission failure, and a teardown that lands while
//! the host is still answering.

use camfeed::{
    CaptureController, CaptureEvent, MediaError, MockMediaHost, SurfaceSink, WEBCAM_ERROR_EVENT,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    camfeed::init_logging("camfeed=debug,camfeed_media=debug")?;

    println!("📷 camfeed Lifecycle Demo");
    println!("=========================");

    demo_bind_and_release().await?;
    demo_permission_denied().await?;
    demo_teardown_while_requesting().await?;

    println!("\n✨ Lifecycle demo completed!");
    Ok(())
}

async fn demo_bind_and_release() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n🎥 Demo 1: Bind and release");
    println!("---------------------------");

    let host = Arc::new(MockMediaHost::with_stream(1));
    let sink = Arc::new(SurfaceSink::new());
    let controller = CaptureController::new(host.clone(), sink.clone());

    let state = controller.activate().await?;
    println!("  State after activate: {}", state);
    if let Some(info) = controller.stream_info() {
        println!("  Stream {} with {} track(s)", info.stream_id, info.track_ids.len());
    }
    let (width, height) = sink.canvas_size();
    println!("  Drawing surface: {}x{}", width, height);

    controller.teardown();
    println!("  Track stops after teardown: {:?}", host.stop_counts());

    Ok(())
}

async fn demo_permission_denied() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n🚫 Demo 2: Permission denied");
    println!("----------------------------");

    let host = Arc::new(MockMediaHost::rejecting(MediaError::denied("Permission denied")));
    let controller = CaptureController::new(host, Arc::new(SurfaceSink::new()));
    let mut events = controller.subscribe_events();

    let state = controller.activate().await?;
    println!("  State after activate: {}", state);

    while let Ok(event) = events.try_recv() {
        if let CaptureEvent::WebcamError { message } = &event {
            println!("  {} -> {}", WEBCAM_ERROR_EVENT, message);
        }
    }

    Ok(())
}

async fn demo_teardown_while_requesting() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n⏱️  Demo 3: Teardown while requesting");
    println!("------------------------------------");

    let gate = Arc::new(Notify::new());
    let host = Arc::new(MockMediaHost::with_stream(1).with_gate(gate.clone()));
    let controller = Arc::new(CaptureController::new(
        host.clone(),
        Arc::new(SurfaceSink::new()),
    ));

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.activate().await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.teardown();
    println!("  Torn down while host was still answering");

    gate.notify_one();
    match pending.await? {
        Ok(state) => println!("  Activation finished in {}", state),
        Err(e) => println!("  Activation finished: {}", e),
    }
    println!("  Late stream stops: {:?}", host.stop_counts());

    Ok(())
}
