//! Dispatch service tests

mod common;

use cadence_playback::{
    NullOutput, OutputEvent, PlaybackCoordinator, PlaybackEvent, PlaybackService, PlaybackState,
    RepeatMode,
};
use common::{init_tracing, seeded_config, track, tracks};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

fn spawn() -> (
    cadence_playback::PlaybackHandle,
    UnboundedReceiver<PlaybackEvent>,
    tokio::task::JoinHandle<()>,
) {
    init_tracing();
    PlaybackService::spawn(PlaybackCoordinator::new(NullOutput::new(), &seeded_config(8)))
}

fn collect(events: &mut UnboundedReceiver<PlaybackEvent>) -> Vec<PlaybackEvent> {
    let mut collected = Vec::new();
    while let Ok(event) = events.try_recv() {
        collected.push(event);
    }
    collected
}

#[tokio::test]
async fn commands_run_in_order() {
    let (handle, mut events, _task) = spawn();

    handle.play_list(tracks(&["a", "b", "c"]), 0).unwrap();
    handle.resume().unwrap();
    handle.next().unwrap();
    handle.set_repeat(RepeatMode::All).unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.current.unwrap().id.as_str(), "b");
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert_eq!(snapshot.repeat, RepeatMode::All);
    assert_eq!(snapshot.history_len, 1);

    let received = collect(&mut events);
    let unmount_a = received
        .iter()
        .position(|e| *e == PlaybackEvent::TrackUnmounted { track_id: "a".into() })
        .unwrap();
    let mount_b = received
        .iter()
        .position(|e| *e == PlaybackEvent::TrackMounted { track_id: "b".into() })
        .unwrap();
    assert!(unmount_a < mount_b);
}

#[tokio::test]
async fn output_callbacks_share_the_command_queue() {
    let (handle, _events, _task) = spawn();

    handle.play_list(tracks(&["a", "b"]), 0).unwrap();
    handle.resume().unwrap();
    handle.output_event(OutputEvent::PlaybackCompleted).unwrap();
    handle.output_event(OutputEvent::PlaybackCompleted).unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.current.unwrap().id.as_str(), "b");
    assert_eq!(snapshot.state, PlaybackState::Stopped);
}

#[tokio::test]
async fn failures_become_error_events() {
    let (handle, mut events, _task) = spawn();

    handle.seek(Duration::from_secs(10)).unwrap();
    handle.snapshot().await.unwrap();

    let received = collect(&mut events);
    assert!(matches!(
        received.as_slice(),
        [PlaybackEvent::Error { message }] if message.contains("No track loaded")
    ));
}

#[tokio::test]
async fn enqueue_through_handle() {
    let (handle, _events, _task) = spawn();

    handle.enqueue(track("x")).unwrap();
    handle.enqueue(track("y")).unwrap();
    handle.next().unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.current.unwrap().id.as_str(), "y");
}

#[tokio::test]
async fn dropping_handles_stops_the_task() {
    let (handle, _events, task) = spawn();
    let second = handle.clone();
    drop(handle);

    second.stop().unwrap();
    drop(second);

    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("service did not stop")
        .unwrap();
}
