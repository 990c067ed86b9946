//! End-to-end door pipeline: scripted contact → monitor → channel →
//! controller → delayed notifier.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use futures_lite::future;

use smarthome::app::events::AppEvent;
use smarthome::cancel::CancelToken;
use smarthome::door::{ContactMonitor, DelayedNotifier, DoorController};
use smarthome::error::AdapterError;
use smarthome::events::{DoorEdge, DoorEventChannel, DoorState};

use crate::mock_hw::{Recorder, RecordingSink, ScriptedContact};

const POLL: Duration = Duration::from_millis(5);

struct DoorRun {
    events: Vec<AppEvent>,
    sink: Arc<RecordingSink>,
    controller: DoorController,
}

/// Run the door pipeline for `run_for`, then cancel and shut down.
fn run_door(script: Vec<Result<DoorState, AdapterError>>, warn_after: Duration, run_for: Duration) -> DoorRun {
    let sink = Arc::new(RecordingSink::default());
    let template = DelayedNotifier::new(warn_after, "Rear Door Warning", "Door left open for too long");
    let mut controller = DoorController::new(template, sink.clone());
    let mut monitor = ContactMonitor::new(ScriptedContact::new(script), POLL);
    let mut recorder = Recorder::default();

    let cancel = Arc::new(CancelToken::new());
    let stopper = {
        let cancel = Arc::clone(&cancel);
        thread::spawn(move || {
            thread::sleep(run_for);
            cancel.cancel();
        })
    };

    let channel = DoorEventChannel::new();
    future::block_on(future::or(
        monitor.run(channel.sender(), &cancel),
        controller.run(channel.receiver(), &mut recorder),
    ));
    controller.shutdown();
    stopper.join().unwrap();

    DoorRun {
        events: recorder.events,
        sink,
        controller,
    }
}

#[test]
fn quick_open_and_close_sends_nothing() {
    use DoorState::{Closed, Open};
    let run = run_door(
        vec![Ok(Closed), Ok(Closed), Ok(Open), Ok(Open), Ok(Closed)],
        Duration::from_secs(5),
        Duration::from_millis(150),
    );

    assert_eq!(
        run.events,
        vec![
            AppEvent::Door(DoorEdge::Opened),
            AppEvent::NotifierArmed {
                after: Duration::from_secs(5)
            },
            AppEvent::Door(DoorEdge::Closed),
            AppEvent::NotifierDisarmed,
        ]
    );
    assert_eq!(run.sink.count(), 0);
    assert!(!run.controller.is_armed());
}

#[test]
fn door_left_open_alerts_exactly_once() {
    use DoorState::{Closed, Open};
    let run = run_door(
        vec![Ok(Closed), Ok(Open)],
        Duration::from_millis(30),
        Duration::from_millis(250),
    );

    assert_eq!(run.sink.count(), 1);
    assert_eq!(
        run.sink.sent.lock().unwrap()[0],
        ("Rear Door Warning".to_owned(), "Door left open for too long".to_owned())
    );
    let armed = run
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::NotifierArmed { .. }))
        .count();
    assert_eq!(armed, 1, "holding the door open must not re-arm");
}

#[test]
fn failed_polls_produce_no_edges() {
    use DoorState::{Closed, Open};
    let run = run_door(
        vec![
            Ok(Closed),
            Err(AdapterError::Command("gateway timeout".into())),
            Ok(Closed),
            Err(AdapterError::Output("garbled".into())),
            Ok(Open),
            Ok(Closed),
        ],
        Duration::from_secs(5),
        Duration::from_millis(150),
    );

    let edges: Vec<_> = run
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Door(edge) => Some(*edge),
            _ => None,
        })
        .collect();
    assert_eq!(edges, vec![DoorEdge::Opened, DoorEdge::Closed]);
    assert_eq!(run.sink.count(), 0);
}

#[test]
fn door_open_at_startup_is_only_a_baseline() {
    let run = run_door(
        vec![Ok(DoorState::Open)],
        Duration::from_millis(20),
        Duration::from_millis(120),
    );
    assert!(run.events.is_empty(), "got {:?}", run.events);
    assert_eq!(run.sink.count(), 0);
}

#[test]
fn shutdown_cancels_outstanding_alert() {
    use DoorState::{Closed, Open};
    let run = run_door(
        vec![Ok(Closed), Ok(Open)],
        Duration::from_millis(300),
        Duration::from_millis(60),
    );
    assert!(!run.controller.is_armed());
    thread::sleep(Duration::from_millis(400));
    assert_eq!(run.sink.count(), 0);
}

#[test]
fn closing_after_the_alert_fired_disarms_nothing() {
    use DoorState::{Closed, Open};
    let mut script = vec![Ok(Closed)];
    script.extend(std::iter::repeat_with(|| Ok(Open)).take(16));
    script.push(Ok(Closed));
    let run = run_door(script, Duration::from_millis(20), Duration::from_millis(250));

    assert_eq!(run.sink.count(), 1);
    assert_eq!(
        run.events,
        vec![
            AppEvent::Door(DoorEdge::Opened),
            AppEvent::NotifierArmed {
                after: Duration::from_millis(20)
            },
            AppEvent::Door(DoorEdge::Closed),
        ]
    );
    assert!(!run.controller.is_armed());
}
