//! LED role: temperature colour, air-quality flashes and stale-value hold.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use futures_lite::future;

use smarthome::app::events::AppEvent;
use smarthome::app::led_service::{AqiRefresher, SharedColour, TemperatureLed};
use smarthome::cancel::CancelToken;
use smarthome::colour::{ColourRamp, GREEN, OFF, PURPLE, RED, ThresholdRamp, YELLOW};
use smarthome::drivers::led_patterns::AlternatingSequence;
use smarthome::error::{AdapterError, DriverError};
use smarthome::scheduler::Every;
use smarthome::sensors::climate::ClimateReading;

use crate::mock_hw::{FakeAqi, Recorder, ScriptedDriver, TraceLed, scripted_reader};

fn celsius(t: f32) -> Result<ClimateReading, DriverError> {
    Ok(ClimateReading {
        temperature_c: t,
        humidity_pct: 50.0,
    })
}

fn led(
    dir: &tempfile::TempDir,
    script: Vec<Result<ClimateReading, DriverError>>,
    aqi: SharedColour,
) -> TemperatureLed<ScriptedDriver<ClimateReading>, TraceLed> {
    TemperatureLed::new(
        scripted_reader(dir.path(), "i2c-1", script),
        TraceLed::default(),
        ColourRamp::temperature().unwrap(),
        AlternatingSequence::new(2, Duration::from_millis(1)),
        Every::new(Duration::from_millis(1)),
        aqi,
    )
}

#[test]
fn failed_read_keeps_previous_colour() {
    let dir = tempfile::tempdir().unwrap();
    let mut led = led(&dir, vec![celsius(8.0), Err(DriverError::Timeout)], Rc::new(Cell::new(OFF)));
    let mut events = Recorder::default();

    assert!(future::block_on(led.update(&mut events)));
    assert_eq!(led.colour(), PURPLE);

    assert!(!future::block_on(led.update(&mut events)));
    assert_eq!(led.colour(), PURPLE);
    assert_eq!(led.temperature(), Some(8.0));
    assert!(matches!(events.events.last(), Some(AppEvent::ReadFailed { sensor: "climate", .. })));
}

#[test]
fn unchanged_temperature_is_not_recomputed() {
    let dir = tempfile::tempdir().unwrap();
    let mut led = led(&dir, vec![celsius(21.0), celsius(21.0)], Rc::new(Cell::new(OFF)));
    let mut events = Recorder::default();

    assert!(future::block_on(led.update(&mut events)));
    assert!(!future::block_on(led.update(&mut events)));
    let changes = events
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::TemperatureChanged { .. }))
        .count();
    assert_eq!(changes, 1);
}

#[test]
fn show_alternates_aqi_and_temperature_then_holds() {
    let dir = tempfile::tempdir().unwrap();
    let aqi: SharedColour = Rc::new(Cell::new(OFF));
    let mut refresher = AqiRefresher::new(
        FakeAqi::new(vec![Ok(75.0)]),
        ThresholdRamp::air_quality().unwrap(),
        Every::new(Duration::from_secs(3600)),
        Rc::clone(&aqi),
    );
    let mut led = led(&dir, vec![celsius(32.0)], aqi);
    let mut events = Recorder::default();

    assert_eq!(refresher.refresh(&mut events), Some(YELLOW));
    future::block_on(led.update(&mut events));
    assert!(future::block_on(led.show(&CancelToken::new())));

    assert_eq!(led.led().trace, vec![YELLOW, RED, YELLOW, RED, RED]);
}

#[test]
fn failed_aqi_fetch_keeps_previous_colour() {
    let aqi: SharedColour = Rc::new(Cell::new(OFF));
    let mut refresher = AqiRefresher::new(
        FakeAqi::new(vec![Ok(12.0), Err(AdapterError::Status(502))]),
        ThresholdRamp::air_quality().unwrap(),
        Every::new(Duration::from_secs(3600)),
        Rc::clone(&aqi),
    );
    let mut events = Recorder::default();

    assert_eq!(refresher.refresh(&mut events), Some(GREEN));
    assert_eq!(refresher.refresh(&mut events), None);
    assert_eq!(aqi.get(), GREEN);
}

#[test]
fn cancelled_run_leaves_temperature_colour_on() {
    let dir = tempfile::tempdir().unwrap();
    let mut led = led(&dir, vec![celsius(32.0)], Rc::new(Cell::new(GREEN)));
    let cancel = CancelToken::new();
    cancel.cancel();

    future::block_on(led.run(&mut Recorder::default(), &cancel));
    assert_eq!(led.led().trace.last(), Some(&RED));
}

#[test]
fn flash_sequence_overlaps_the_update_interval() {
    let dir = tempfile::tempdir().unwrap();
    // 100 ms of flashing against a 100 ms interval: one read per ~100 ms,
    // not one per ~200 ms.
    let mut led = TemperatureLed::new(
        scripted_reader(
            dir.path(),
            "i2c-1",
            vec![celsius(10.0), celsius(14.0), celsius(18.0), celsius(22.0)],
        ),
        TraceLed::default(),
        ColourRamp::temperature().unwrap(),
        AlternatingSequence::new(2, Duration::from_millis(25)),
        Every::new(Duration::from_millis(100)),
        Rc::new(Cell::new(GREEN)),
    );
    let cancel = Arc::new(CancelToken::new());
    let stopper = {
        let cancel = Arc::clone(&cancel);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(350));
            cancel.cancel();
        })
    };

    let mut events = Recorder::default();
    future::block_on(led.run(&mut events, &cancel));
    stopper.join().unwrap();

    let reads = events
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::TemperatureChanged { .. } | AppEvent::ReadFailed { .. }))
        .count();
    assert!(reads >= 3, "only {reads} reads in 350 ms");
}
