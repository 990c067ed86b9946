//! Light role decisions against a fixed 06:00–18:00 day.

use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use futures_lite::future;

use smarthome::app::events::AppEvent;
use smarthome::app::light_service::{LightBand, LightService, LightStep};
use smarthome::error::DriverError;
use smarthome::scheduler::Every;
use smarthome::sensors::light::LightReading;

use crate::mock_hw::{FakeDaylight, FakeSwitch, Recorder, ScriptedDriver, scripted_reader};

type Service = LightService<ScriptedDriver<LightReading>, FakeSwitch, FakeDaylight>;

fn at(day: u32, hour: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
}

fn lux(lux: f32) -> Result<LightReading, DriverError> {
    Ok(LightReading {
        broadband: 100,
        ir: 20,
        lux,
    })
}

fn service(dir: &tempfile::TempDir, switch: FakeSwitch, script: Vec<Result<LightReading, DriverError>>) -> Service {
    LightService::new(
        scripted_reader(dir.path(), "i2c-1", script),
        switch,
        FakeDaylight::six_to_six(),
        LightBand::new(15.0, 120.0).unwrap(),
        Every::new(Duration::from_millis(1)),
    )
}

#[test]
fn daytime_skips_the_sensor() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(&dir, FakeSwitch::default(), vec![lux(1.0)]);
    let mut events = Recorder::default();

    assert_eq!(future::block_on(svc.tick(at(15, 12), &mut events)), LightStep::Daytime);
    assert!(svc.switch().commands.is_empty());
    assert!(matches!(events.events[0], AppEvent::SunTimesUpdated { .. }));
}

#[test]
fn evening_follows_hysteresis_band() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(
        &dir,
        FakeSwitch::default(),
        vec![lux(5.0), lux(3.0), lux(60.0), lux(200.0), lux(80.0)],
    );
    let mut events = Recorder::default();
    let mut tick = |hour| future::block_on(svc.tick(at(15, hour), &mut events));

    assert_eq!(tick(19), LightStep::Switched { on: true, lux: 5.0 });
    assert_eq!(tick(19), LightStep::Unchanged { lux: 3.0 });
    assert_eq!(tick(20), LightStep::Unchanged { lux: 60.0 });
    assert_eq!(tick(21), LightStep::Switched { on: false, lux: 200.0 });
    assert_eq!(tick(22), LightStep::Unchanged { lux: 80.0 });

    assert_eq!(svc.switch().commands, vec![true, false]);
    assert!(!svc.light_on());
}

#[test]
fn plug_already_on_is_not_recommanded() {
    let dir = tempfile::tempdir().unwrap();
    let switch = FakeSwitch {
        on: true,
        ..FakeSwitch::default()
    };
    let mut svc = service(&dir, switch, vec![lux(2.0)]);
    let mut events = Recorder::default();

    assert_eq!(
        future::block_on(svc.tick(at(15, 20), &mut events)),
        LightStep::Unchanged { lux: 2.0 }
    );
    assert!(svc.switch().commands.is_empty());
}

#[test]
fn after_midnight_forces_off_and_recomputes_window() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(&dir, FakeSwitch::default(), vec![lux(4.0)]);
    let mut events = Recorder::default();

    future::block_on(svc.tick(at(15, 21), &mut events));
    assert!(svc.light_on());

    assert_eq!(future::block_on(svc.tick(at(16, 1), &mut events)), LightStep::AfterMidnight);
    assert!(!svc.light_on());
    assert_eq!(svc.switch().commands, vec![true, false]);
    assert_eq!(svc.window().unwrap().sunrise, at(16, 6));

    assert_eq!(future::block_on(svc.tick(at(16, 2), &mut events)), LightStep::BeforeSunrise);
}

#[test]
fn failed_read_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut svc = service(&dir, FakeSwitch::default(), vec![Err(DriverError::Timeout)]);
    let mut events = Recorder::default();

    assert_eq!(future::block_on(svc.tick(at(15, 20), &mut events)), LightStep::ReadFailed);
    assert!(svc.switch().commands.is_empty());
    assert!(events.events.iter().any(|e| matches!(e, AppEvent::ReadFailed { sensor: "light", .. })));
}

#[test]
fn switch_failure_is_retried_next_tick() {
    let dir = tempfile::tempdir().unwrap();
    let switch = FakeSwitch {
        fail: true,
        ..FakeSwitch::default()
    };
    let mut svc = service(&dir, switch, vec![lux(4.0), lux(4.0)]);
    let mut events = Recorder::default();

    assert_eq!(future::block_on(svc.tick(at(15, 20), &mut events)), LightStep::Unchanged { lux: 4.0 });
    assert_eq!(future::block_on(svc.tick(at(15, 20), &mut events)), LightStep::Unchanged { lux: 4.0 });
    assert_eq!(svc.switch().commands, vec![true, true]);
    assert!(!svc.light_on());
}
