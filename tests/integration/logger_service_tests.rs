//! Sensor logger: one row per sample, whole sample skipped on a failed read.

use std::time::Duration;

use futures_lite::future;

use smarthome::app::events::AppEvent;
use smarthome::app::logger_service::LoggerService;
use smarthome::error::DriverError;
use smarthome::scheduler::Every;
use smarthome::sensors::climate::ClimateReading;
use smarthome::sensors::light::LightReading;

use crate::mock_hw::{MemoryRows, Recorder, scripted_reader};

const CLIMATE: ClimateReading = ClimateReading {
    temperature_c: 19.5,
    humidity_pct: 61.0,
};

const LIGHT: LightReading = LightReading {
    broadband: 812,
    ir: 190,
    lux: 47.0,
};

#[test]
fn sample_combines_both_sensors() {
    let dir = tempfile::tempdir().unwrap();
    let mut logger = LoggerService::new(
        scripted_reader(dir.path(), "i2c-1", vec![Ok(CLIMATE)]),
        scripted_reader(dir.path(), "i2c-2", vec![Ok(LIGHT)]),
        MemoryRows::default(),
        Every::new(Duration::from_secs(600)),
    );
    let mut events = Recorder::default();

    let row = future::block_on(logger.sample(&mut events)).expect("row");
    assert_eq!(row.temperature_c, 19.5);
    assert_eq!(row.humidity_pct, 61.0);
    assert_eq!((row.broadband, row.ir, row.lux), (812, 190, 47.0));
    assert_eq!(logger.rows().rows, vec![row]);
    assert_eq!(events.events, vec![AppEvent::Row(row)]);
}

#[test]
fn failed_light_read_skips_the_row() {
    let dir = tempfile::tempdir().unwrap();
    let mut logger = LoggerService::new(
        scripted_reader(dir.path(), "i2c-1", vec![Ok(CLIMATE)]),
        scripted_reader::<LightReading>(dir.path(), "i2c-2", vec![Err(DriverError::Timeout)]),
        MemoryRows::default(),
        Every::new(Duration::from_secs(600)),
    );
    let mut events = Recorder::default();

    assert!(future::block_on(logger.sample(&mut events)).is_none());
    assert!(logger.rows().rows.is_empty());
    assert!(matches!(events.events[..], [AppEvent::ReadFailed { sensor: "light", .. }]));
}

#[test]
fn rejected_row_is_dropped_not_resent() {
    let dir = tempfile::tempdir().unwrap();
    let rows = MemoryRows {
        fail: true,
        ..MemoryRows::default()
    };
    let mut logger = LoggerService::new(
        scripted_reader(dir.path(), "i2c-1", vec![Ok(CLIMATE), Ok(CLIMATE)]),
        scripted_reader(dir.path(), "i2c-2", vec![Ok(LIGHT), Ok(LIGHT)]),
        rows,
        Every::new(Duration::from_secs(600)),
    );
    let mut events = Recorder::default();

    assert!(future::block_on(logger.sample(&mut events)).is_some());
    assert!(future::block_on(logger.sample(&mut events)).is_some());
    assert!(logger.rows().rows.is_empty());
}
