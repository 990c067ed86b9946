//! Mock adapters for integration tests.
//!
//! Every mock is scripted up front and records what it was asked to do,
//! so tests can assert on the full call history.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime};

use smarthome::app::events::AppEvent;
use smarthome::app::logger_service::SensorRow;
use smarthome::app::ports::{
    AqiSource, ContactSensor, DaylightSource, EventSink, LedPort, LightSwitch, NotificationSink, RowSink,
};
use smarthome::colour::Colour;
use smarthome::error::{AdapterError, DriverError};
use smarthome::events::DoorState;
use smarthome::sensors::lock::BusLock;
use smarthome::sensors::{BusDriver, SensorReader};

// ── Door ──────────────────────────────────────────────────────

/// Replays a contact script, then keeps reporting the last good state.
pub struct ScriptedContact {
    script: VecDeque<Result<DoorState, AdapterError>>,
    last: Option<DoorState>,
}

impl ScriptedContact {
    pub fn new(script: Vec<Result<DoorState, AdapterError>>) -> Self {
        Self {
            script: script.into(),
            last: None,
        }
    }
}

impl ContactSensor for ScriptedContact {
    fn read_contact(&mut self) -> Result<DoorState, AdapterError> {
        match self.script.pop_front() {
            Some(Ok(state)) => {
                self.last = Some(state);
                Ok(state)
            }
            Some(Err(e)) => Err(e),
            None => self.last.ok_or(AdapterError::Output("script exhausted".into())),
        }
    }
}

/// Records every delivered notification.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, title: &str, message: &str) -> Result<(), AdapterError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((title.to_owned(), message.to_owned()));
        }
        Ok(())
    }
}

// ── Events ────────────────────────────────────────────────────

#[derive(Default)]
pub struct Recorder {
    pub events: Vec<AppEvent>,
}

impl EventSink for Recorder {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Sensors ───────────────────────────────────────────────────

/// Replays driver results; `Timeout` once the script runs out.
pub struct ScriptedDriver<T> {
    script: VecDeque<Result<T, DriverError>>,
    pub reads: usize,
}

impl<T> ScriptedDriver<T> {
    pub fn new(script: Vec<Result<T, DriverError>>) -> Self {
        Self {
            script: script.into(),
            reads: 0,
        }
    }
}

impl<T: Copy> BusDriver for ScriptedDriver<T> {
    type Output = T;

    fn read(&mut self) -> Result<T, DriverError> {
        self.reads += 1;
        self.script.pop_front().unwrap_or(Err(DriverError::Timeout))
    }
}

/// Single-attempt reader over a scripted driver, locking `dir/<bus>.lock`.
pub fn scripted_reader<T: Copy>(
    dir: &Path,
    bus: &str,
    script: Vec<Result<T, DriverError>>,
) -> SensorReader<ScriptedDriver<T>> {
    let lock = BusLock::for_bus(dir, bus).with_poll_interval(Duration::from_millis(1));
    SensorReader::new(lock, ScriptedDriver::new(script), 1, Duration::from_millis(1))
}

// ── Light ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeSwitch {
    pub on: bool,
    pub fail: bool,
    pub commands: Vec<bool>,
}

impl LightSwitch for FakeSwitch {
    fn is_on(&mut self) -> Result<bool, AdapterError> {
        Ok(self.on)
    }

    fn set_power(&mut self, on: bool) -> Result<(), AdapterError> {
        self.commands.push(on);
        if self.fail {
            return Err(AdapterError::Command("plug unreachable".into()));
        }
        self.on = on;
        Ok(())
    }
}

/// Same sunrise and sunset wall-clock time every day.
pub struct FakeDaylight {
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
}

impl FakeDaylight {
    pub fn six_to_six() -> Self {
        Self {
            sunrise: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            sunset: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        }
    }
}

impl DaylightSource for FakeDaylight {
    fn sun_times(&self, date: NaiveDate) -> Result<(DateTime<Local>, DateTime<Local>), AdapterError> {
        let at = |t: NaiveTime| {
            date.and_time(t)
                .and_local_timezone(Local)
                .single()
                .ok_or(AdapterError::Output("ambiguous local time".into()))
        };
        Ok((at(self.sunrise)?, at(self.sunset)?))
    }
}

// ── LED ───────────────────────────────────────────────────────

pub struct FakeAqi {
    script: VecDeque<Result<f64, AdapterError>>,
}

impl FakeAqi {
    pub fn new(script: Vec<Result<f64, AdapterError>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl AqiSource for FakeAqi {
    fn fetch_aqi(&mut self) -> Result<f64, AdapterError> {
        self.script
            .pop_front()
            .unwrap_or(Err(AdapterError::Http("no response scripted".into())))
    }
}

/// Records every colour written.
#[derive(Default)]
pub struct TraceLed {
    pub trace: Vec<Colour>,
}

impl LedPort for TraceLed {
    fn set_colour(&mut self, colour: Colour) {
        self.trace.push(colour);
    }
}

// ── Logger ────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryRows {
    pub rows: Vec<SensorRow>,
    pub fail: bool,
}

impl RowSink for MemoryRows {
    fn append(&mut self, row: &SensorRow) -> Result<(), AdapterError> {
        if self.fail {
            return Err(AdapterError::Status(503));
        }
        self.rows.push(*row);
        Ok(())
    }
}
