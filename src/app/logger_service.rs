//! Sensor logger role: periodic climate + light sample handed to a row sink.
//!
//! Each sample reads the climate sensor and then the light sensor, each
//! under its own bus lock.  A failed read skips the whole sample.  The
//! sink owns retries; this loop never re-sends a row.

use chrono::{DateTime, Local};
use log::{error, info};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, RowSink};
use crate::cancel::CancelToken;
use crate::scheduler::Every;
use crate::sensors::climate::ClimateReading;
use crate::sensors::light::LightReading;
use crate::sensors::{BusDriver, SensorReader};

/// One persisted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorRow {
    pub timestamp: DateTime<Local>,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub broadband: u32,
    pub ir: u32,
    pub lux: f32,
}

pub struct LoggerService<C, L, R> {
    climate: SensorReader<C>,
    light: SensorReader<L>,
    rows: R,
    every: Every,
}

impl<C, L, R> LoggerService<C, L, R>
where
    C: BusDriver<Output = ClimateReading>,
    L: BusDriver<Output = LightReading>,
    R: RowSink,
{
    pub fn new(climate: SensorReader<C>, light: SensorReader<L>, rows: R, every: Every) -> Self {
        Self {
            climate,
            light,
            rows,
            every,
        }
    }

    pub fn rows(&self) -> &R {
        &self.rows
    }

    /// Take one sample.  `None` when either read failed.
    pub async fn sample<E: EventSink>(&mut self, events: &mut E) -> Option<SensorRow> {
        let timestamp = Local::now();
        let climate = match self.climate.read().await {
            Ok(reading) => reading.value,
            Err(e) => {
                events.emit(&AppEvent::ReadFailed {
                    sensor: "climate",
                    reason: e.to_string(),
                });
                return None;
            }
        };
        let light = match self.light.read().await {
            Ok(reading) => reading.value,
            Err(e) => {
                events.emit(&AppEvent::ReadFailed {
                    sensor: "light",
                    reason: e.to_string(),
                });
                return None;
            }
        };

        let row = SensorRow {
            timestamp,
            temperature_c: climate.temperature_c,
            humidity_pct: climate.humidity_pct,
            broadband: light.broadband,
            ir: light.ir,
            lux: light.lux,
        };
        events.emit(&AppEvent::Row(row));
        if let Err(e) = self.rows.append(&row) {
            error!("Logger: row dropped: {e}");
        }
        Some(row)
    }

    pub async fn run<E: EventSink>(&mut self, events: &mut E, cancel: &CancelToken) {
        events.emit(&AppEvent::Started("logger"));
        while self.every.tick(cancel).await {
            self.sample(events).await;
        }
        info!("Logger: stopped");
    }
}
