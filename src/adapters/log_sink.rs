//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! structured log line.  A webhook or MQTT adapter would implement the
//! same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(role) => {
                info!("START | role={role}");
            }
            AppEvent::TemperatureChanged { celsius, colour } => {
                info!(
                    "TEMP  | T={:.1}\u{00b0}C | rgb=({},{},{})",
                    celsius, colour.r, colour.g, colour.b
                );
            }
            AppEvent::AqiUpdated { aqi, colour } => {
                info!(
                    "AQI   | aqi={:.0} | rgb=({},{},{})",
                    aqi, colour.r, colour.g, colour.b
                );
            }
            AppEvent::LightSwitched { on, lux } => match lux {
                Some(lux) => info!("LIGHT | {} | lux={:.1}", if *on { "ON" } else { "OFF" }, lux),
                None => info!("LIGHT | {} | after midnight", if *on { "ON" } else { "OFF" }),
            },
            AppEvent::SunTimesUpdated { sunrise, sunset } => {
                info!(
                    "SUN   | rise={} | set={}",
                    sunrise.format("%H:%M"),
                    sunset.format("%H:%M")
                );
            }
            AppEvent::Door(edge) => {
                info!("DOOR  | {edge}");
            }
            AppEvent::NotifierArmed { after } => {
                info!("DOOR  | alert armed, fires in {}s", after.as_secs());
            }
            AppEvent::NotifierDisarmed => {
                info!("DOOR  | alert disarmed");
            }
            AppEvent::Row(row) => {
                info!(
                    "ROW   | {} | T={:.1}\u{00b0}C H={:.1}% | bb={} ir={} lux={:.1}",
                    row.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    row.temperature_c,
                    row.humidity_pct,
                    row.broadband,
                    row.ir,
                    row.lux,
                );
            }
            AppEvent::ReadFailed { sensor, reason } => {
                warn!("READ  | {sensor} failed: {reason}");
            }
        }
    }
}
