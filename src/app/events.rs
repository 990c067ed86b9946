//! Outbound application events.
//!
//! Role services and the door controller emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (log line, webhook, test recorder).

use core::time::Duration;

use chrono::{DateTime, Local};

use crate::app::logger_service::SensorRow;
use crate::colour::Colour;
use crate::events::DoorEdge;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A role loop has started.
    Started(&'static str),

    /// A fresh temperature produced a new LED colour.
    TemperatureChanged { celsius: f32, colour: Colour },

    /// The air-quality colour was refreshed.
    AqiUpdated { aqi: f64, colour: Colour },

    /// The light was commanded on or off.
    LightSwitched { on: bool, lux: Option<f32> },

    /// The daylight window was recomputed.
    SunTimesUpdated {
        sunrise: DateTime<Local>,
        sunset: DateTime<Local>,
    },

    /// A confirmed door transition.
    Door(DoorEdge),

    /// A delayed alert was armed.
    NotifierArmed { after: Duration },

    /// The outstanding alert was cancelled before it fired.
    NotifierDisarmed,

    /// A sensor row was produced for persistence.
    Row(SensorRow),

    /// An acquisition failed; the previous value stays in effect.
    ReadFailed { sensor: &'static str, reason: String },
}
