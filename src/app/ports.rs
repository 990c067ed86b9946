//! Port traits: the boundary between the controller core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ role service / door controller
//! ```
//!
//! Driven adapters (contact sensors, LED, smart plug, HTTP services, event
//! sinks) implement these traits.  The core consumes them via generics or
//! trait objects and never touches a device node, CLI, or socket itself.

use chrono::{DateTime, Local, NaiveDate};

use crate::app::events::AppEvent;
use crate::app::logger_service::SensorRow;
use crate::colour::Colour;
use crate::error::AdapterError;
use crate::events::DoorState;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapter: hardware → core)
// ───────────────────────────────────────────────────────────────

/// Binary door contact.  May be slow or fail spuriously.
pub trait ContactSensor {
    fn read_contact(&mut self) -> Result<DoorState, AdapterError>;
}

impl<S: ContactSensor + ?Sized> ContactSensor for Box<S> {
    fn read_contact(&mut self) -> Result<DoorState, AdapterError> {
        (**self).read_contact()
    }
}

/// Air-quality index source.
pub trait AqiSource {
    fn fetch_aqi(&mut self) -> Result<f64, AdapterError>;
}

/// Astronomical sunrise/sunset for the configured location.
pub trait DaylightSource {
    /// `(sunrise, sunset)` on `date`, in local time.
    fn sun_times(&self, date: NaiveDate) -> Result<(DateTime<Local>, DateTime<Local>), AdapterError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapter: core → hardware)
// ───────────────────────────────────────────────────────────────

/// RGB status LED.  Fire-and-forget: failures are the adapter's to log.
pub trait LedPort {
    fn set_colour(&mut self, colour: Colour);
}

/// Switchable light (smart plug).
pub trait LightSwitch {
    fn is_on(&mut self) -> Result<bool, AdapterError>;

    fn set_power(&mut self, on: bool) -> Result<(), AdapterError>;
}

// ───────────────────────────────────────────────────────────────
// Outbound ports (core → people / storage / logs)
// ───────────────────────────────────────────────────────────────

/// Push notification delivery.  Called from the notifier thread, hence
/// `Send + Sync`.  Not retried by the caller.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, message: &str) -> Result<(), AdapterError>;
}

/// Row persistence (spreadsheet, webhook, log).  Implementations own any
/// retry policy.
pub trait RowSink {
    fn append(&mut self, row: &SensorRow) -> Result<(), AdapterError>;
}

impl<R: RowSink + ?Sized> RowSink for Box<R> {
    fn append(&mut self, row: &SensorRow) -> Result<(), AdapterError> {
        (**self).append(row)
    }
}

/// The core emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
