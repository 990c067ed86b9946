//! Light role: switch a lamp on at dusk when the room gets dark.
//!
//! Each check walks this decision list, first match wins:
//!
//! | Condition                    | Action                                   |
//! |------------------------------|------------------------------------------|
//! | sunrise < now < sunset       | nothing (daytime)                        |
//! | now past stored midnight     | switch off, recompute the daylight window|
//! | now before sunrise           | nothing (wait for the next evening)      |
//! | lux <= `on_at_or_below_lux`  | switch on                                |
//! | lux >  `off_above_lux`       | switch off                               |
//! | otherwise                    | nothing (inside the hysteresis band)     |
//!
//! The plug is only commanded on an actual change of state.

use chrono::{DateTime, Days, Local};
use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{DaylightSource, EventSink, LightSwitch};
use crate::cancel::CancelToken;
use crate::error::AdapterError;
use crate::scheduler::Every;
use crate::sensors::light::LightReading;
use crate::sensors::{BusDriver, SensorReader};

// ── Hysteresis band ───────────────────────────────────────────

/// Distinct on/off illuminance thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightBand {
    on_at_or_below_lux: f32,
    off_above_lux: f32,
}

impl LightBand {
    /// `None` unless `on_at_or_below_lux < off_above_lux`.
    pub fn new(on_at_or_below_lux: f32, off_above_lux: f32) -> Option<Self> {
        (on_at_or_below_lux < off_above_lux).then_some(Self {
            on_at_or_below_lux,
            off_above_lux,
        })
    }

    /// Desired light state for `lux`, `None` inside the band.
    pub fn decide(&self, lux: f32) -> Option<bool> {
        if lux <= self.on_at_or_below_lux {
            Some(true)
        } else if lux > self.off_above_lux {
            Some(false)
        } else {
            None
        }
    }
}

// ── Daylight window ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaylightWindow {
    pub sunrise: DateTime<Local>,
    pub sunset: DateTime<Local>,
    /// The midnight following the computation.
    pub midnight: DateTime<Local>,
}

impl DaylightWindow {
    pub fn compute<S: DaylightSource>(source: &S, now: DateTime<Local>) -> Result<Self, AdapterError> {
        let today = now.date_naive();
        let (sunrise, sunset) = source.sun_times(today)?;
        let midnight = today
            .checked_add_days(Days::new(1))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|t| t.and_local_timezone(Local).earliest())
            .ok_or_else(|| AdapterError::Output(format!("no local midnight after {today}")))?;
        Ok(Self {
            sunrise,
            sunset,
            midnight,
        })
    }

    pub fn is_bright(&self, now: DateTime<Local>) -> bool {
        self.sunrise < now && now < self.sunset
    }
}

// ── Service ───────────────────────────────────────────────────

/// What one check did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightStep {
    /// No daylight window could be computed yet.
    NoWindow,
    Daytime,
    /// Past midnight: light forced off and the window recomputed.
    AfterMidnight,
    BeforeSunrise,
    /// The light sensor read failed; nothing changed.
    ReadFailed,
    /// The band asked for a new state and the plug was switched.
    Switched { on: bool, lux: f32 },
    /// Already in the desired state, inside the band, or switching failed.
    Unchanged { lux: f32 },
}

pub struct LightService<D, W, S> {
    sensor: SensorReader<D>,
    switch: W,
    daylight: S,
    band: LightBand,
    every: Every,
    window: Option<DaylightWindow>,
    light_on: bool,
}

impl<D, W, S> LightService<D, W, S>
where
    D: BusDriver<Output = LightReading>,
    W: LightSwitch,
    S: DaylightSource,
{
    pub fn new(sensor: SensorReader<D>, switch: W, daylight: S, band: LightBand, every: Every) -> Self {
        Self {
            sensor,
            switch,
            daylight,
            band,
            every,
            window: None,
            light_on: false,
        }
    }

    pub fn window(&self) -> Option<DaylightWindow> {
        self.window
    }

    pub fn light_on(&self) -> bool {
        self.light_on
    }

    pub fn switch(&self) -> &W {
        &self.switch
    }

    /// Recompute sun times for `now`'s date and resync with the plug.
    pub fn refresh_window<E: EventSink>(&mut self, now: DateTime<Local>, events: &mut E) {
        match DaylightWindow::compute(&self.daylight, now) {
            Ok(window) => {
                events.emit(&AppEvent::SunTimesUpdated {
                    sunrise: window.sunrise,
                    sunset: window.sunset,
                });
                info!("Light: next midnight {}", window.midnight.format("%a %b %e %H:%M:%S %Y"));
                self.window = Some(window);
            }
            Err(e) => warn!("Light: sun times unavailable: {e}"),
        }
        match self.switch.is_on() {
            Ok(on) => self.light_on = on,
            Err(e) => warn!("Light: cannot query plug: {e}"),
        }
    }

    pub async fn tick<E: EventSink>(&mut self, now: DateTime<Local>, events: &mut E) -> LightStep {
        if self.window.is_none() {
            self.refresh_window(now, events);
        }
        let Some(window) = self.window else {
            return LightStep::NoWindow;
        };

        if window.is_bright(now) {
            return LightStep::Daytime;
        }
        if now > window.midnight {
            self.set_light(false, None, events);
            self.refresh_window(now, events);
            return LightStep::AfterMidnight;
        }
        if now < window.sunrise {
            return LightStep::BeforeSunrise;
        }

        let lux = match self.sensor.read().await {
            Ok(reading) => reading.value.lux,
            Err(e) => {
                events.emit(&AppEvent::ReadFailed {
                    sensor: "light",
                    reason: e.to_string(),
                });
                return LightStep::ReadFailed;
            }
        };
        if let Some(on) = self.band.decide(lux) {
            if self.set_light(on, Some(lux), events) {
                return LightStep::Switched { on, lux };
            }
        }
        LightStep::Unchanged { lux }
    }

    /// Command the plug if its state differs.  Returns whether it was
    /// switched.
    fn set_light<E: EventSink>(&mut self, on: bool, lux: Option<f32>, events: &mut E) -> bool {
        if self.light_on == on {
            return false;
        }
        match self.switch.set_power(on) {
            Ok(()) => {
                self.light_on = on;
                events.emit(&AppEvent::LightSwitched { on, lux });
                true
            }
            Err(e) => {
                warn!("Light: switching {} failed: {e}", if on { "on" } else { "off" });
                false
            }
        }
    }

    pub async fn run<E: EventSink>(&mut self, events: &mut E, cancel: &CancelToken) {
        events.emit(&AppEvent::Started("light"));
        self.refresh_window(Local::now(), events);
        while self.every.tick(cancel).await {
            self.tick(Local::now(), events).await;
        }
        info!("Light: stopped");
    }
}
