//! LED role: temperature colour with periodic air-quality flashes.
//!
//! ```text
//!   AqiRefresher ──(every aqi_interval)──▶ Rc<Cell<Colour>> ──┐
//!                                                             ▼
//!   TemperatureLed ──(every update_interval)── read ──▶ ramp ──▶ sequence ──▶ LedPort
//! ```
//!
//! Both tasks live on one local executor and share only the AQI colour
//! cell.  A failed read or fetch keeps the previous colour.  The flash
//! sequence plays while the update interval runs, so reads start every
//! `max(update_interval, sequence)`.

use std::cell::Cell;
use std::rc::Rc;

use futures_lite::future;
use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{AqiSource, EventSink, LedPort};
use crate::cancel::CancelToken;
use crate::colour::{Colour, ColourRamp, OFF, ThresholdRamp};
use crate::drivers::led_patterns::AlternatingSequence;
use crate::scheduler::Every;
use crate::sensors::climate::ClimateReading;
use crate::sensors::{BusDriver, SensorReader};

/// AQI colour written by [`AqiRefresher`] and read by [`TemperatureLed`].
pub type SharedColour = Rc<Cell<Colour>>;

// ───────────────────────────────────────────────────────────────
// Temperature loop
// ───────────────────────────────────────────────────────────────

pub struct TemperatureLed<D, L> {
    sensor: SensorReader<D>,
    led: L,
    ramp: ColourRamp,
    sequence: AlternatingSequence,
    every: Every,
    aqi_colour: SharedColour,
    last_temp: Option<f32>,
    temp_colour: Colour,
}

impl<D, L> TemperatureLed<D, L>
where
    D: BusDriver<Output = ClimateReading>,
    L: LedPort,
{
    pub fn new(
        sensor: SensorReader<D>,
        led: L,
        ramp: ColourRamp,
        sequence: AlternatingSequence,
        every: Every,
        aqi_colour: SharedColour,
    ) -> Self {
        Self {
            sensor,
            led,
            ramp,
            sequence,
            every,
            aqi_colour,
            last_temp: None,
            temp_colour: OFF,
        }
    }

    pub fn temperature(&self) -> Option<f32> {
        self.last_temp
    }

    pub fn colour(&self) -> Colour {
        self.temp_colour
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    pub fn led_mut(&mut self) -> &mut L {
        &mut self.led
    }

    /// Read once and recompute the colour if the temperature moved.
    /// Returns whether the colour was recomputed.
    pub async fn update<E: EventSink>(&mut self, events: &mut E) -> bool {
        let celsius = match self.sensor.read().await {
            Ok(reading) => reading.value.temperature_c,
            Err(e) => {
                events.emit(&AppEvent::ReadFailed {
                    sensor: "climate",
                    reason: e.to_string(),
                });
                return false;
            }
        };
        if self.last_temp == Some(celsius) {
            debug!("LED: temperature unchanged at {celsius:.1}");
            return false;
        }
        self.last_temp = Some(celsius);
        self.temp_colour = self.ramp.map(celsius);
        events.emit(&AppEvent::TemperatureChanged {
            celsius,
            colour: self.temp_colour,
        });
        true
    }

    /// Flash the AQI colour against the temperature colour, then hold
    /// the temperature colour.
    pub async fn show(&mut self, cancel: &CancelToken) -> bool {
        self.sequence
            .play(&mut self.led, self.aqi_colour.get(), self.temp_colour, cancel)
            .await
    }

    pub async fn run<E: EventSink>(&mut self, events: &mut E, cancel: &CancelToken) {
        events.emit(&AppEvent::Started("led"));
        loop {
            self.update(events).await;
            let flash = self
                .sequence
                .play(&mut self.led, self.aqi_colour.get(), self.temp_colour, cancel);
            let (shown, ticked) = future::zip(flash, self.every.tick(cancel)).await;
            if !shown || !ticked {
                break;
            }
        }
        info!("LED: temperature loop stopped");
    }
}

// ───────────────────────────────────────────────────────────────
// Air-quality loop
// ───────────────────────────────────────────────────────────────

pub struct AqiRefresher<S> {
    source: S,
    ramp: ThresholdRamp,
    every: Every,
    colour: SharedColour,
}

impl<S: AqiSource> AqiRefresher<S> {
    pub fn new(source: S, ramp: ThresholdRamp, every: Every, colour: SharedColour) -> Self {
        Self {
            source,
            ramp,
            every,
            colour,
        }
    }

    /// Fetch once.  On failure the shared colour is left as it was.
    pub fn refresh<E: EventSink>(&mut self, events: &mut E) -> Option<Colour> {
        match self.source.fetch_aqi() {
            Ok(aqi) => {
                let colour = self.ramp.map(aqi);
                self.colour.set(colour);
                events.emit(&AppEvent::AqiUpdated { aqi, colour });
                Some(colour)
            }
            Err(e) => {
                warn!("AQI: fetch failed, keeping previous colour: {e}");
                None
            }
        }
    }

    /// Refresh immediately, then every interval until cancelled.
    pub async fn run<E: EventSink>(&mut self, events: &mut E, cancel: &CancelToken) {
        loop {
            self.refresh(events);
            if !self.every.tick(cancel).await {
                break;
            }
        }
        info!("AQI: refresh loop stopped");
    }
}
