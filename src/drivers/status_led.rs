//! RGB status LED on three sysfs PWM channels.
//!
//! Each colour channel is a `pwmchipN/pwmM` directory with `period`,
//! `duty_cycle` and `enable` attributes (nanoseconds).  A channel level
//! of 0–255 maps linearly onto the duty cycle.
//!
//! Channels must already be exported (`echo M > pwmchipN/export`);
//! [`PwmRgbLed::open`] only programs the period and enables them.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::app::ports::LedPort;
use crate::colour::{Colour, OFF};
use crate::error::AdapterError;

pub struct PwmRgbLed {
    channels: [PathBuf; 3],
    period_ns: u32,
    current: Colour,
}

impl PwmRgbLed {
    /// `channels` are the R, G, B indices under `chip`.
    pub fn open(chip: &Path, channels: [u32; 3], period_ns: u32) -> Result<Self, AdapterError> {
        let channels = channels.map(|ch| chip.join(format!("pwm{ch}")));
        for dir in &channels {
            write_attr(&dir.join("period"), period_ns)?;
            write_attr(&dir.join("duty_cycle"), 0)?;
            write_attr(&dir.join("enable"), 1)?;
        }
        Ok(Self {
            channels,
            period_ns,
            current: OFF,
        })
    }

    pub fn current_colour(&self) -> Colour {
        self.current
    }

    pub fn off(&mut self) {
        self.set_colour(OFF);
    }

    fn duty(&self, level: u8) -> u32 {
        (u64::from(self.period_ns) * u64::from(level) / 255) as u32
    }
}

impl LedPort for PwmRgbLed {
    fn set_colour(&mut self, colour: Colour) {
        let levels = [colour.r, colour.g, colour.b];
        for (dir, level) in self.channels.iter().zip(levels) {
            if let Err(e) = write_attr(&dir.join("duty_cycle"), self.duty(level)) {
                warn!("LED: {}: {e}", dir.display());
            }
        }
        self.current = colour;
    }
}

fn write_attr(path: &Path, value: u32) -> Result<(), AdapterError> {
    fs::write(path, value.to_string())
        .map_err(|e| AdapterError::Command(format!("write {}: {e}", path.display())))
}
