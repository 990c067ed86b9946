//! DHT22 temperature/humidity sensor via the Linux IIO `dht11` driver.
//!
//! The kernel driver does the single-wire bit-banging.  Each attribute
//! read triggers a fresh transaction and reports milli-degrees and
//! milli-percent.  A missed transaction surfaces as `ETIMEDOUT` (mapped
//! to [`DriverError::Timeout`]) or `EIO`.

use std::path::{Path, PathBuf};

use crate::error::DriverError;
use crate::sensors::{BusDriver, read_attr};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

pub struct IioClimateSensor {
    temperature: PathBuf,
    humidity: PathBuf,
}

impl IioClimateSensor {
    /// `device` is the IIO device directory, e.g.
    /// `/sys/bus/iio/devices/iio:device0`.
    pub fn new(device: &Path) -> Self {
        Self {
            temperature: device.join("in_temp_input"),
            humidity: device.join("in_humidityrelative_input"),
        }
    }
}

impl BusDriver for IioClimateSensor {
    type Output = ClimateReading;

    fn read(&mut self) -> Result<ClimateReading, DriverError> {
        let milli_c = read_attr(&self.temperature)?;
        let milli_pct = read_attr(&self.humidity)?;
        Ok(ClimateReading {
            temperature_c: (milli_c / 1000.0) as f32,
            humidity_pct: (milli_pct / 1000.0) as f32,
        })
    }
}
