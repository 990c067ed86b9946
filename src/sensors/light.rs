//! TSL2561 ambient light sensor via the Linux IIO `tsl2563` driver.

use std::path::{Path, PathBuf};

use crate::error::DriverError;
use crate::sensors::{BusDriver, read_attr};

/// Raw channel counts plus the driver's computed illuminance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightReading {
    pub broadband: u32,
    pub ir: u32,
    pub lux: f32,
}

pub struct IioLightSensor {
    broadband: PathBuf,
    ir: PathBuf,
    lux: PathBuf,
}

impl IioLightSensor {
    pub fn new(device: &Path) -> Self {
        Self {
            broadband: device.join("in_intensity_both_raw"),
            ir: device.join("in_intensity_ir_raw"),
            lux: device.join("in_illuminance0_input"),
        }
    }
}

impl BusDriver for IioLightSensor {
    type Output = LightReading;

    fn read(&mut self) -> Result<LightReading, DriverError> {
        let broadband = read_attr(&self.broadband)?;
        let ir = read_attr(&self.ir)?;
        let lux = read_attr(&self.lux)?;
        if broadband < 0.0 || ir < 0.0 {
            return Err(DriverError::Malformed);
        }
        Ok(LightReading {
            broadband: broadband as u32,
            ir: ir as u32,
            lux: lux as f32,
        })
    }
}
