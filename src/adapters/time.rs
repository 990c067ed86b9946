//! Astronomical daylight adapter.
//!
//! Computes sunrise and sunset for a fixed location with the `sunrise`
//! crate (NOAA algorithm, UTC unix timestamps) and converts them to local
//! wall-clock time with `chrono`.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};

use crate::app::ports::DaylightSource;
use crate::error::AdapterError;

#[derive(Debug, Clone, Copy)]
pub struct SolarDaylight {
    latitude: f64,
    longitude: f64,
}

impl SolarDaylight {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl DaylightSource for SolarDaylight {
    fn sun_times(&self, date: NaiveDate) -> Result<(DateTime<Local>, DateTime<Local>), AdapterError> {
        #[allow(deprecated)]
        let (rise, set) = sunrise::sunrise_sunset(
            self.latitude,
            self.longitude,
            date.year(),
            date.month(),
            date.day(),
        );
        Ok((local(rise)?, local(set)?))
    }
}

fn local(unix: i64) -> Result<DateTime<Local>, AdapterError> {
    Local
        .timestamp_opt(unix, 0)
        .single()
        .ok_or_else(|| AdapterError::Output(format!("unrepresentable sun time {unix}")))
}
