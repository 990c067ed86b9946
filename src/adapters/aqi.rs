//! World Air Quality Index (waqi.info) feed adapter.
//!
//! `GET {base}/feed/geo:{lat;lon}/?token={token}`.  The reply must carry
//! `"status": "ok"` and a numeric `data.aqi`; stations that are offline
//! report `"-"` there and are rejected.

use log::{debug, info};
use serde_json::Value;

use super::utils;
use crate::app::ports::AqiSource;
use crate::config::{AqiConfig, secs};
use crate::error::AdapterError;

/// `data.iaqi` keys worth logging, with display names.
const POLLUTANTS: [(&str, &str); 6] = [
    ("pm25", "PM 2.5"),
    ("pm10", "PM 10"),
    ("o3", "O3"),
    ("no2", "NO2"),
    ("so2", "SO2"),
    ("co", "CO"),
];

const WEATHER: [(&str, &str); 7] = [
    ("dew", "Dew"),
    ("h", "Relative Humidity"),
    ("r", "Precipitation"),
    ("w", "Wind"),
    ("wg", "Wind Gust"),
    ("t", "Temperature"),
    ("p", "Pressure"),
];

pub struct WaqiSource {
    agent: ureq::Agent,
    url: String,
}

impl WaqiSource {
    pub fn new(config: &AqiConfig) -> Self {
        Self {
            agent: utils::agent(secs(config.timeout_secs)),
            url: format!(
                "{}/feed/geo:{}/?token={}",
                utils::base(&config.base_url),
                config.geo,
                config.token
            ),
        }
    }
}

impl AqiSource for WaqiSource {
    fn fetch_aqi(&mut self) -> Result<f64, AdapterError> {
        let body = self
            .agent
            .get(&self.url)
            .call()
            .map_err(utils::http_error)?
            .into_string()
            .map_err(|e| AdapterError::Http(e.to_string()))?;
        parse_feed(&body)
    }
}

/// Extract the index from a feed reply, logging the station details.
pub(crate) fn parse_feed(body: &str) -> Result<f64, AdapterError> {
    let feed: Value =
        serde_json::from_str(body).map_err(|e| AdapterError::Output(format!("feed: {e}")))?;

    match feed["status"].as_str() {
        Some("ok") => {}
        Some(status) => return Err(AdapterError::Output(format!("status: {status}"))),
        None => return Err(AdapterError::Output("unexpected status".into())),
    }
    let aqi = feed["data"]["aqi"]
        .as_f64()
        .ok_or_else(|| AdapterError::Output("cannot find aqi info".into()))?;

    if let Some(time) = feed["data"]["time"]["s"].as_str() {
        debug!("AQI: station time {time}");
    }
    let iaqi = &feed["data"]["iaqi"];
    info!("AQI: {aqi} | pollutants: {}", describe(iaqi, &POLLUTANTS));
    debug!("AQI: weather: {}", describe(iaqi, &WEATHER));
    Ok(aqi)
}

fn describe(iaqi: &Value, fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .filter_map(|(key, name)| iaqi[*key]["v"].as_f64().map(|v| format!("[{name}:{v}]")))
        .collect::<Vec<_>>()
        .join(" ")
}
