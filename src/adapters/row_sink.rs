//! Row persistence sinks for the sensor logger.
//!
//! | Sink             | Destination                    | Retries            |
//! |------------------|--------------------------------|--------------------|
//! | `LogRowSink`     | log output only                | none needed        |
//! | `WebhookRowSink` | JSON POST (sheet/script hook)  | `attempts` total   |

use log::{info, warn};
use serde_json::json;

use super::utils;
use crate::app::logger_service::SensorRow;
use crate::app::ports::RowSink;
use crate::config::{LoggerConfig, secs};
use crate::error::AdapterError;

/// Writes each row as a log line.
#[derive(Debug, Default)]
pub struct LogRowSink;

impl RowSink for LogRowSink {
    fn append(&mut self, row: &SensorRow) -> Result<(), AdapterError> {
        info!("Row: {}", row_json(row));
        Ok(())
    }
}

/// POSTs each row as JSON, retrying a bounded number of times.
pub struct WebhookRowSink {
    agent: ureq::Agent,
    url: String,
    attempts: u8,
}

impl WebhookRowSink {
    pub fn new(url: impl Into<String>, config: &LoggerConfig) -> Self {
        Self {
            agent: utils::agent(secs(config.timeout_secs)),
            url: url.into(),
            attempts: config.append_attempts.max(1),
        }
    }
}

impl RowSink for WebhookRowSink {
    fn append(&mut self, row: &SensorRow) -> Result<(), AdapterError> {
        let body = row_json(row).to_string();
        let mut last = AdapterError::Http("no attempt made".into());
        for attempt in 1..=self.attempts {
            match self
                .agent
                .post(&self.url)
                .set("Content-Type", "application/json")
                .send_string(&body)
            {
                Ok(_) => return Ok(()),
                Err(e) => {
                    last = utils::http_error(e);
                    warn!("Row: append attempt {attempt}/{} failed: {last}", self.attempts);
                }
            }
        }
        Err(last)
    }
}

fn row_json(row: &SensorRow) -> serde_json::Value {
    json!({
        "timestamp": row.timestamp.to_rfc3339(),
        "temperature_c": row.temperature_c,
        "humidity_pct": row.humidity_pct,
        "broadband": row.broadband,
        "ir": row.ir,
        "lux": row.lux,
    })
}
