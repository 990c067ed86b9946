//! IFTTT Maker webhook notification sink.
//!
//! `POST {base}/trigger/{event}/with/key/{key}` with
//! `{"value1": title, "value2": message}`.  One attempt per alert; a
//! failure goes back to the notifier, which reports it.

use log::info;
use serde_json::json;

use super::utils;
use crate::app::ports::NotificationSink;
use crate::config::{NotifyConfig, secs};
use crate::error::AdapterError;

pub struct IftttNotifier {
    agent: ureq::Agent,
    url: String,
}

impl IftttNotifier {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            agent: utils::agent(secs(config.timeout_secs)),
            url: format!(
                "{}/trigger/{}/with/key/{}",
                utils::base(&config.base_url),
                config.event,
                config.key
            ),
        }
    }
}

impl NotificationSink for IftttNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<(), AdapterError> {
        let body = json!({ "value1": title, "value2": message }).to_string();
        self.agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(utils::http_error)?;
        info!("Notify: sent through IFTTT");
        Ok(())
    }
}
