//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements           | Connects to                   |
//! |------------|----------------------|-------------------------------|
//! | `aqi`      | AqiSource            | WAQI geo feed (HTTP)          |
//! | `ifttt`    | NotificationSink     | IFTTT maker webhook (HTTP)    |
//! | `log_sink` | EventSink            | Log output                    |
//! | `miio`     | ContactSensor        | `miio` CLI (Zigbee gateway)   |
//! |            | LightSwitch          |                               |
//! | `row_sink` | RowSink              | Log output / JSON webhook     |
//! | `time`     | DaylightSource       | Solar calculation             |
//!
//! The GPIO contact and PWM LED live in [`crate::sensors::contact`] and
//! [`crate::drivers::status_led`].

pub mod aqi;
pub mod ifttt;
pub mod log_sink;
pub mod miio;
pub mod row_sink;
pub mod time;
pub(crate) mod utils;
