//! Device-node drivers and LED sequencing.

pub mod gpio;
pub mod led_patterns;
pub mod status_led;
