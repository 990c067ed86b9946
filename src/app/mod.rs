//! Application core: the role services and the ports they talk through.
//!
//! Each process role (`led`, `light`, `door`, `logger`) is a service here
//! or in [`crate::door`].  All interaction with devices, CLIs and remote
//! services happens through **port traits** defined in [`ports`], keeping
//! this layer testable without real peripherals.

pub mod events;
pub mod led_service;
pub mod light_service;
pub mod logger_service;
pub mod ports;
