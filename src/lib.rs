//! Home controller library.
//!
//! One binary, four process roles (`led`, `light`, `door`, `logger`),
//! all built from the modules below.  Hardware, CLIs and web services sit
//! behind the port traits in [`app::ports`] so every role can be driven
//! by test doubles.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cancel;
pub mod colour;
pub mod config;
pub mod door;
pub mod drivers;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod sensors;
