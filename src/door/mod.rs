//! Door-open detection with a cancellable delayed alert.
//!
//! ```text
//! ┌────────────────┐  DoorEdge   ┌────────────────┐ spawn/cancel ┌──────────────────┐
//! │ ContactMonitor │──channel──▶│ DoorController │─────────────▶│ DelayedNotifier  │
//! │  (poll task)   │  depth 8    │ (single owner) │              │ (own thread)     │
//! └────────────────┘             └────────────────┘              └────────┬─────────┘
//!                                                                          │ timeout
//!                                                                          ▼
//!                                                                 NotificationSink
//! ```

pub mod controller;
pub mod monitor;
pub mod notifier;

pub use controller::{DoorAction, DoorController};
pub use monitor::ContactMonitor;
pub use notifier::{DelayedNotifier, NotifierHandle, NotifierOutcome};
