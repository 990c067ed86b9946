//! Door edge events and the queue that carries them.
//!
//! The contact monitor is the only producer and the door controller the
//! only consumer, so edges are delivered and processed in observation
//! order.
//!
//! ```text
//! ┌────────────────┐  DoorEdge  ┌──────────────────┐
//! │ ContactMonitor │──────────▶│  DoorController   │
//! │ (poll task)    │  channel   │  (lifecycle only) │
//! └────────────────┘            └──────────────────┘
//! ```

use core::fmt;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

/// Physical state of a monitored door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Open,
}

impl DoorState {
    /// Map a magnet-contact reading: contact made means the door is shut.
    pub fn from_contact(contact: bool) -> Self {
        if contact { Self::Closed } else { Self::Open }
    }
}

/// Emitted only on a confirmed transition, never per observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorEdge {
    Opened,
    Closed,
}

impl DoorEdge {
    /// The edge that leads into `state`.
    pub fn into_state(state: DoorState) -> Self {
        match state {
            DoorState::Open => Self::Opened,
            DoorState::Closed => Self::Closed,
        }
    }

    /// The state this edge leaves the door in.
    pub fn state(self) -> DoorState {
        match self {
            Self::Opened => DoorState::Open,
            Self::Closed => DoorState::Closed,
        }
    }
}

impl fmt::Display for DoorEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened => write!(f, "door_opened"),
            Self::Closed => write!(f, "door_closed"),
        }
    }
}

/// Bounded depth of the door edge queue.
pub const DOOR_EVENT_DEPTH: usize = 8;

pub type DoorEventChannel = Channel<CriticalSectionRawMutex, DoorEdge, DOOR_EVENT_DEPTH>;
pub type DoorEventSender<'a> = Sender<'a, CriticalSectionRawMutex, DoorEdge, DOOR_EVENT_DEPTH>;
pub type DoorEventReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, DoorEdge, DOOR_EVENT_DEPTH>;
