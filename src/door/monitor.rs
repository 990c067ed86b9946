//! Periodic contact poller that turns readings into edge events.
//!
//! ```text
//!          first good read (no event)
//!   Unknown ──────────────────────────▶ Closed ◀──closed──▶ Open
//!                                        ▲   edge emitted on    ▲
//!                                        └── every flip only ───┘
//! ```
//!
//! A failed poll is skipped outright: no event and the stable state is
//! kept, so transient I/O noise cannot produce spurious flips.

use core::time::Duration;

use futures_lite::future;
use log::{debug, info, warn};

use crate::app::ports::ContactSensor;
use crate::cancel::CancelToken;
use crate::events::{DoorEdge, DoorEventSender, DoorState};
use crate::scheduler::Every;

pub struct ContactMonitor<S> {
    sensor: S,
    every: Every,
    stable: Option<DoorState>,
}

impl<S: ContactSensor> ContactMonitor<S> {
    pub fn new(sensor: S, poll_interval: Duration) -> Self {
        Self {
            sensor,
            every: Every::new(poll_interval),
            stable: None,
        }
    }

    /// Last confirmed state, `None` until the first successful poll.
    pub fn stable(&self) -> Option<DoorState> {
        self.stable
    }

    /// One poll tick.  Returns the edge to publish, if any.
    pub fn poll(&mut self) -> Option<DoorEdge> {
        let state = match self.sensor.read_contact() {
            Ok(state) => state,
            Err(e) => {
                warn!("Door: poll skipped: {e}");
                return None;
            }
        };

        match self.stable {
            None => {
                info!("Door: initial state {state:?}");
                self.stable = Some(state);
                None
            }
            Some(prev) if prev == state => {
                debug!("Door: still {state:?}");
                None
            }
            Some(_) => {
                self.stable = Some(state);
                Some(DoorEdge::into_state(state))
            }
        }
    }

    /// Poll until `cancel` fires, publishing edges in observation order.
    /// Nothing is sent once cancellation has been observed.
    pub async fn run(&mut self, tx: DoorEventSender<'_>, cancel: &CancelToken) {
        info!("Door: polling every {:?}", self.every.interval());
        loop {
            if cancel.is_cancelled() {
                break;
            }
            if let Some(edge) = self.poll() {
                let sent = future::or(
                    async {
                        cancel.cancelled().await;
                        false
                    },
                    async {
                        tx.send(edge).await;
                        true
                    },
                )
                .await;
                if !sent {
                    break;
                }
            }
            if !self.every.tick(cancel).await {
                break;
            }
        }
        info!("Door: monitor stopped");
    }
}
