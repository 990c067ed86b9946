//! Door edge consumer owning the alert lifecycle.
//!
//! | Edge     | Notifier outstanding | Action                  |
//! |----------|----------------------|-------------------------|
//! | `Opened` | no                   | arm a new notifier      |
//! | `Opened` | yes                  | none (keep the one)     |
//! | `Closed` | yes                  | cancel and clear it     |
//! | `Closed` | no                   | none                    |
//!
//! A notifier that already fired is not outstanding: it is reaped before
//! each edge, so a later `Closed` is `Idle` and a later `Opened` arms
//! afresh.  Edges are handled serially on the controller's own task, and
//! arming or cancelling never waits on delivery.

use std::sync::Arc;

use log::{debug, error, info};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, NotificationSink};
use crate::door::notifier::{DelayedNotifier, NotifierHandle};
use crate::events::{DoorEdge, DoorEventReceiver, DoorState};

/// What [`DoorController::handle`] did with an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorAction {
    Armed,
    AlreadyArmed,
    Disarmed,
    Idle,
}

pub struct DoorController {
    door: Option<DoorState>,
    notifier: Option<NotifierHandle>,
    template: DelayedNotifier,
    sink: Arc<dyn NotificationSink>,
}

impl DoorController {
    /// `template` is cloned for every armed alert.
    pub fn new(template: DelayedNotifier, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            door: None,
            notifier: None,
            template,
            sink,
        }
    }

    /// Door state as of the last handled edge.
    pub fn door(&self) -> Option<DoorState> {
        self.door
    }

    /// Whether an alert is pending (armed and not yet fired).
    pub fn is_armed(&self) -> bool {
        self.notifier.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Drop the handle of a notifier that has already ended.
    fn reap(&mut self) {
        if self.notifier.as_ref().is_some_and(NotifierHandle::is_finished) {
            debug!("Door: notifier already fired, clearing it");
            self.notifier = None;
        }
    }

    pub fn handle<E: EventSink>(&mut self, edge: DoorEdge, events: &mut E) -> DoorAction {
        self.door = Some(edge.state());
        events.emit(&AppEvent::Door(edge));
        self.reap();

        match edge {
            DoorEdge::Opened if self.notifier.is_some() => DoorAction::AlreadyArmed,
            DoorEdge::Opened => match self.template.clone().spawn(Arc::clone(&self.sink)) {
                Ok(handle) => {
                    self.notifier = Some(handle);
                    events.emit(&AppEvent::NotifierArmed {
                        after: self.template.timeout(),
                    });
                    DoorAction::Armed
                }
                Err(e) => {
                    error!("Door: cannot start notifier: {e}");
                    DoorAction::Idle
                }
            },
            DoorEdge::Closed => match self.notifier.take() {
                Some(handle) if handle.is_finished() => DoorAction::Idle,
                Some(handle) => {
                    handle.cancel();
                    events.emit(&AppEvent::NotifierDisarmed);
                    DoorAction::Disarmed
                }
                None => DoorAction::Idle,
            },
        }
    }

    /// Consume edges in arrival order.  Never returns; race it against
    /// the monitor (which ends on cancellation) and call
    /// [`shutdown`](Self::shutdown) afterwards.
    pub async fn run<E: EventSink>(&mut self, rx: DoorEventReceiver<'_>, events: &mut E) {
        loop {
            let edge = rx.receive().await;
            self.handle(edge, events);
        }
    }

    /// Cancel any outstanding alert.
    pub fn shutdown(&mut self) {
        self.reap();
        if let Some(handle) = self.notifier.take() {
            info!("Door: cancelling outstanding alert on shutdown");
            handle.cancel();
        }
    }
}
