//! Single-shot deferred alert.
//!
//! A [`DelayedNotifier`] races its timeout against a [`CancelToken`].
//! The timeout winning delivers exactly one notification; cancellation
//! winning ends it silently.  [`DelayedNotifier::spawn`] runs it on its
//! own thread so the door controller never waits on delivery.

use core::time::Duration;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use futures_lite::future;
use log::{debug, error, info};

use crate::app::ports::NotificationSink;
use crate::cancel::CancelToken;
use crate::error::AdapterError;
use crate::scheduler::Every;

/// How a notifier ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierOutcome {
    /// The timeout elapsed and the sink accepted the alert.
    Notified,
    /// The timeout elapsed but the sink failed.  Not retried.
    DeliveryFailed(AdapterError),
    /// Cancelled before the timeout; nothing was sent.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct DelayedNotifier {
    timeout: Duration,
    title: String,
    message: String,
}

impl DelayedNotifier {
    pub fn new(timeout: Duration, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timeout,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn run(&self, cancel: &CancelToken, sink: &dyn NotificationSink) -> NotifierOutcome {
        if !Every::new(self.timeout).tick(cancel).await {
            debug!("Notifier: cancelled before {:?}", self.timeout);
            return NotifierOutcome::Cancelled;
        }
        match sink.notify(&self.title, &self.message) {
            Ok(()) => {
                info!("Notifier: sent \"{}\"", self.title);
                NotifierOutcome::Notified
            }
            Err(e) => {
                error!("Notifier: delivery failed: {e}");
                NotifierOutcome::DeliveryFailed(e)
            }
        }
    }

    /// Run on a dedicated thread.  The returned handle owns the
    /// cancellation signal.
    pub fn spawn(self, sink: Arc<dyn NotificationSink>) -> io::Result<NotifierHandle> {
        let cancel = Arc::new(CancelToken::new());
        let token = Arc::clone(&cancel);
        let join = thread::Builder::new()
            .name("door-notifier".into())
            .spawn(move || future::block_on(self.run(&token, &*sink)))?;
        Ok(NotifierHandle {
            cancel,
            join: Some(join),
        })
    }
}

/// Live notifier.  Consumed by [`cancel`](Self::cancel), so it cannot be
/// cancelled twice.  Dropping the handle also cancels.
pub struct NotifierHandle {
    cancel: Arc<CancelToken>,
    join: Option<JoinHandle<NotifierOutcome>>,
}

impl NotifierHandle {
    /// Signal cancellation without waiting for the thread to observe it.
    pub fn cancel(self) {
        drop(self);
    }

    /// Whether the notifier thread has ended (fired or cancelled).
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the notifier to end.  `None` if its thread panicked.
    pub fn join(mut self) -> Option<NotifierOutcome> {
        self.join.take().and_then(|join| join.join().ok())
    }
}

impl Drop for NotifierHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
