//! Periodic ticker shared by every polling task.
//!
//! Each role loop (temperature LED, light, door poll, sensor logger) waits
//! on an [`Every`] between iterations.  The wait is the task's cooperative
//! cancellation point: it races the interval timer against the process
//! [`CancelToken`] and reports which one won.
//!
//! ```text
//!   loop {
//!       if !every.tick(&cancel).await { break }   // cancelled
//!       do_work().await;
//!   }
//! ```

use core::time::Duration;

use futures_lite::future;

use crate::cancel::CancelToken;

/// Fixed-interval ticker.
#[derive(Debug, Clone, Copy)]
pub struct Every {
    interval: Duration,
}

impl Every {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait one interval.  Returns `false` when `cancel` fired first (or
    /// had already fired), `true` when the interval elapsed.
    pub async fn tick(&self, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        future::or(
            async {
                cancel.cancelled().await;
                false
            },
            async {
                async_io_mini::Timer::after(self.interval).await;
                true
            },
        )
        .await
    }
}
