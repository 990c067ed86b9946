//! Cooperative cancellation token.
//!
//! A task only stops at its next checked cancellation point: a poll-tick
//! boundary or a timeout race.  Unlike `embassy_sync::signal::Signal`,
//! any number of tasks may await the same token; one [`CancelToken::cancel`]
//! releases all of them.
//!
//! ```text
//!  signal handler ──cancel()──▶ CancelToken ──wake──▶ ContactMonitor
//!                                           ──wake──▶ role loops
//!  DoorController ──cancel()──▶ CancelToken ──wake──▶ DelayedNotifier
//! ```

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::Poll;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::waitqueue::MultiWakerRegistration;

/// Maximum number of tasks parked on one token before they are woken
/// early to make room (they simply re-register on their next poll).
const MAX_WAITERS: usize = 8;

struct TokenState {
    cancelled: bool,
    wakers: MultiWakerRegistration<MAX_WAITERS>,
}

/// Shared, idempotent cancellation signal.  Wrap in an `Arc` to share
/// across threads.
pub struct CancelToken {
    state: Mutex<CriticalSectionRawMutex, RefCell<TokenState>>,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(TokenState {
                cancelled: false,
                wakers: MultiWakerRegistration::new(),
            })),
        }
    }

    /// Mark the token cancelled and wake every waiter.  Calling this again
    /// has no further effect.
    pub fn cancel(&self) {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            if !s.cancelled {
                s.cancelled = true;
                s.wakers.wake();
            }
        });
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock(|s| s.borrow().cancelled)
    }

    /// Resolve once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        poll_fn(|cx| {
            self.state.lock(|s| {
                let mut s = s.borrow_mut();
                if s.cancelled {
                    Poll::Ready(())
                } else {
                    s.wakers.register(cx.waker());
                    Poll::Pending
                }
            })
        })
        .await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
