//! Sensor subsystem: bus-locked acquisitions and the device drivers behind them.
//!
//! A [`SensorReader`] performs one logical acquisition:
//!
//! ```text
//!   acquire(bus lock) ──▶ attempt 1 ─fail─▶ wait ─▶ attempt 2 ─ … ─▶ attempt N
//!          │                  │ ok                                     │ fail
//!          │                  ▼                                        ▼
//!          │            release, Ok(reading)                release, ReadFailed
//!          └─ LockError ──▶ SensorError::Lock (no attempt made)
//! ```
//!
//! Retries stay inside the held lock so no other process can interleave a
//! transaction on the shared bus.  The reader keeps no cache: holding on
//! to the last good value is the caller's job.

pub mod climate;
pub mod contact;
pub mod light;
pub mod lock;

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, warn};

use crate::error::{DriverError, SensorError};
use lock::BusLock;

/// One opaque physical read.  May fail spuriously on protocol timing.
pub trait BusDriver {
    type Output: Copy;

    fn read(&mut self) -> Result<Self::Output, DriverError>;
}

/// A successful acquisition, stamped with wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading<T> {
    pub value: T,
    pub timestamp: DateTime<Local>,
}

/// Bus-locked, bounded-retry reader around one [`BusDriver`].
pub struct SensorReader<D> {
    lock: BusLock,
    driver: D,
    max_attempts: u8,
    retry_delay: Duration,
}

impl<D: BusDriver> SensorReader<D> {
    /// `max_attempts` is clamped to at least one.
    pub fn new(lock: BusLock, driver: D, max_attempts: u8, retry_delay: Duration) -> Self {
        Self {
            lock,
            driver,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    pub fn lock(&self) -> &BusLock {
        &self.lock
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub async fn read(&mut self) -> Result<SensorReading<D::Output>, SensorError> {
        let guard = self.lock.acquire().await?;
        let outcome = self.read_locked().await;
        if let Err(e) = guard.release() {
            warn!("Bus[{}]: release failed: {e}", self.lock.path().display());
        }
        outcome
    }

    async fn read_locked(&mut self) -> Result<SensorReading<D::Output>, SensorError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.driver.read() {
                Ok(value) => {
                    return Ok(SensorReading {
                        value,
                        timestamp: Local::now(),
                    });
                }
                Err(last) if attempt >= self.max_attempts => {
                    warn!(
                        "Bus[{}]: giving up after {attempt} attempts: {last}",
                        self.lock.path().display()
                    );
                    return Err(SensorError::ReadFailed {
                        attempts: attempt,
                        last,
                    });
                }
                Err(e) => {
                    debug!(
                        "Bus[{}]: attempt {attempt}/{} failed: {e}",
                        self.lock.path().display(),
                        self.max_attempts
                    );
                    async_io_mini::Timer::after(self.retry_delay).await;
                }
            }
        }
    }
}

/// Parse one numeric sysfs attribute (IIO channels print a bare number).
pub(crate) fn read_attr(path: &Path) -> Result<f64, DriverError> {
    let text = fs::read_to_string(path)?;
    text.trim().parse().map_err(|_| DriverError::Malformed)
}
