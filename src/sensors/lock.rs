//! Cross-process advisory lock over a named hardware bus.
//!
//! Single-wire sensors (DHT22) and the shared I2C light sensor are read by
//! several independent processes.  Each acquisition opens its own file
//! description on `<lock_dir>/<bus>.lock` and takes a BSD `flock(2)` on
//! it, so the lock serialises callers across processes *and* between
//! tasks of the same process.
//!
//! ```text
//!   acquire() ──open──▶ lock file ──flock(EX|NB)──┬─ ok ──────▶ BusGuard
//!                 │                               ├─ EWOULDBLOCK ─ wait poll_interval ─┐
//!                 │                               │                 (or Timeout)       │
//!                 │                               └─ other errno ─▶ LockError::Lock    │
//!                 └─ fails ─▶ LockError::Open             ▲─────────────────────────────┘
//! ```
//!
//! The guard unlocks on drop, so every exit path of the critical section
//! releases the bus.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, warn};
use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};

use crate::error::LockError;

/// Default wait between contended attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A named exclusive lock bound to one lock file per physical bus.
#[derive(Debug, Clone)]
pub struct BusLock {
    path: PathBuf,
    poll_interval: Duration,
    max_wait: Option<Duration>,
}

impl BusLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
        }
    }

    /// Lock file for bus `name` inside `dir`, e.g. `/var/lock/dht22.lock`.
    pub fn for_bus(dir: &Path, name: &str) -> Self {
        Self::new(dir.join(format!("{name}.lock")))
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Give up with [`LockError::Timeout`] after `max_wait` of contention.
    /// `None` waits for as long as another holder keeps the bus.
    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One non-blocking attempt.  `Ok(None)` means someone else holds it.
    pub fn try_acquire(&self) -> Result<Option<BusGuard>, LockError> {
        let file = self.open()?;
        match self.try_lock(file)? {
            Ok(guard) => Ok(Some(guard)),
            Err(_) => Ok(None),
        }
    }

    /// Wait until the lock is held, polling every `poll_interval`.
    ///
    /// Only contention is waited out.  An unopenable lock file or a
    /// failing `flock` is returned immediately.
    pub async fn acquire(&self) -> Result<BusGuard, LockError> {
        let started = Instant::now();
        let mut file = self.open()?;
        let mut contended = false;
        loop {
            match self.try_lock(file)? {
                Ok(guard) => {
                    if contended {
                        debug!(
                            "Bus[{}]: acquired after {:?}",
                            self.path.display(),
                            started.elapsed()
                        );
                    }
                    return Ok(guard);
                }
                Err(returned) => file = returned,
            }

            contended = true;
            let waited = started.elapsed();
            if let Some(max_wait) = self.max_wait {
                if waited >= max_wait {
                    warn!("Bus[{}]: gave up after {:?}", self.path.display(), waited);
                    return Err(LockError::Timeout {
                        path: self.path.clone(),
                        waited,
                    });
                }
            }
            async_io_mini::Timer::after(self.poll_interval).await;
        }
    }

    fn open(&self) -> Result<File, LockError> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|source| LockError::Open {
                path: self.path.clone(),
                source,
            })
    }

    /// Inner `Err` hands the file back for the next attempt.
    fn try_lock(&self, file: File) -> Result<Result<BusGuard, File>, LockError> {
        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => Ok(Ok(BusGuard {
                lock,
                path: self.path.clone(),
            })),
            Err((file, errno)) if errno == Errno::EWOULDBLOCK => Ok(Err(file)),
            Err((_, errno)) => Err(LockError::Lock {
                path: self.path.clone(),
                errno,
            }),
        }
    }
}

/// Proof of exclusive bus ownership.  Dropping it releases the lock.
#[derive(Debug)]
pub struct BusGuard {
    lock: Flock<File>,
    path: PathBuf,
}

impl BusGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release explicitly so an unlock failure can be reported.  Closing
    /// the file description on the error path still frees the lock.
    pub fn release(self) -> Result<(), LockError> {
        let path = self.path;
        match self.lock.unlock() {
            Ok(_file) => Ok(()),
            Err((_lock, errno)) => Err(LockError::Lock { path, errno }),
        }
    }
}
