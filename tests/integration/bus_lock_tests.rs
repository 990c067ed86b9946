//! Cross-thread bus exclusion through `SensorReader`.
//!
//! Each thread opens its own lock file description, exactly as separate
//! role processes do, so `flock` arbitrates between them.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use futures_lite::future;

use smarthome::error::{DriverError, LockError, SensorError};
use smarthome::sensors::lock::BusLock;
use smarthome::sensors::{BusDriver, SensorReader};

use crate::mock_hw::scripted_reader;

/// Counts how many readers are inside a transaction at once.
struct OverlapCounter {
    inside: Arc<AtomicUsize>,
    overlaps: Arc<AtomicUsize>,
}

impl BusDriver for OverlapCounter {
    type Output = u32;

    fn read(&mut self) -> Result<u32, DriverError> {
        if self.inside.fetch_add(1, Ordering::SeqCst) != 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        thread::sleep(Duration::from_millis(2));
        self.inside.fetch_sub(1, Ordering::SeqCst);
        Ok(7)
    }
}

#[test]
fn concurrent_readers_never_share_the_bus() {
    let dir = tempfile::tempdir().unwrap();
    let inside = Arc::new(AtomicUsize::new(0));
    let overlaps = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let lock = BusLock::for_bus(dir.path(), "i2c-1").with_poll_interval(Duration::from_millis(1));
            let counter = OverlapCounter {
                inside: Arc::clone(&inside),
                overlaps: Arc::clone(&overlaps),
            };
            thread::spawn(move || {
                let mut reader = SensorReader::new(lock, counter, 1, Duration::ZERO);
                for _ in 0..15 {
                    assert_eq!(future::block_on(reader.read()).unwrap().value, 7);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}

#[test]
fn failed_read_still_releases_the_bus() {
    let dir = tempfile::tempdir().unwrap();
    let mut reader = scripted_reader::<u32>(dir.path(), "i2c-1", vec![Err(DriverError::Malformed)]);

    let err = future::block_on(reader.read()).unwrap_err();
    assert!(matches!(err, SensorError::ReadFailed { attempts: 1, .. }), "got {err:?}");
    assert!(reader.lock().try_acquire().unwrap().is_some());
}

#[test]
fn held_bus_times_out_without_touching_the_driver() {
    let dir = tempfile::tempdir().unwrap();
    let holder = BusLock::for_bus(dir.path(), "i2c-1");
    let _guard = holder.try_acquire().unwrap().expect("holder gets the bus");

    let lock = BusLock::for_bus(dir.path(), "i2c-1")
        .with_poll_interval(Duration::from_millis(2))
        .with_max_wait(Some(Duration::from_millis(20)));
    let mut reader = SensorReader::new(lock, crate::mock_hw::ScriptedDriver::new(vec![Ok(1u32)]), 3, Duration::ZERO);

    let err = future::block_on(reader.read()).unwrap_err();
    assert!(matches!(err, SensorError::Lock(LockError::Timeout { .. })), "got {err:?}");
    assert_eq!(reader.driver_mut().reads, 0);
}

#[test]
fn separate_buses_do_not_contend() {
    let dir = tempfile::tempdir().unwrap();
    let _climate = BusLock::for_bus(dir.path(), "i2c-1").try_acquire().unwrap().unwrap();
    assert!(BusLock::for_bus(dir.path(), "i2c-2").try_acquire().unwrap().is_some());
}
