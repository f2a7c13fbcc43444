//! Shared distance counter
//!
//! Every worker reports its successful travel steps here. Workers only ever
//! see the [`DistanceReporter`] side of the counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// Narrow capability handed to workers: report one unit of distance
pub trait DistanceReporter: Send + Sync {
    fn report(&self);
}

/// Exclusion mechanism guarding the counter's write path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterStrategy {
    /// Single atomic fetch-add
    #[default]
    Atomic,
    /// Mutex held across the read-modify-write
    Locked,
    /// Plain read then write. Loses updates under contention; only useful to
    /// demonstrate the race.
    Unsynchronized,
}

/// Counter shared by every worker of a fleet
#[derive(Debug)]
pub struct SharedCounter {
    strategy: CounterStrategy,
    value: AtomicU64,
    write_lock: Mutex<()>,
    /// Delay between the read and the write of a read-modify-write
    race_window: Duration,
}

impl Default for SharedCounter {
    fn default() -> Self {
        Self::new(CounterStrategy::default())
    }
}

impl SharedCounter {
    pub fn new(strategy: CounterStrategy) -> Self {
        Self::with_race_window(strategy, Duration::ZERO)
    }

    /// Counter that sleeps between reading and writing back the value.
    ///
    /// Ignored by [`CounterStrategy::Atomic`], which has no separate read.
    pub fn with_race_window(strategy: CounterStrategy, race_window: Duration) -> Self {
        Self {
            strategy,
            value: AtomicU64::new(0),
            write_lock: Mutex::new(()),
            race_window,
        }
    }

    pub fn strategy(&self) -> CounterStrategy {
        self.strategy
    }

    /// Current value. Never blocks writers; may be momentarily stale.
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }

    fn read_modify_write(&self) {
        let current = self.value.load(Ordering::Acquire);
        if !self.race_window.is_zero() {
            thread::sleep(self.race_window);
        }
        self.value.store(current + 1, Ordering::Release);
    }

    pub fn increment(&self) {
        match self.strategy {
            CounterStrategy::Atomic => {
                self.value.fetch_add(1, Ordering::AcqRel);
            }
            CounterStrategy::Locked => {
                let _guard = self
                    .write_lock
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                self.read_modify_write();
            }
            CounterStrategy::Unsynchronized => self.read_modify_write(),
        }
    }
}

impl DistanceReporter for SharedCounter {
    fn report(&self) {
        self.increment();
    }
}
