// crates/fatoken-core/src/traits.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::time::Timestamp;

/// Source of the trusted `now` handed to every ledger operation.
///
/// Implemented by the daemon (wall clock) and by tests (manual clock).
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by `chrono::Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(Utc::now())
    }
}

/// Hand-driven clock. Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    secs: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            secs: Arc::new(AtomicU64::new(start.as_secs())),
        }
    }

    pub fn set(&self, at: Timestamp) {
        self.secs.store(at.as_secs(), Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.secs.load(Ordering::SeqCst))
    }
}

/// Wraps a clock so that it never reports a time earlier than one it has
/// already reported. Wall clocks step backwards under NTP; the sequencer
/// must not pass that through to the ledger.
#[derive(Debug)]
pub struct MonotonicClock<C> {
    inner: C,
    high_water: AtomicU64,
}

impl<C: Clock> MonotonicClock<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            high_water: AtomicU64::new(0),
        }
    }

    /// Seed the floor, e.g. with the restored ledger's last accrual time.
    pub fn with_floor(inner: C, floor: Timestamp) -> Self {
        Self {
            inner,
            high_water: AtomicU64::new(floor.as_secs()),
        }
    }
}

impl<C: Clock> Clock for MonotonicClock<C> {
    fn now(&self) -> Timestamp {
        let observed = self.inner.now().as_secs();
        let previous = self.high_water.fetch_max(observed, Ordering::SeqCst);
        Timestamp::new(previous.max(observed))
    }
}
