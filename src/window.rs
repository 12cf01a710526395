use std::{
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::util::format_dump;

struct Ring {
    slots: Vec<f64>,
    // next write position, which is also the oldest sample once full
    cursor: usize,
    pushes: u64,
}

/// Fixed-capacity rolling window of the most recent samples.
///
/// Shared between the stdin reader (writer) and the refresh loop (reader).
/// Every operation takes the internal lock for just the copy or write it needs.
pub struct RollingWindow {
    ring: Mutex<Ring>,
}

impl RollingWindow {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "rolling window capacity must be at least 1");
        Self {
            ring: Mutex::new(Ring {
                slots: vec![0.0; capacity],
                cursor: 0,
                pushes: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ring> {
        // A panicking holder cannot leave the ring half-written: every write is
        // a single slot store followed by a cursor bump.
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, value: f64) {
        let mut ring = self.lock();
        let cursor = ring.cursor;
        ring.slots[cursor] = value;
        ring.cursor = (cursor + 1) % ring.slots.len();
        ring.pushes += 1;
    }

    /// Oldest to newest, always `capacity()` long. Slots never written read as 0.
    pub fn snapshot(&self) -> Vec<f64> {
        self.snapshot_counted().0
    }

    /// `snapshot()` together with `pushes()`, both read under one lock.
    pub fn snapshot_counted(&self) -> (Vec<f64>, u64) {
        let ring = self.lock();
        let (newer, older) = ring.slots.split_at(ring.cursor);
        let mut out = Vec::with_capacity(ring.slots.len());
        out.extend_from_slice(older);
        out.extend_from_slice(newer);
        (out, ring.pushes)
    }

    pub fn capacity(&self) -> usize {
        self.lock().slots.len()
    }

    /// Total number of samples pushed since construction.
    pub fn pushes(&self) -> u64 {
        self.lock().pushes
    }
}

// Bracketed dump, e.g. `[ 1.2 3.4  ]`
impl fmt::Display for RollingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_dump(&self.snapshot()))
    }
}
