//! Thread-safe append-only store of readings.

use std::sync::{Mutex, MutexGuard};

/// Append-only collection of readings shared between the timer thread and
/// readers. Never evicts and never clears.
#[derive(Debug, Default)]
pub struct SampleQueue {
    readings: Mutex<Vec<i32>>,
}

impl SampleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, value: i32) {
        self.lock().push(value);
    }

    /// Copy of every reading collected so far, in arrival order.
    pub fn snapshot(&self) -> Vec<i32> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a Vec<i32> half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<i32>> {
        self.readings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
