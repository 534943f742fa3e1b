//! Time source for the engine.
//!
//! The focus tracker's cooldown compares against "now"; tests swap in
//! [`FakeClock`] to drive it deterministically.

use std::time::Instant;

/// Monotonic time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant { Instant::now() }
}

/// Manually advanced clock.
#[cfg(test)]
#[derive(Debug)]
pub struct FakeClock {
    now: parking_lot::Mutex<Instant>,
}

#[cfg(test)]
impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: parking_lot::Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: std::time::Duration) { *self.now.lock() += by; }
}

#[cfg(test)]
impl Clock for FakeClock {
    fn now(&self) -> Instant { *self.now.lock() }
}
