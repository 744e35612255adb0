//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/` (via the
//! `test-support` feature).

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock whose current instant only moves when a test says so.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Start at `millis` since the UNIX epoch.
    pub fn at_millis(millis: i64) -> Self {
        match Utc.timestamp_millis_opt(millis).single() {
            Some(now) => Self::new(now),
            None => panic!("timestamp out of range: {millis}"),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}"),
        };
        *self.lock_clock() += delta;
    }

    pub fn advance_millis(&self, millis: i64) {
        *self.lock_clock() += TimeDelta::milliseconds(millis);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
