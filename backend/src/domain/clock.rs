//! Millisecond readings from the injected [`Clock`].
//!
//! Timer arithmetic works on a single integer clock: milliseconds since the
//! UNIX epoch. No timezone handling happens past this point.

use chrono::{DateTime, Utc};
use mockable::Clock;

/// Instant expressed as milliseconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpochMillis(i64);

impl EpochMillis {
    /// Wrap a raw millisecond count.
    #[must_use]
    pub const fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// Sample `clock` once.
    ///
    /// # Examples
    /// ```
    /// use mockable::DefaultClock;
    /// use timers_backend::domain::EpochMillis;
    ///
    /// let now = EpochMillis::now(&DefaultClock);
    /// assert!(now.as_i64() > 0);
    /// ```
    #[must_use]
    pub fn now(clock: &dyn Clock) -> Self {
        Self::from(clock.utc())
    }

    /// Raw millisecond count.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Signed distance from `earlier` to `self`, saturating at the `i64` range.
    #[must_use]
    pub const fn millis_since(self, earlier: Self) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl From<DateTime<Utc>> for EpochMillis {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.timestamp_millis())
    }
}
