//! Elapsed durations and their `HH:MM:SS` rendering.

use std::fmt;

use crate::domain::EpochMillis;

const MILLIS_PER_SECOND: u64 = 1_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// Raised when a duration would be negative.
///
/// Durations come from `now - start` against a single clock, so this only
/// fires when the clock moves backwards past a timer's start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    /// The computed duration was below zero.
    #[error("duration must not be negative (got {millis} ms)")]
    Negative { millis: i64 },
}

/// Non-negative elapsed time with millisecond precision.
///
/// `Display` renders `HH:MM:SS`: two zero-padded digits per component, hours
/// unbounded, sub-second remainder truncated.
///
/// # Examples
/// ```
/// use timers_backend::domain::ElapsedTime;
///
/// let elapsed = ElapsedTime::from_millis(3_661_000).unwrap();
/// assert_eq!(elapsed.to_string(), "01:01:01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ElapsedTime(u64);

impl ElapsedTime {
    /// Zero elapsed time.
    pub const ZERO: Self = Self(0);

    /// Validate a signed millisecond count.
    pub fn from_millis(millis: i64) -> Result<Self, DurationError> {
        u64::try_from(millis)
            .map(Self)
            .map_err(|_| DurationError::Negative { millis })
    }

    /// Time from `start` to `end`.
    pub fn between(start: EpochMillis, end: EpochMillis) -> Result<Self, DurationError> {
        Self::from_millis(end.millis_since(start))
    }

    /// Millisecond count.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_seconds = self.0 / MILLIS_PER_SECOND;
        let hours = total_seconds / SECONDS_PER_HOUR;
        let minutes = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        let seconds = total_seconds % SECONDS_PER_MINUTE;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Render a signed millisecond count as `HH:MM:SS`.
///
/// # Errors
/// Returns [`DurationError::Negative`] for negative input.
///
/// # Examples
/// ```
/// use timers_backend::domain::format_duration;
///
/// assert_eq!(format_duration(5_000).unwrap(), "00:00:05");
/// assert!(format_duration(-1).is_err());
/// ```
pub fn format_duration(millis: i64) -> Result<String, DurationError> {
    ElapsedTime::from_millis(millis).map(|elapsed| elapsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "00:00:00")]
    #[case(999, "00:00:00")]
    #[case(1_000, "00:00:01")]
    #[case(59_999, "00:00:59")]
    #[case(60_000, "00:01:00")]
    #[case(3_661_000, "01:01:01")]
    #[case(35_999_999, "09:59:59")]
    #[case(36_000_000, "10:00:00")]
    #[case(360_000_000, "100:00:00")]
    fn formats_hours_minutes_seconds(#[case] millis: i64, #[case] expected: &str) {
        assert_eq!(format_duration(millis).expect("non-negative"), expected);
    }

    #[rstest]
    #[case(-1)]
    #[case(i64::MIN)]
    fn rejects_negative_durations(#[case] millis: i64) {
        assert_eq!(
            format_duration(millis),
            Err(DurationError::Negative { millis })
        );
    }

    #[test]
    fn between_measures_forward_distance() {
        let elapsed = ElapsedTime::between(EpochMillis::new(1_000), EpochMillis::new(6_000))
            .expect("forward distance");
        assert_eq!(elapsed.as_millis(), 5_000);
    }

    #[test]
    fn between_rejects_clock_moving_backwards() {
        let result = ElapsedTime::between(EpochMillis::new(6_000), EpochMillis::new(1_000));
        assert_eq!(result, Err(DurationError::Negative { millis: -5_000 }));
    }
}
