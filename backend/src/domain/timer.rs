//! Timer aggregate and the read models derived from it.
//!
//! A [`Timer`] is created running, is stopped at most once, and is never
//! deleted. Views are always computed against an explicit instant so one
//! snapshot can share a single clock sample across many timers.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::domain::{DurationError, ElapsedTime, EpochMillis, UserId};

/// Maximum number of characters in a timer name.
pub const TIMER_NAME_MAX: usize = 64;

/// Validation failures for timer identifiers and names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerValidationError {
    #[error("timer name must not be empty")]
    EmptyName,
    #[error("timer name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("timer id must be a valid UUID")]
    InvalidId,
}

/// Timer identifier assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(Uuid);

impl TimerId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TimerId {
    type Err = TimerValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| TimerValidationError::InvalidId)
    }
}

/// Task name a timer runs under. Trimmed and non-empty.
///
/// # Examples
/// ```
/// use timers_backend::domain::TimerName;
///
/// let name = TimerName::new("  build ").unwrap();
/// assert_eq!(name.as_ref(), "build");
/// assert!(TimerName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimerName(String);

impl TimerName {
    /// Validate and construct a timer name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, TimerValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TimerValidationError::EmptyName);
        }
        if trimmed.chars().count() > TIMER_NAME_MAX {
            return Err(TimerValidationError::NameTooLong {
                max: TIMER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TimerName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TimerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Lifecycle state of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Counting up from the start instant.
    Running,
    /// Frozen at `elapsed`; never changes again.
    Stopped { elapsed: ElapsedTime },
}

/// A named timer owned by one user for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    id: TimerId,
    owner: UserId,
    name: TimerName,
    started_at: EpochMillis,
    state: TimerState,
}

impl Timer {
    /// Create a running timer with a fresh identifier.
    #[must_use]
    pub fn start(owner: UserId, name: TimerName, started_at: EpochMillis) -> Self {
        Self::from_parts(TimerId::random(), owner, name, started_at, TimerState::Running)
    }

    /// Rehydrate a timer from stored components.
    #[must_use]
    pub fn from_parts(
        id: TimerId,
        owner: UserId,
        name: TimerName,
        started_at: EpochMillis,
        state: TimerState,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            started_at,
            state,
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn name(&self) -> &TimerName {
        &self.name
    }

    pub fn started_at(&self) -> EpochMillis {
        self.started_at
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running)
    }

    /// Elapsed time as of `now`: live while running, frozen once stopped.
    pub fn elapsed_at(&self, now: EpochMillis) -> Result<ElapsedTime, DurationError> {
        match self.state {
            TimerState::Running => ElapsedTime::between(self.started_at, now),
            TimerState::Stopped { elapsed } => Ok(elapsed),
        }
    }

    /// Freeze a running timer at `elapsed`.
    ///
    /// Returns `false` and leaves the timer untouched when it was already
    /// stopped.
    pub fn freeze(&mut self, elapsed: ElapsedTime) -> bool {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Stopped { elapsed };
                true
            }
            TimerState::Stopped { .. } => false,
        }
    }

    /// Read model of this timer as of `now`.
    pub fn view_at(&self, now: EpochMillis) -> Result<TimerView, DurationError> {
        let elapsed = self.elapsed_at(now)?;
        let stopped = match self.state {
            TimerState::Running => None,
            TimerState::Stopped { elapsed } => Some(elapsed),
        };
        Ok(TimerView {
            id: self.id,
            owner: self.owner.clone(),
            name: self.name.clone(),
            elapsed,
            stopped,
        })
    }
}

/// Point-in-time view of a timer.
///
/// For a stopped timer `elapsed` equals `stopped`; `stopped` is `None` while
/// the timer runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerView {
    pub id: TimerId,
    pub owner: UserId,
    pub name: TimerName,
    pub elapsed: ElapsedTime,
    pub stopped: Option<ElapsedTime>,
}

/// Every user's timer views computed against one shared instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSnapshot {
    taken_at: EpochMillis,
    timers: HashMap<UserId, Vec<TimerView>>,
}

impl GlobalSnapshot {
    /// Build a snapshot; users without timers should simply be absent.
    #[must_use]
    pub fn new(taken_at: EpochMillis, timers: HashMap<UserId, Vec<TimerView>>) -> Self {
        Self { taken_at, timers }
    }

    /// Instant every view in this snapshot was computed against.
    pub fn taken_at(&self) -> EpochMillis {
        self.taken_at
    }

    /// Views for `user`, empty when the user has no timers.
    pub fn timers_for(&self, user: &UserId) -> &[TimerView] {
        self.timers
            .get(user)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Users with at least one timer.
    pub fn users(&self) -> impl Iterator<Item = &UserId> {
        self.timers.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
