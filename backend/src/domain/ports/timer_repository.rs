//! Port for timer persistence scoped by owner and name.

use async_trait::async_trait;

use crate::domain::{ElapsedTime, Timer, TimerId, TimerName, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by timer repository adapters.
    pub enum TimerRepositoryError {
        /// Storage could not be reached.
        Connection { message: String } =>
            "timer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "timer repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } =>
            "timer repository conflict: {message}",
    }
}

/// Criteria used by [`TimerRepository::find_one`] and
/// [`TimerRepository::find_all`]. Unset criteria match everything.
///
/// # Examples
/// ```
/// use timers_backend::domain::ports::TimerFilter;
/// use timers_backend::domain::{TimerName, UserId};
///
/// let filter = TimerFilter::owned_by(UserId::random())
///     .named(TimerName::new("build").unwrap())
///     .running();
/// assert!(filter.is_running_only());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerFilter {
    owner: Option<UserId>,
    name: Option<TimerName>,
    running_only: bool,
}

impl TimerFilter {
    /// Match every timer.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Match timers owned by `owner`.
    #[must_use]
    pub fn owned_by(owner: UserId) -> Self {
        Self {
            owner: Some(owner),
            ..Self::default()
        }
    }

    /// Restrict to timers named `name`.
    #[must_use]
    pub fn named(mut self, name: TimerName) -> Self {
        self.name = Some(name);
        self
    }

    /// Restrict to running timers.
    #[must_use]
    pub fn running(mut self) -> Self {
        self.running_only = true;
        self
    }

    pub fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }

    pub fn name(&self) -> Option<&TimerName> {
        self.name.as_ref()
    }

    pub fn is_running_only(&self) -> bool {
        self.running_only
    }

    /// Whether `timer` satisfies every set criterion.
    pub fn matches(&self, timer: &Timer) -> bool {
        self.owner.as_ref().is_none_or(|owner| timer.owner() == owner)
            && self.name.as_ref().is_none_or(|name| timer.name() == name)
            && (!self.running_only || timer.is_running())
    }
}

/// Mutation applied by [`TimerRepository::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerUpdate {
    /// Freeze a running timer at `elapsed`. Ignored for stopped timers.
    Stop { elapsed: ElapsedTime },
}

impl TimerUpdate {
    pub fn stop(elapsed: ElapsedTime) -> Self {
        Self::Stop { elapsed }
    }

    /// Apply the mutation to an in-memory timer.
    pub fn apply(self, timer: &mut Timer) {
        match self {
            Self::Stop { elapsed } => {
                timer.freeze(elapsed);
            }
        }
    }
}

/// Port for storing and reading timers.
///
/// Adapters must preserve insertion order in `find_all` and must reject a
/// `create` that would give one user two running timers with the same name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimerRepository: Send + Sync {
    /// Persist a newly started timer.
    async fn create(&self, timer: &Timer) -> Result<(), TimerRepositoryError>;

    /// Find a timer by id regardless of owner.
    async fn find_by_id(&self, id: &TimerId) -> Result<Option<Timer>, TimerRepositoryError>;

    /// First timer matching `filter`.
    async fn find_one(&self, filter: &TimerFilter) -> Result<Option<Timer>, TimerRepositoryError>;

    /// Every timer matching `filter`, in insertion order.
    async fn find_all(&self, filter: &TimerFilter) -> Result<Vec<Timer>, TimerRepositoryError>;

    /// Apply `update` and return the stored result, or `None` for an unknown id.
    async fn update(
        &self,
        id: &TimerId,
        update: TimerUpdate,
    ) -> Result<Option<Timer>, TimerRepositoryError>;
}
