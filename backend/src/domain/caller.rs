//! Resolved identity handed to every timer operation.

use crate::domain::{TimerError, UserId};

/// The authenticated user on whose behalf a timer operation runs.
///
/// Transports build this from a verified credential; the timer core never
/// looks identity up on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    user_id: UserId,
}

impl CallerContext {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Turn an optional session identity into a caller.
    ///
    /// # Errors
    /// [`TimerError::Unauthenticated`] when no identity was resolved.
    ///
    /// # Examples
    /// ```
    /// use timers_backend::domain::{CallerContext, TimerError, UserId};
    ///
    /// assert_eq!(CallerContext::require(None), Err(TimerError::Unauthenticated));
    /// let user = UserId::random();
    /// let caller = CallerContext::require(Some(user.clone())).unwrap();
    /// assert_eq!(caller.user_id(), &user);
    /// ```
    pub fn require(user_id: Option<UserId>) -> Result<Self, TimerError> {
        user_id.map(Self::new).ok_or(TimerError::Unauthenticated)
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}
