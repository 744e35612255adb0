//! Driving port for reading live timer state.

use async_trait::async_trait;

use crate::domain::{CallerContext, GlobalSnapshot, TimerError, TimerView};

/// Read-side use-cases over timers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimerQuery: Send + Sync {
    /// The caller's timers against one clock sample, in storage order.
    ///
    /// Fails with [`TimerError::NoTimersFound`] when the caller owns none.
    async fn snapshot(&self, caller: &CallerContext) -> Result<Vec<TimerView>, TimerError>;

    /// Every user's timers against one shared clock sample.
    async fn global_snapshot(&self) -> Result<GlobalSnapshot, TimerError>;
}
