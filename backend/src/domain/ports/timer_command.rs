//! Driving port for timer lifecycle mutations.

use async_trait::async_trait;

use crate::domain::{CallerContext, EpochMillis, TimerError, TimerId, TimerName, TimerView};

/// Start a timer under `timer_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTimerRequest {
    pub timer_name: TimerName,
}

/// Identifier and start instant of a freshly started timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartTimerResponse {
    pub timer_id: TimerId,
    pub started_at: EpochMillis,
}

/// Stop the timer `timer_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTimerRequest {
    pub timer_id: TimerId,
}

/// Outcome of a stop request.
///
/// `already_stopped` is set when the timer had been stopped earlier; the
/// frozen value is returned untouched in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTimerResponse {
    pub timer: TimerView,
    pub already_stopped: bool,
}

/// Use-cases that change timer state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimerCommand: Send + Sync {
    /// Start a running timer for the caller.
    async fn start_timer(
        &self,
        caller: &CallerContext,
        request: StartTimerRequest,
    ) -> Result<StartTimerResponse, TimerError>;

    /// Stop one of the caller's timers.
    async fn stop_timer(
        &self,
        caller: &CallerContext,
        request: StopTimerRequest,
    ) -> Result<StopTimerResponse, TimerError>;
}
