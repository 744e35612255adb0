//! Shared WebSocket adapter state.
//!
//! WebSocket entry points depend on domain ports instead of constructing
//! domain services directly, which keeps the connection loop testable with
//! in-memory adapters.

use std::sync::Arc;

use crate::domain::TimerBroadcaster;
use crate::domain::ports::{TimerCommand, TimerQuery};
use crate::inbound::ws::OriginPolicy;

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub timers: Arc<dyn TimerCommand>,
    pub timers_query: Arc<dyn TimerQuery>,
    pub broadcaster: TimerBroadcaster,
    pub origins: OriginPolicy,
}

impl WsState {
    /// Construct state from explicit port implementations.
    pub fn new(
        timers: Arc<dyn TimerCommand>,
        timers_query: Arc<dyn TimerQuery>,
        broadcaster: TimerBroadcaster,
        origins: OriginPolicy,
    ) -> Self {
        Self {
            timers,
            timers_query,
            broadcaster,
            origins,
        }
    }
}
