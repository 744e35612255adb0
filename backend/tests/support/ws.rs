//! WebSocket-focused test helpers.
//!
//! Integration tests under `backend/tests/` compile as separate crates, so
//! sharing small WebSocket setup helpers helps avoid copy/paste drift.

use std::sync::Arc;

use mockable::DefaultClock;
use timers_backend::domain::{TimerBroadcaster, TimerService};
use timers_backend::inbound::http::state::HttpState;
use timers_backend::inbound::ws::OriginPolicy;
use timers_backend::inbound::ws::state::WsState;
use timers_backend::outbound::persistence::{InMemoryTimerRepository, InMemoryUserDirectory};

/// HTTP and WebSocket state sharing one set of in-memory adapters.
///
/// WebSocket origins are restricted to `allowed_host`.
pub fn shared_states(allowed_host: &str) -> (HttpState, WsState) {
    let users = Arc::new(InMemoryUserDirectory::with_cost(timers_backend::outbound::persistence::MIN_COST));
    let timers = Arc::new(TimerService::new(
        Arc::new(InMemoryTimerRepository::new()),
        Arc::new(DefaultClock),
    ));
    let http = HttpState::new(users.clone(), users, timers.clone(), timers.clone());
    let ws = WsState::new(
        timers.clone(),
        timers,
        TimerBroadcaster::default(),
        OriginPolicy::new(allowed_host),
    );
    (http, ws)
}
