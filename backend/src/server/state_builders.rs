//! Builders wiring domain services and in-memory adapters into adapter state.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use timers_backend::domain::ports::{TimerCommand, TimerQuery};
use timers_backend::domain::{TimerBroadcaster, TimerService};
use timers_backend::inbound::http::state::HttpState;
use timers_backend::inbound::ws::state::WsState;
use timers_backend::outbound::persistence::{InMemoryTimerRepository, InMemoryUserDirectory};

use super::ServerConfig;

/// Adapter state plus the handles the bootstrap code keeps.
pub(crate) struct AppStates {
    pub http_state: web::Data<HttpState>,
    pub ws_state: web::Data<WsState>,
    pub timers_query: Arc<dyn TimerQuery>,
    pub broadcaster: TimerBroadcaster,
}

/// Build HTTP and WebSocket state over one set of in-memory adapters.
///
/// Both transports share the same timer service, so a timer started over
/// REST shows up in the next WebSocket push.
pub(crate) fn build_states(config: &ServerConfig, clock: Arc<dyn Clock>) -> AppStates {
    let users = Arc::new(InMemoryUserDirectory::new());
    let timer_service = Arc::new(TimerService::new(
        Arc::new(InMemoryTimerRepository::new()),
        clock,
    ));
    let timers: Arc<dyn TimerCommand> = timer_service.clone();
    let timers_query: Arc<dyn TimerQuery> = timer_service;
    let broadcaster = TimerBroadcaster::default();

    let http_state = web::Data::new(HttpState::new(
        users.clone(),
        users,
        timers.clone(),
        timers_query.clone(),
    ));
    let ws_state = web::Data::new(WsState::new(
        timers,
        timers_query.clone(),
        broadcaster.clone(),
        config.origins.clone(),
    ));

    AppStates {
        http_state,
        ws_state,
        timers_query,
        broadcaster,
    }
}
