//! Per-connection WebSocket handler.
//!
//! Keeps WebSocket framing and heartbeats at the edge while deferring timer
//! behaviour to the injected domain ports. The public WebSocket contract
//! pings every 5s and considers a connection idle after 10s without client
//! traffic. Tests shorten these intervals to speed up feedback.
//!
//! Besides answering requests, each connection relays broadcaster snapshots
//! as `timerUpdate` frames carrying only the connected user's timers (an
//! empty list when the user has none).

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{StartTimerRequest, StopTimerRequest, TimerCommand, TimerQuery};
use crate::domain::{CallerContext, Error, GlobalSnapshot, TimerName, TraceId};
use crate::inbound::http::error::timer_error;
use crate::inbound::http::timers::{map_timer_name_error, parse_timer_id};
use crate::inbound::ws::messages::{ClientRequest, ServerMessage};
use crate::inbound::{TimerViewPayload, timer_payloads};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(500);

/// Ports a connection drives.
pub(super) struct WsPorts {
    pub timers: Arc<dyn TimerCommand>,
    pub timers_query: Arc<dyn TimerQuery>,
}

pub(super) async fn handle_ws_session(
    ports: WsPorts,
    caller: CallerContext,
    updates: broadcast::Receiver<Arc<GlobalSnapshot>>,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(ports, caller)
        .run(session, stream, updates)
        .await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
    BroadcasterGone,
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    ports: WsPorts,
    caller: CallerContext,
}

impl WsSession {
    fn new(ports: WsPorts, caller: CallerContext) -> Self {
        Self { ports, caller }
    }

    async fn run(
        &self,
        mut session: Session,
        mut stream: MessageStream,
        mut updates: broadcast::Receiver<Arc<GlobalSnapshot>>,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                update = updates.recv() => {
                    self.handle_update(&mut session, update).await
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                let close_action = self.close_action_for(&error);
                self.close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_update(
        &self,
        session: &mut Session,
        update: Result<Arc<GlobalSnapshot>, RecvError>,
    ) -> Result<(), SessionError> {
        match update {
            Ok(snapshot) => self
                .push_snapshot(session, &snapshot)
                .await
                .map_err(SessionError::Network),
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "WebSocket fell behind timer broadcasts");
                Ok(())
            }
            Err(RecvError::Closed) => Err(SessionError::BroadcasterGone),
        }
    }

    async fn push_snapshot(
        &self,
        session: &mut Session,
        snapshot: &GlobalSnapshot,
    ) -> Result<(), Closed> {
        let update = ServerMessage::TimerUpdate {
            taken_at: snapshot.taken_at().as_i64(),
            timers: timer_payloads(snapshot.timers_for(self.caller.user_id())),
        };
        self.send_json(session, &update).await
    }

    async fn handle_text_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        let request = match serde_json::from_str::<ClientRequest>(text) {
            Ok(request) => request,
            Err(error) => {
                warn!(error = %error, "Rejected malformed WebSocket payload");
                return Err(SessionError::InvalidPayload);
            }
        };

        let trace_id = request
            .trace_id()
            .map_or_else(TraceId::generate, TraceId::from_uuid);
        let reply = TraceId::scope(trace_id, self.dispatch(*trace_id.as_uuid(), request)).await;
        self.send_json(session, &reply)
            .await
            .map_err(SessionError::Network)
    }

    async fn dispatch(&self, trace_id: Uuid, request: ClientRequest) -> ServerMessage {
        let outcome = match request {
            ClientRequest::StartTimer { timer_name, .. } => {
                self.start_timer(trace_id, &timer_name).await
            }
            ClientRequest::StopTimer { timer_id, .. } => self.stop_timer(trace_id, &timer_id).await,
            ClientRequest::GetStatus { .. } => self.status(trace_id).await,
        };
        outcome.unwrap_or_else(|error| {
            debug!(%trace_id, code = ?error.code(), "WebSocket request failed");
            ServerMessage::error(trace_id, &error)
        })
    }

    async fn start_timer(&self, trace_id: Uuid, raw_name: &str) -> Result<ServerMessage, Error> {
        let timer_name = TimerName::new(raw_name).map_err(map_timer_name_error)?;
        let started = self
            .ports
            .timers
            .start_timer(&self.caller, StartTimerRequest { timer_name })
            .await
            .map_err(timer_error)?;
        Ok(ServerMessage::TimerStarted {
            trace_id,
            timer_id: started.timer_id.to_string(),
            started_at: started.started_at.as_i64(),
        })
    }

    async fn stop_timer(&self, trace_id: Uuid, raw_id: &str) -> Result<ServerMessage, Error> {
        let timer_id = parse_timer_id(raw_id)?;
        let stopped = self
            .ports
            .timers
            .stop_timer(&self.caller, StopTimerRequest { timer_id })
            .await
            .map_err(timer_error)?;
        Ok(ServerMessage::TimerStopped {
            trace_id,
            timer: TimerViewPayload::from(&stopped.timer),
            already_stopped: stopped.already_stopped,
        })
    }

    async fn status(&self, trace_id: Uuid) -> Result<ServerMessage, Error> {
        let views = self
            .ports
            .timers_query
            .snapshot(&self.caller)
            .await
            .map_err(timer_error)?;
        Ok(ServerMessage::Status {
            trace_id,
            timers: timer_payloads(&views),
        })
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        session: &mut Session,
        payload: &T,
    ) -> Result<(), Closed> {
        match serde_json::to_string(payload) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                warn!(error = %error, "Failed to serialize WebSocket payload");
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::BroadcasterGone => {
                debug!("Timer broadcaster stopped; closing connection");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("invalid payload".to_owned()),
            })),
            SessionError::BroadcasterGone => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Away,
                description: Some("server shutting down".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
