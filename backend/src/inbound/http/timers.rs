//! Timer lifecycle handlers.
//!
//! ```text
//! POST /api/v1/timers {"timerName":"build"}
//! POST /api/v1/timers/{timerId}/stop
//! GET  /api/v1/timers
//! ```
//!
//! Every route resolves the caller from the session cookie first, so an
//! anonymous request never reaches the timer ports.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{StartTimerRequest, StopTimerRequest};
use crate::domain::{Error, TimerId, TimerName, TimerValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::timer_error;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::{TimerViewPayload, timer_payloads};

/// Request body for `POST /api/v1/timers`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartTimerBody {
    #[schema(example = "build")]
    pub timer_name: String,
}

/// Response body for a started timer.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartTimerResponseBody {
    pub timer_id: String,
    /// Start instant in milliseconds since the UNIX epoch.
    pub started_at: i64,
}

/// Response body for a stop request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopTimerResponseBody {
    pub timer: TimerViewPayload,
    /// Set when the timer had already been stopped; the frozen value is
    /// returned unchanged.
    pub already_stopped: bool,
}

pub(crate) fn map_timer_name_error(err: TimerValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "timerName", "code": "invalid_timer_name" }))
}

pub(crate) fn parse_timer_id(raw: &str) -> Result<TimerId, Error> {
    raw.parse().map_err(|err: TimerValidationError| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "timerId", "code": "invalid_timer_id" }))
    })
}

/// Start a named timer for the logged-in user.
#[utoipa::path(
    post,
    path = "/api/v1/timers",
    request_body = StartTimerBody,
    responses(
        (status = 201, description = "Timer started", body = StartTimerResponseBody),
        (status = 400, description = "Invalid timer name", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 409, description = "Timer with this name already running", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["timers"],
    operation_id = "startTimer"
)]
#[post("/timers")]
pub async fn start_timer(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StartTimerBody>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let timer_name = TimerName::new(&payload.timer_name).map_err(map_timer_name_error)?;

    let started = state
        .timers
        .start_timer(&caller, StartTimerRequest { timer_name })
        .await
        .map_err(timer_error)?;
    Ok(HttpResponse::Created().json(StartTimerResponseBody {
        timer_id: started.timer_id.to_string(),
        started_at: started.started_at.as_i64(),
    }))
}

/// Stop one of the logged-in user's timers.
#[utoipa::path(
    post,
    path = "/api/v1/timers/{timer_id}/stop",
    params(("timer_id" = String, Path, description = "Timer identifier")),
    responses(
        (status = 200, description = "Timer stopped", body = StopTimerResponseBody),
        (status = 400, description = "Malformed timer id", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Timer not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["timers"],
    operation_id = "stopTimer"
)]
#[post("/timers/{timer_id}/stop")]
pub async fn stop_timer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<StopTimerResponseBody>> {
    let caller = session.caller()?;
    let timer_id = parse_timer_id(&path)?;

    let stopped = state
        .timers
        .stop_timer(&caller, StopTimerRequest { timer_id })
        .await
        .map_err(timer_error)?;
    Ok(web::Json(StopTimerResponseBody {
        timer: TimerViewPayload::from(&stopped.timer),
        already_stopped: stopped.already_stopped,
    }))
}

/// List the logged-in user's timers with live durations.
#[utoipa::path(
    get,
    path = "/api/v1/timers",
    responses(
        (status = 200, description = "Timers in start order", body = [TimerViewPayload]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No timers found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["timers"],
    operation_id = "listTimers"
)]
#[get("/timers")]
pub async fn list_timers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TimerViewPayload>>> {
    let caller = session.caller()?;
    let views = state
        .timers_query
        .snapshot(&caller)
        .await
        .map_err(timer_error)?;
    Ok(web::Json(timer_payloads(&views)))
}

#[cfg(test)]
#[path = "timers_tests.rs"]
mod tests;
