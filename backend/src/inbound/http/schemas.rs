//! OpenAPI shapes for the error envelope.
//!
//! `domain::Error` stays free of `utoipa`; these mirrors describe it for the
//! generated document. `details` is free-form JSON on the wire, but every
//! producer in this crate fills it from a closed set of codes, so the
//! document lists them in [`ErrorDetailCodeSchema`].

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "not_found")]
    NotFound,
    /// Includes a second running timer with the same name.
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Fine-grained reason carried in `details.code`.
///
/// Timer lifecycle failures use the codes from `TimerError::code`; payload
/// validation failures name the offending field alongside the code.
#[derive(ToSchema)]
pub enum ErrorDetailCodeSchema {
    #[schema(rename = "duplicate_running_timer")]
    DuplicateRunningTimer,
    #[schema(rename = "timer_not_found")]
    TimerNotFound,
    /// The caller has never started a timer.
    #[schema(rename = "no_timers_found")]
    NoTimersFound,
    #[schema(rename = "invalid_duration")]
    InvalidDuration,
    #[schema(rename = "storage_unavailable")]
    StorageUnavailable,
    #[schema(rename = "unauthenticated")]
    Unauthenticated,
    #[schema(rename = "invalid_timer_name")]
    InvalidTimerName,
    #[schema(rename = "invalid_timer_id")]
    InvalidTimerId,
    #[schema(rename = "empty_username")]
    EmptyUsername,
    #[schema(rename = "empty_password")]
    EmptyPassword,
    #[schema(rename = "password_too_long")]
    PasswordTooLong,
    #[schema(rename = "invalid_display_name")]
    InvalidDisplayName,
}

/// Structured `details` of an error response.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorDetailsSchema {
    code: ErrorDetailCodeSchema,
    /// Request field that failed validation.
    #[schema(example = "timerName")]
    field: Option<String>,
    /// Timer the failure refers to.
    #[schema(rename = "timerId", example = "0f8fad5b-d9cb-469f-a165-70867728950e")]
    timer_id: Option<String>,
    /// Name of the timer already running.
    #[schema(rename = "timerName", example = "build")]
    timer_name: Option<String>,
    /// Limit that was exceeded, such as the password byte limit.
    #[schema(example = 72)]
    max: Option<u32>,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    #[schema(example = "timer \"build\" is already running")]
    message: String,
    /// Same value as the `trace-id` response header.
    #[schema(rename = "traceId", example = "9b2f0c3e-8a41-4d52-9a53-6f1f0c9d2b11")]
    trace_id: Option<String>,
    details: Option<ErrorDetailsSchema>,
}
