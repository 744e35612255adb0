//! Typed failures of the timer lifecycle engine.

use serde_json::json;

use crate::domain::{DurationError, Error, TimerId, TimerName};

/// Errors returned by timer commands and queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// The caller already has a running timer with this name.
    #[error("a timer named \"{name}\" is already running")]
    DuplicateRunningTimer { name: TimerName },
    /// No timer with this id exists for the caller.
    #[error("timer {id} not found")]
    TimerNotFound { id: TimerId },
    /// The caller owns no timers at all.
    #[error("no timers found")]
    NoTimersFound,
    /// A duration came out negative.
    #[error(transparent)]
    InvalidDuration(#[from] DurationError),
    /// The timer repository could not serve the request.
    #[error("timer storage unavailable: {message}")]
    StorageUnavailable { message: String },
    /// No resolved identity accompanied the call.
    #[error("authentication required")]
    Unauthenticated,
}

impl TimerError {
    /// Construct [`TimerError::StorageUnavailable`].
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Stable machine-readable code carried in `details.code`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateRunningTimer { .. } => "duplicate_running_timer",
            Self::TimerNotFound { .. } => "timer_not_found",
            Self::NoTimersFound => "no_timers_found",
            Self::InvalidDuration(_) => "invalid_duration",
            Self::StorageUnavailable { .. } => "storage_unavailable",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

impl From<TimerError> for Error {
    fn from(value: TimerError) -> Self {
        let code = value.code();
        let message = value.to_string();
        match value {
            TimerError::DuplicateRunningTimer { name } => Error::conflict(message)
                .with_details(json!({ "code": code, "timerName": name.as_ref() })),
            TimerError::TimerNotFound { id } => Error::not_found(message)
                .with_details(json!({ "code": code, "timerId": id.to_string() })),
            TimerError::NoTimersFound => {
                Error::not_found(message).with_details(json!({ "code": code }))
            }
            TimerError::InvalidDuration(_) | TimerError::StorageUnavailable { .. } => {
                Error::internal(message).with_details(json!({ "code": code }))
            }
            TimerError::Unauthenticated => {
                Error::unauthorized(message).with_details(json!({ "code": code }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::Value;
    use uuid::Uuid;

    fn name() -> TimerName {
        TimerName::new("build").expect("valid name")
    }

    #[rstest]
    #[case(TimerError::DuplicateRunningTimer { name: name() }, ErrorCode::Conflict)]
    #[case(
        TimerError::TimerNotFound { id: TimerId::from_uuid(Uuid::nil()) },
        ErrorCode::NotFound
    )]
    #[case(TimerError::NoTimersFound, ErrorCode::NotFound)]
    #[case(
        TimerError::InvalidDuration(DurationError::Negative { millis: -1 }),
        ErrorCode::InternalError
    )]
    #[case(TimerError::storage_unavailable("down"), ErrorCode::InternalError)]
    #[case(TimerError::Unauthenticated, ErrorCode::Unauthorized)]
    fn maps_to_transport_codes(#[case] error: TimerError, #[case] expected: ErrorCode) {
        let detail_code = error.code();
        let mapped = Error::from(error);
        assert_eq!(mapped.code(), expected);
        assert_eq!(
            mapped
                .details()
                .and_then(|details| details.get("code"))
                .and_then(Value::as_str),
            Some(detail_code)
        );
    }

    #[test]
    fn duplicate_details_name_the_timer() {
        let mapped = Error::from(TimerError::DuplicateRunningTimer { name: name() });
        assert_eq!(
            mapped
                .details()
                .and_then(|details| details.get("timerName"))
                .and_then(Value::as_str),
            Some("build")
        );
    }
}
