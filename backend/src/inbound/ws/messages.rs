//! Wire-level message definitions for the WebSocket adapter.
//!
//! Every frame is a JSON object tagged by `type`. Requests may carry a
//! client-chosen `traceId`; the matching reply echoes it back.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{Error, ErrorCode};
use crate::inbound::TimerViewPayload;

/// Requests a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientRequest {
    StartTimer {
        #[serde(default)]
        trace_id: Option<Uuid>,
        timer_name: String,
    },
    StopTimer {
        #[serde(default)]
        trace_id: Option<Uuid>,
        timer_id: String,
    },
    GetStatus {
        #[serde(default)]
        trace_id: Option<Uuid>,
    },
}

impl ClientRequest {
    /// Correlation id supplied by the client, if any.
    pub fn trace_id(&self) -> Option<Uuid> {
        match self {
            Self::StartTimer { trace_id, .. }
            | Self::StopTimer { trace_id, .. }
            | Self::GetStatus { trace_id } => *trace_id,
        }
    }
}

/// Frames the server sends.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Acknowledges `startTimer`.
    TimerStarted {
        trace_id: Uuid,
        timer_id: String,
        started_at: i64,
    },
    /// Acknowledges `stopTimer`.
    TimerStopped {
        trace_id: Uuid,
        timer: TimerViewPayload,
        already_stopped: bool,
    },
    /// Answers `getStatus`.
    Status {
        trace_id: Uuid,
        timers: Vec<TimerViewPayload>,
    },
    /// Periodic push of the connected user's timers.
    TimerUpdate {
        taken_at: i64,
        timers: Vec<TimerViewPayload>,
    },
    /// A request failed; the connection stays open.
    Error {
        trace_id: Uuid,
        code: ErrorCode,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
}

impl ServerMessage {
    /// Error reply for `trace_id`, hiding internal failure details.
    pub fn error(trace_id: Uuid, error: &Error) -> Self {
        if error.code() == ErrorCode::InternalError {
            return Self::Error {
                trace_id,
                code: ErrorCode::InternalError,
                message: "Internal server error".to_owned(),
                details: None,
            };
        }
        Self::Error {
            trace_id,
            code: error.code(),
            message: error.message().to_owned(),
            details: error.details().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TimerError, TimerId};
    use insta::assert_json_snapshot;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(
        json!({ "type": "startTimer", "timerName": "build" }),
        ClientRequest::StartTimer { trace_id: None, timer_name: "build".into() }
    )]
    #[case(
        json!({ "type": "stopTimer", "traceId": Uuid::nil(), "timerId": "abc" }),
        ClientRequest::StopTimer { trace_id: Some(Uuid::nil()), timer_id: "abc".into() }
    )]
    #[case(
        json!({ "type": "getStatus" }),
        ClientRequest::GetStatus { trace_id: None }
    )]
    fn parses_client_requests(#[case] raw: Value, #[case] expected: ClientRequest) {
        let parsed: ClientRequest = serde_json::from_value(raw).expect("request parses");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn rejects_unknown_request_types() {
        let raw = json!({ "type": "deleteTimer", "timerId": "abc" });
        assert!(serde_json::from_value::<ClientRequest>(raw).is_err());
    }

    #[test]
    fn serialises_timer_stopped_acknowledgement() {
        let message = ServerMessage::TimerStopped {
            trace_id: Uuid::nil(),
            timer: TimerViewPayload {
                id: "9b2f0c3e-8a41-4d52-9a53-6f1f0c9d2b11".into(),
                owner_user_id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".into(),
                task_name: "build".into(),
                elapsed: "00:00:05".into(),
                stopped: Some("00:00:05".into()),
            },
            already_stopped: false,
        };
        assert_json_snapshot!(message, @r#"
        {
          "type": "timerStopped",
          "traceId": "00000000-0000-0000-0000-000000000000",
          "timer": {
            "id": "9b2f0c3e-8a41-4d52-9a53-6f1f0c9d2b11",
            "ownerUserId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "taskName": "build",
            "elapsed": "00:00:05",
            "stopped": "00:00:05"
          },
          "alreadyStopped": false
        }
        "#);
    }

    #[test]
    fn error_replies_keep_domain_codes() {
        let id = TimerId::random();
        let error = Error::from(TimerError::TimerNotFound { id });
        let value = serde_json::to_value(ServerMessage::error(Uuid::nil(), &error))
            .expect("serialise");
        assert_eq!(value["type"], "error");
        assert_eq!(value["code"], "not_found");
        assert_eq!(value["details"]["code"], "timer_not_found");
        assert_eq!(value["details"]["timerId"], id.to_string());
    }

    #[test]
    fn error_replies_redact_internal_failures() {
        let error = Error::from(TimerError::storage_unavailable("connection refused"));
        let value = serde_json::to_value(ServerMessage::error(Uuid::nil(), &error))
            .expect("serialise");
        assert_eq!(value["code"], "internal_error");
        assert_eq!(value["message"], "Internal server error");
        assert!(value.get("details").is_none());
    }
}
