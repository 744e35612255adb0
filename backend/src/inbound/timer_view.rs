//! Wire shape of a timer shared by the HTTP and WebSocket adapters.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::TimerView;

/// One timer as clients see it.
///
/// Durations are rendered as `HH:MM:SS`; `stopped` is omitted while the timer
/// is running.
///
/// # Examples
/// ```
/// use timers_backend::domain::{EpochMillis, Timer, TimerName, UserId};
/// use timers_backend::inbound::TimerViewPayload;
///
/// let timer = Timer::start(UserId::random(), TimerName::new("build")?, EpochMillis::new(0));
/// let payload = TimerViewPayload::from(&timer.view_at(EpochMillis::new(3_661_000))?);
/// assert_eq!(payload.elapsed, "01:01:01");
/// assert!(payload.stopped.is_none());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimerViewPayload {
    #[schema(example = "9b2f0c3e-8a41-4d52-9a53-6f1f0c9d2b11")]
    pub id: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub owner_user_id: String,
    #[schema(example = "build")]
    pub task_name: String,
    #[schema(example = "00:00:05")]
    pub elapsed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "00:00:05")]
    pub stopped: Option<String>,
}

impl From<&TimerView> for TimerViewPayload {
    fn from(view: &TimerView) -> Self {
        Self {
            id: view.id.to_string(),
            owner_user_id: view.owner.to_string(),
            task_name: view.name.to_string(),
            elapsed: view.elapsed.to_string(),
            stopped: view.stopped.map(|stopped| stopped.to_string()),
        }
    }
}

/// Convert a slice of views, keeping their order.
pub fn timer_payloads(views: &[TimerView]) -> Vec<TimerViewPayload> {
    views.iter().map(TimerViewPayload::from).collect()
}
