//! Correlation identifier following one request or WebSocket message.
//!
//! The active identifier lives in tokio task-local storage. It is not
//! inherited by spawned tasks, so wrap spawned work in [`TraceId::scope`]
//! when the correlation must survive the hop.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static TRACE_ID: TraceId;
}

/// Request-scoped trace identifier.
///
/// # Examples
/// ```
/// use timers_backend::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
///     .parse()
///     .expect("valid UUID");
/// let observed = TraceId::scope(trace_id, async { TraceId::current() }).await;
/// assert_eq!(observed, Some(trace_id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one supplied by a WebSocket client.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Identifier in scope for the current task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Drive `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
