//! Periodic fan-out of live timer state.
//!
//! [`TimerBroadcaster`] samples [`TimerQuery::global_snapshot`] on a fixed
//! period and publishes the result on a `tokio::sync::broadcast` channel.
//! Subscribers pick out their own user's slice with
//! [`GlobalSnapshot::timers_for`]. A failed sample is logged and the tick is
//! skipped; the loop keeps running.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::domain::ports::TimerQuery;
use crate::domain::{GlobalSnapshot, TimerError};

/// Default number of snapshots a slow subscriber may fall behind by.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 16;

/// Publishes global timer snapshots to every subscriber.
#[derive(Debug, Clone)]
pub struct TimerBroadcaster {
    sender: broadcast::Sender<Arc<GlobalSnapshot>>,
}

impl Default for TimerBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST_CAPACITY)
    }
}

impl TimerBroadcaster {
    /// Create a broadcaster whose channel buffers `capacity` snapshots.
    ///
    /// A zero capacity is bumped to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<GlobalSnapshot>> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Sample `query` once and publish the snapshot.
    ///
    /// Returns how many subscribers the snapshot reached; having none is not
    /// an error.
    pub async fn tick(&self, query: &dyn TimerQuery) -> Result<usize, TimerError> {
        let snapshot = query.global_snapshot().await?;
        // `send` only fails when nobody is subscribed.
        Ok(self.sender.send(Arc::new(snapshot)).unwrap_or(0))
    }

    /// Run [`Self::tick`] every `period` on the current Tokio runtime.
    ///
    /// Ticks that fall behind are skipped rather than bunched up. The task
    /// runs until aborted.
    pub fn spawn(&self, query: Arc<dyn TimerQuery>, period: Duration) -> JoinHandle<()> {
        let broadcaster = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match broadcaster.tick(query.as_ref()).await {
                    Ok(reached) => debug!(subscribers = reached, "timer snapshot broadcast"),
                    Err(error) => {
                        warn!(error = %error, code = error.code(), "skipping timer broadcast tick");
                    }
                }
            }
        })
    }
}
