//! Process-local `TimerRepository` adapter.
//!
//! Timers live in a `Vec` behind an `RwLock`, which keeps insertion order for
//! `find_all`. The store enforces running-name uniqueness itself so the
//! invariant holds even for callers that bypass the timer service.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{TimerFilter, TimerRepository, TimerRepositoryError, TimerUpdate};
use crate::domain::{Timer, TimerId};

fn poisoned<T>(_: PoisonError<T>) -> TimerRepositoryError {
    TimerRepositoryError::connection("timer store lock poisoned")
}

/// In-memory timer store.
#[derive(Debug, Default)]
pub struct InMemoryTimerRepository {
    timers: RwLock<Vec<Timer>>,
}

impl InMemoryTimerRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimerRepository for InMemoryTimerRepository {
    async fn create(&self, timer: &Timer) -> Result<(), TimerRepositoryError> {
        let mut timers = self.timers.write().map_err(poisoned)?;
        if timers.iter().any(|existing| existing.id() == timer.id()) {
            return Err(TimerRepositoryError::conflict(format!(
                "timer {} already exists",
                timer.id()
            )));
        }
        let running_twin = TimerFilter::owned_by(timer.owner().clone())
            .named(timer.name().clone())
            .running();
        if timer.is_running() && timers.iter().any(|existing| running_twin.matches(existing)) {
            return Err(TimerRepositoryError::conflict(format!(
                "timer \"{}\" is already running for user {}",
                timer.name(),
                timer.owner()
            )));
        }
        timers.push(timer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TimerId) -> Result<Option<Timer>, TimerRepositoryError> {
        let timers = self.timers.read().map_err(poisoned)?;
        Ok(timers.iter().find(|timer| timer.id() == *id).cloned())
    }

    async fn find_one(&self, filter: &TimerFilter) -> Result<Option<Timer>, TimerRepositoryError> {
        let timers = self.timers.read().map_err(poisoned)?;
        Ok(timers.iter().find(|timer| filter.matches(timer)).cloned())
    }

    async fn find_all(&self, filter: &TimerFilter) -> Result<Vec<Timer>, TimerRepositoryError> {
        let timers = self.timers.read().map_err(poisoned)?;
        Ok(timers
            .iter()
            .filter(|timer| filter.matches(timer))
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &TimerId,
        update: TimerUpdate,
    ) -> Result<Option<Timer>, TimerRepositoryError> {
        let mut timers = self.timers.write().map_err(poisoned)?;
        Ok(timers
            .iter_mut()
            .find(|timer| timer.id() == *id)
            .map(|timer| {
                update.apply(timer);
                timer.clone()
            }))
    }
}
