//! Timer lifecycle engine.
//!
//! [`TimerService`] implements both timer driving ports on top of a
//! [`TimerRepository`]. Mutations for one user are serialised through
//! [`UserLocks`]; reads take a single clock sample per call.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    StartTimerRequest, StartTimerResponse, StopTimerRequest, StopTimerResponse, TimerCommand,
    TimerFilter, TimerQuery, TimerRepository, TimerRepositoryError, TimerUpdate,
};
use crate::domain::{
    CallerContext, EpochMillis, GlobalSnapshot, Timer, TimerError, TimerState, TimerView,
    UserLocks,
};

fn map_repository_error(error: TimerRepositoryError) -> TimerError {
    TimerError::storage_unavailable(error.to_string())
}

/// Instant at which `timer` is read, never earlier than its start.
///
/// A wall clock stepped backwards would otherwise make a running timer's
/// elapsed time negative; such timers read as just started instead.
fn reading_instant(timer: &Timer, now: EpochMillis) -> EpochMillis {
    if timer.is_running() && now < timer.started_at() {
        warn!(
            timer_id = %timer.id(),
            started_at = timer.started_at().as_i64(),
            now = now.as_i64(),
            "clock is behind timer start"
        );
        return timer.started_at();
    }
    now
}

fn view_of(timer: &Timer, now: EpochMillis) -> Result<TimerView, TimerError> {
    Ok(timer.view_at(reading_instant(timer, now))?)
}

/// Timer service implementing [`TimerCommand`] and [`TimerQuery`].
pub struct TimerService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    locks: UserLocks,
}

impl<R> TimerService<R> {
    /// Create a service over `repository`, reading time from `clock`.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use timers_backend::domain::TimerService;
    /// use timers_backend::outbound::persistence::InMemoryTimerRepository;
    ///
    /// let service = TimerService::new(
    ///     Arc::new(InMemoryTimerRepository::new()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            locks: UserLocks::new(),
        }
    }

    fn now(&self) -> EpochMillis {
        EpochMillis::now(self.clock.as_ref())
    }
}

#[async_trait]
impl<R> TimerCommand for TimerService<R>
where
    R: TimerRepository,
{
    async fn start_timer(
        &self,
        caller: &CallerContext,
        request: StartTimerRequest,
    ) -> Result<StartTimerResponse, TimerError> {
        let StartTimerRequest { timer_name } = request;
        let _region = self.locks.lock(caller.user_id()).await;

        let running = TimerFilter::owned_by(caller.user_id().clone())
            .named(timer_name.clone())
            .running();
        let existing = self
            .repository
            .find_one(&running)
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            return Err(TimerError::DuplicateRunningTimer { name: timer_name });
        }

        let timer = Timer::start(caller.user_id().clone(), timer_name, self.now());
        match self.repository.create(&timer).await {
            Ok(()) => {}
            Err(TimerRepositoryError::Conflict { .. }) => {
                return Err(TimerError::DuplicateRunningTimer {
                    name: timer.name().clone(),
                });
            }
            Err(error) => return Err(map_repository_error(error)),
        }

        info!(
            user_id = %caller.user_id(),
            timer_id = %timer.id(),
            timer_name = %timer.name(),
            "timer started"
        );
        Ok(StartTimerResponse {
            timer_id: timer.id(),
            started_at: timer.started_at(),
        })
    }

    async fn stop_timer(
        &self,
        caller: &CallerContext,
        request: StopTimerRequest,
    ) -> Result<StopTimerResponse, TimerError> {
        let StopTimerRequest { timer_id } = request;
        let _region = self.locks.lock(caller.user_id()).await;

        let not_found = || TimerError::TimerNotFound { id: timer_id };
        let timer = self
            .repository
            .find_by_id(&timer_id)
            .await
            .map_err(map_repository_error)?
            .filter(|timer| timer.owner() == caller.user_id())
            .ok_or_else(not_found)?;

        let now = self.now();
        if let TimerState::Stopped { .. } = timer.state() {
            debug!(user_id = %caller.user_id(), timer_id = %timer_id, "timer already stopped");
            return Ok(StopTimerResponse {
                timer: view_of(&timer, now)?,
                already_stopped: true,
            });
        }

        let elapsed = timer.elapsed_at(reading_instant(&timer, now))?;
        let stopped = self
            .repository
            .update(&timer_id, TimerUpdate::stop(elapsed))
            .await
            .map_err(map_repository_error)?
            .ok_or_else(not_found)?;

        info!(
            user_id = %caller.user_id(),
            timer_id = %timer_id,
            elapsed = %elapsed,
            "timer stopped"
        );
        Ok(StopTimerResponse {
            timer: view_of(&stopped, now)?,
            already_stopped: false,
        })
    }
}

#[async_trait]
impl<R> TimerQuery for TimerService<R>
where
    R: TimerRepository,
{
    async fn snapshot(&self, caller: &CallerContext) -> Result<Vec<TimerView>, TimerError> {
        let timers = self
            .repository
            .find_all(&TimerFilter::owned_by(caller.user_id().clone()))
            .await
            .map_err(map_repository_error)?;
        if timers.is_empty() {
            return Err(TimerError::NoTimersFound);
        }

        let now = self.now();
        timers.iter().map(|timer| view_of(timer, now)).collect()
    }

    async fn global_snapshot(&self) -> Result<GlobalSnapshot, TimerError> {
        let timers = self
            .repository
            .find_all(&TimerFilter::all())
            .await
            .map_err(map_repository_error)?;

        let now = self.now();
        let mut by_user: HashMap<_, Vec<TimerView>> = HashMap::new();
        for timer in &timers {
            by_user
                .entry(timer.owner().clone())
                .or_default()
                .push(view_of(timer, now)?);
        }
        Ok(GlobalSnapshot::new(now, by_user))
    }
}

#[cfg(test)]
#[path = "timer_service_tests.rs"]
mod tests;
