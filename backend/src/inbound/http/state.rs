//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, TimerCommand, TimerQuery, UserSignup};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub signup: Arc<dyn UserSignup>,
    pub timers: Arc<dyn TimerCommand>,
    pub timers_query: Arc<dyn TimerQuery>,
}

impl HttpState {
    /// Bundle the identity and timer ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use timers_backend::domain::TimerService;
    /// use timers_backend::inbound::http::state::HttpState;
    /// use timers_backend::outbound::persistence::{InMemoryTimerRepository, InMemoryUserDirectory};
    ///
    /// let users = Arc::new(InMemoryUserDirectory::new());
    /// let timers = Arc::new(TimerService::new(
    ///     Arc::new(InMemoryTimerRepository::new()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(users.clone(), users, timers.clone(), timers);
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        signup: Arc<dyn UserSignup>,
        timers: Arc<dyn TimerCommand>,
        timers_query: Arc<dyn TimerQuery>,
    ) -> Self {
        Self {
            login,
            signup,
            timers,
            timers_query,
        }
    }
}
