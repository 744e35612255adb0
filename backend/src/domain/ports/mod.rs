//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod timer_command;
mod timer_query;
mod timer_repository;
mod user_signup;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use timer_command::MockTimerCommand;
pub use timer_command::{
    StartTimerRequest, StartTimerResponse, StopTimerRequest, StopTimerResponse, TimerCommand,
};
#[cfg(test)]
pub use timer_query::MockTimerQuery;
pub use timer_query::TimerQuery;
#[cfg(test)]
pub use timer_repository::MockTimerRepository;
pub use timer_repository::{TimerFilter, TimerRepository, TimerRepositoryError, TimerUpdate};
#[cfg(test)]
pub use user_signup::MockUserSignup;
pub use user_signup::UserSignup;
