//! Domain primitives, aggregates and services.
//!
//! Purpose: hold the timer lifecycle rules independent of any transport or
//! store. Inbound adapters call the driving ports in [`ports`]; outbound
//! adapters implement the driven ones.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - Timer, TimerView, GlobalSnapshot: the timer aggregate and its reads.
//! - TimerService: lifecycle engine implementing `TimerCommand` and
//!   `TimerQuery`.
//! - TimerBroadcaster: periodic fan-out of live timer state.

pub mod auth;
pub mod caller;
pub mod clock;
pub mod duration;
pub mod error;
pub mod ports;
pub mod timer;
pub mod timer_broadcast;
pub mod timer_error;
pub mod timer_service;
pub mod trace_id;
pub mod user;
pub mod user_locks;

pub use self::auth::{LoginCredentials, LoginValidationError, PASSWORD_MAX_BYTES};
pub use self::caller::CallerContext;
pub use self::clock::EpochMillis;
pub use self::duration::{DurationError, ElapsedTime, format_duration};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::timer::{
    GlobalSnapshot, TIMER_NAME_MAX, Timer, TimerId, TimerName, TimerState, TimerValidationError,
    TimerView,
};
pub use self::timer_broadcast::{DEFAULT_BROADCAST_CAPACITY, TimerBroadcaster};
pub use self::timer_error::TimerError;
pub use self::timer_service::TimerService;
pub use self::trace_id::TraceId;
pub use self::user::{DisplayName, User, UserId, UserValidationError};
pub use self::user_locks::UserLocks;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use timers_backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("nope"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
