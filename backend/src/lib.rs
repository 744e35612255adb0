//! Timer lifecycle backend.
//!
//! Users sign up, log in, and run named timers. Timer state is served over
//! REST and WebSocket, and a broadcaster pushes live durations to every
//! connected socket on a fixed period.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the timer
//! rules and port traits, [`inbound`] adapts HTTP and WebSocket traffic to
//! those ports, and [`outbound`] provides the in-memory storage adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
