//! Inbound adapters (HTTP, WebSocket) that translate external requests
//! into domain port calls while keeping framework details at the edge.
//!
//! Both transports resolve the caller from the same cookie session and
//! render timers through [`TimerViewPayload`].

pub mod http;
mod timer_view;
pub mod ws;

pub use timer_view::{TimerViewPayload, timer_payloads};
