//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: in-memory timer repository and user directory

pub mod persistence;
