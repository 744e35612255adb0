//! Process-local persistence adapters.
//!
//! Both adapters keep state in memory for the lifetime of the process and
//! stand in for a document store. They only translate between storage and
//! domain types; lifecycle rules stay in the domain services.

mod in_memory_timer_repository;
mod in_memory_user_directory;

pub use in_memory_timer_repository::InMemoryTimerRepository;
pub use in_memory_user_directory::{InMemoryUserDirectory, MIN_COST};
