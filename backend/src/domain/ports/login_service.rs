//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to turn credentials into a [`UserId`] without
//! knowing how passwords are stored.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    ///
    /// Unknown usernames fail with `not_found`; a wrong password fails with
    /// `unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
