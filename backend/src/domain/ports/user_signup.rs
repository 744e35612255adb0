//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{DisplayName, Error, LoginCredentials, UserId};

/// Register new users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSignup: Send + Sync {
    /// Create a user named `display_name` holding the credential password.
    ///
    /// A name that is already taken fails with `conflict`.
    async fn register(
        &self,
        display_name: &DisplayName,
        credentials: &LoginCredentials,
    ) -> Result<UserId, Error>;
}
