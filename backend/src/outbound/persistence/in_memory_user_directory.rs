//! Process-local identity adapter implementing [`LoginService`] and
//! [`UserSignup`].
//!
//! Passwords are stored as bcrypt hashes. Hashing and verification run on
//! the blocking pool so a slow work factor never stalls the async workers.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tokio::task;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{LoginService, UserSignup};
use crate::domain::{DisplayName, Error, LoginCredentials, User, UserId};

/// Lowest bcrypt work factor accepted by [`InMemoryUserDirectory::with_cost`].
///
/// Mirrors bcrypt's own lower bound, which the crate does not export.
pub const MIN_COST: u32 = 4;

/// Highest bcrypt work factor; mirrors bcrypt's unexported upper bound.
const MAX_COST: u32 = 31;

struct StoredUser {
    user: User,
    password_hash: String,
}

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::internal("user directory lock poisoned")
}

fn hashing_failed(error: impl std::fmt::Display) -> Error {
    warn!(error = %error, "password hashing failed");
    Error::internal("password hashing failed")
}

async fn hash_password(password: Zeroizing<String>, cost: u32) -> Result<String, Error> {
    task::spawn_blocking(move || bcrypt::hash(password.as_bytes(), cost))
        .await
        .map_err(hashing_failed)?
        .map_err(hashing_failed)
}

async fn verify_password(password: Zeroizing<String>, hash: String) -> Result<bool, Error> {
    task::spawn_blocking(move || bcrypt::verify(password.as_bytes(), &hash))
        .await
        .map_err(hashing_failed)?
        .map_err(hashing_failed)
}

/// In-memory user directory keyed by display name.
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, StoredUser>>,
    cost: u32,
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }
}

impl InMemoryUserDirectory {
    /// Directory hashing at bcrypt's default work factor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory hashing at `cost`, clamped to the range bcrypt accepts.
    ///
    /// # Examples
    /// ```
    /// use timers_backend::outbound::persistence::{InMemoryUserDirectory, MIN_COST};
    ///
    /// let directory = InMemoryUserDirectory::with_cost(MIN_COST);
    /// # let _ = directory;
    /// ```
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    fn ensure_available(&self, display_name: &DisplayName) -> Result<(), Error> {
        let users = self.users.read().map_err(poisoned)?;
        if users.contains_key(display_name.as_ref()) {
            return Err(Error::conflict("a user with this name already exists"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserSignup for InMemoryUserDirectory {
    async fn register(
        &self,
        display_name: &DisplayName,
        credentials: &LoginCredentials,
    ) -> Result<UserId, Error> {
        self.ensure_available(display_name)?;
        let password = Zeroizing::new(credentials.password().to_owned());
        let password_hash = hash_password(password, self.cost).await?;

        // The name may have been taken while the hash was computed.
        let mut users = self.users.write().map_err(poisoned)?;
        if users.contains_key(display_name.as_ref()) {
            return Err(Error::conflict("a user with this name already exists"));
        }

        let user = User::new(UserId::random(), display_name.clone());
        let user_id = user.id().clone();
        users.insert(
            display_name.as_ref().to_owned(),
            StoredUser {
                user,
                password_hash,
            },
        );
        info!(user_id = %user_id, "user registered");
        Ok(user_id)
    }
}

#[async_trait]
impl LoginService for InMemoryUserDirectory {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let (user_id, password_hash) = {
            let users = self.users.read().map_err(poisoned)?;
            let stored = users
                .get(credentials.username())
                .ok_or_else(|| Error::not_found("user not found"))?;
            (stored.user.id().clone(), stored.password_hash.clone())
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        if !verify_password(password, password_hash).await? {
            return Err(Error::unauthorized("incorrect password"));
        }
        Ok(user_id)
    }
}
