//! Per-user mutual exclusion for timer mutations.
//!
//! Starts and stops for one user run one at a time so the duplicate-name
//! check and the write that follows it cannot interleave. Different users
//! never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::UserId;

/// Lazily created async lock per user.
#[derive(Debug, Default)]
pub struct UserLocks {
    regions: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user`'s timers.
    ///
    /// The region is held until the returned guard is dropped.
    pub async fn lock(&self, user: &UserId) -> OwnedMutexGuard<()> {
        self.region_for(user).lock_owned().await
    }

    fn region_for(&self, user: &UserId) -> Arc<AsyncMutex<()>> {
        // The map only ever gains entries, so a poisoned guard is still consistent.
        let mut regions = self.regions.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(regions.entry(user.clone()).or_default())
    }
}
