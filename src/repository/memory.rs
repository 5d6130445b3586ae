//! In-memory single-slot repositories.
//!
//! Suitable for tests and development. State is lost on process exit; use the
//! [file-backed repositories](super::file) when restarts matter.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::gatekeeper::SingleGatekeeperRepository;
use super::user::{SingleUserRepository, User};
use crate::gatekeeper::Gatekeeper;
use crate::id::{GatekeeperId, UserId};
use crate::AuthError;

fn poisoned() -> AuthError {
    AuthError::StorageError("lock poisoned".to_owned())
}

/// In-memory store for the single primary user.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    slot: Arc<Mutex<Option<User>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SingleUserRepository for InMemoryUserRepository {
    async fn next_id(&self) -> Result<UserId, AuthError> {
        Ok(UserId::generate())
    }

    async fn save(&self, user: User) -> Result<(), AuthError> {
        let mut slot = self.slot.lock().map_err(|_| poisoned())?;
        match slot.as_ref() {
            Some(existing) if existing.id() != user.id() => {
                Err(AuthError::PrimaryUserAlreadyExists)
            }
            _ => {
                *slot = Some(user);
                Ok(())
            }
        }
    }

    async fn remove(&self, user: &User) -> Result<(), AuthError> {
        let mut slot = self.slot.lock().map_err(|_| poisoned())?;
        match slot.as_ref() {
            Some(existing) if existing.id() == user.id() => {
                *slot = None;
                Ok(())
            }
            _ => Err(AuthError::UserNotFound),
        }
    }

    async fn primary_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.slot.lock().map_err(|_| poisoned())?.clone())
    }

    async fn user_by_encrypted_password(
        &self,
        encrypted_password: &str,
    ) -> Result<Option<User>, AuthError> {
        let slot = self.slot.lock().map_err(|_| poisoned())?;
        Ok(slot
            .as_ref()
            .filter(|user| user.encrypted_password() == encrypted_password)
            .cloned())
    }
}

/// In-memory store for the single gatekeeper record.
#[derive(Clone, Default)]
pub struct InMemoryGatekeeperRepository {
    slot: Arc<Mutex<Option<Gatekeeper>>>,
}

impl InMemoryGatekeeperRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SingleGatekeeperRepository for InMemoryGatekeeperRepository {
    async fn next_id(&self) -> Result<GatekeeperId, AuthError> {
        Ok(GatekeeperId::generate())
    }

    async fn save(&self, gatekeeper: Gatekeeper) -> Result<(), AuthError> {
        *self.slot.lock().map_err(|_| poisoned())? = Some(gatekeeper);
        Ok(())
    }

    async fn gatekeeper(&self) -> Result<Option<Gatekeeper>, AuthError> {
        Ok(self.slot.lock().map_err(|_| poisoned())?.clone())
    }
}
