use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::id::{SessionId, UserId};
use crate::AuthError;

/// The registered device user.
///
/// Holds the already-encrypted password representation, never plaintext.
/// The attached session id is informational: the
/// [`Gatekeeper`](crate::Gatekeeper) stays authoritative for access control.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    encrypted_password: String,
    session_id: Option<SessionId>,
}

impl User {
    /// Creates a user from an id and an already-encrypted password.
    #[must_use]
    pub fn new(id: UserId, encrypted_password: impl Into<String>) -> Self {
        Self {
            id,
            encrypted_password: encrypted_password.into(),
            session_id: None,
        }
    }

    /// The user's identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// The stored encrypted password representation.
    #[must_use]
    pub fn encrypted_password(&self) -> &str {
        &self.encrypted_password
    }

    /// The session granted at the last successful authentication, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Attaches the session granted by the gatekeeper.
    pub fn attach_session(&mut self, id: SessionId) {
        self.session_id = Some(id);
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("encrypted_password", &"[REDACTED]")
            .field("session_id", &self.session_id)
            .finish()
    }
}

#[cfg(any(test, feature = "mocks"))]
impl User {
    pub fn mock() -> Self {
        User::new(UserId::generate(), "encrypted-password")
    }

    pub fn mock_with_password(encrypted_password: &str) -> Self {
        User::new(UserId::generate(), encrypted_password)
    }
}

/// Storage for the single primary user of the device.
///
/// Implementations enforce the single-user invariant: at most one primary
/// user exists at a time, and saving a second distinct user fails with
/// `PrimaryUserAlreadyExists`. Saving the existing user again updates it.
#[async_trait]
pub trait SingleUserRepository: Send + Sync {
    /// Generates an id for a new user.
    async fn next_id(&self) -> Result<UserId, AuthError>;

    /// Persists the user.
    ///
    /// # Errors
    ///
    /// Returns `PrimaryUserAlreadyExists` when a different user is already
    /// stored.
    async fn save(&self, user: User) -> Result<(), AuthError>;

    /// Removes the user.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` when the stored user differs or none exists.
    async fn remove(&self, user: &User) -> Result<(), AuthError>;

    /// The primary user, if one is registered.
    async fn primary_user(&self) -> Result<Option<User>, AuthError>;

    /// Looks the user up by encrypted password.
    async fn user_by_encrypted_password(
        &self,
        encrypted_password: &str,
    ) -> Result<Option<User>, AuthError>;
}
