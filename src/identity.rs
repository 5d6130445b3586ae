//! Registration and authentication flows.

use std::future::Future;

use chrono::Duration;
use tokio::sync::Mutex;

use crate::biometry::BiometricAuthenticationService;
use crate::clock::Clock;
use crate::crypto::EncryptionService;
use crate::events::{self, AuthEvent};
use crate::gatekeeper::Gatekeeper;
use crate::id::{SessionId, UserId};
use crate::policy::AuthenticationPolicy;
use crate::repository::{SingleGatekeeperRepository, SingleUserRepository, User};
use crate::AuthError;

/// Outcome of a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDescriptor {
    /// The authenticated user.
    pub user_id: UserId,
    /// The access session granted by the gatekeeper.
    pub session_id: SessionId,
}

/// Orchestrates registration and authentication.
///
/// The service holds no persistent state of its own; it coordinates the
/// injected clock, encryption, biometry, and the two single-slot
/// repositories. Every authentication attempt runs the same gating
/// procedure: load the gatekeeper, short-circuit when blocked, run the
/// credential check, record the outcome, persist.
///
/// A blocked gatekeeper yields `Ok(None)`, not an error, so callers can
/// present a generic "try again later" without distinguishing wrong-password
/// from locked-out.
///
/// The gating procedure is a critical section: the single gatekeeper record
/// is updated via read-modify-write, so attempts are serialized on an
/// internal mutex. Two simultaneous failed attempts both increment the
/// counter rather than clobbering each other.
///
/// # Example
///
/// ```rust,ignore
/// use chrono::Duration;
/// use keygate::{
///     IdentityService, InMemoryGatekeeperRepository, InMemoryUserRepository,
///     MockBiometricService, Sha256Encryption, SystemClock,
/// };
///
/// let service = IdentityService::new(
///     SystemClock,
///     Sha256Encryption,
///     MockBiometricService::approving(),
///     InMemoryUserRepository::new(),
///     InMemoryGatekeeperRepository::new(),
/// );
///
/// service.provision_gatekeeper(Duration::minutes(5), 5, Duration::minutes(15)).await?;
/// service.register_user("MyPassword1").await?;
/// let descriptor = service.authenticate_user("MyPassword1").await?;
/// ```
pub struct IdentityService<C, E, B, U, G> {
    clock: C,
    encryption: E,
    biometry: B,
    users: U,
    gatekeepers: G,
    auth_lock: Mutex<()>,
}

impl<C, E, B, U, G> IdentityService<C, E, B, U, G>
where
    C: Clock,
    E: EncryptionService,
    B: BiometricAuthenticationService,
    U: SingleUserRepository,
    G: SingleGatekeeperRepository,
{
    /// Creates a new identity service over the given collaborators.
    pub fn new(clock: C, encryption: E, biometry: B, users: U, gatekeepers: G) -> Self {
        Self {
            clock,
            encryption,
            biometry,
            users,
            gatekeepers,
            auth_lock: Mutex::new(()),
        }
    }

    /// Provisions a fresh gatekeeper with the given policy parameters.
    ///
    /// Called once per device to seed the lockout subsystem. Replaces any
    /// previously stored gatekeeper.
    ///
    /// # Errors
    ///
    /// Propagates policy validation errors and repository failures.
    #[tracing::instrument(name = "provision_gatekeeper", skip_all, err)]
    pub async fn provision_gatekeeper(
        &self,
        session_duration: Duration,
        max_failed_attempts: u32,
        block_duration: Duration,
    ) -> Result<Gatekeeper, AuthError> {
        let policy =
            AuthenticationPolicy::new(session_duration, max_failed_attempts, block_duration)?;
        let gatekeeper = Gatekeeper::new(self.gatekeepers.next_id().await?, policy);
        self.gatekeepers.save(gatekeeper.clone()).await?;
        events::dispatch(AuthEvent::GatekeeperProvisioned {
            gatekeeper_id: gatekeeper.id().clone(),
            at: self.clock.now(),
        })
        .await;
        Ok(gatekeeper)
    }

    /// Registers the primary user.
    ///
    /// Encrypts the password, persists the user, and activates biometry as a
    /// side effect.
    ///
    /// # Errors
    ///
    /// - `UserAlreadyRegistered` when a primary user exists.
    /// - `EmptyPassword` when the password is empty.
    /// - Propagates biometry and repository failures.
    #[tracing::instrument(name = "register_user", skip_all, err)]
    pub async fn register_user(&self, password: &str) -> Result<User, AuthError> {
        if self.users.primary_user().await?.is_some() {
            return Err(AuthError::UserAlreadyRegistered);
        }
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        let encrypted = self.encryption.encrypted(password);
        let user = User::new(self.users.next_id().await?, encrypted);
        self.users.save(user.clone()).await?;
        self.biometry.activate().await?;
        events::dispatch(AuthEvent::UserRegistered {
            user_id: user.id().clone(),
            at: self.clock.now(),
        })
        .await;
        Ok(user)
    }

    /// Attempts to authenticate with a password.
    ///
    /// Returns `Ok(None)` on a wrong password (a denial is recorded) and
    /// when authentication is currently blocked (nothing is recorded).
    ///
    /// # Errors
    ///
    /// - `EmptyPassword` for an empty password; the gatekeeper is not
    ///   touched.
    /// - `GatekeeperNotFound` when no gatekeeper has been provisioned.
    /// - Propagates repository failures.
    #[tracing::instrument(name = "authenticate_user", skip_all, err)]
    pub async fn authenticate_user(
        &self,
        password: &str,
    ) -> Result<Option<UserDescriptor>, AuthError> {
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        let encrypted = self.encryption.encrypted(password);
        self.authenticate_with(|| async {
            self.users.user_by_encrypted_password(&encrypted).await
        })
        .await
    }

    /// Attempts to authenticate with the device biometry.
    ///
    /// A dismissed or failed prompt is recorded as a denial, exactly like a
    /// wrong password.
    ///
    /// # Errors
    ///
    /// - `GatekeeperNotFound` when no gatekeeper has been provisioned.
    /// - Propagates biometry and repository failures.
    #[tracing::instrument(name = "authenticate_user_biometrically", skip_all, err)]
    pub async fn authenticate_user_biometrically(
        &self,
    ) -> Result<Option<UserDescriptor>, AuthError> {
        self.authenticate_with(|| async {
            if self.biometry.authenticate().await? {
                self.users.primary_user().await
            } else {
                Ok(None)
            }
        })
        .await
    }

    /// Checks whether the primary user holds an active session right now.
    ///
    /// # Errors
    ///
    /// Propagates repository failures; missing gatekeeper, user, or session
    /// all read as `Ok(false)`.
    pub async fn is_user_authenticated(&self) -> Result<bool, AuthError> {
        let Some(gatekeeper) = self.gatekeepers.gatekeeper().await? else {
            return Ok(false);
        };
        let Some(user) = self.users.primary_user().await? else {
            return Ok(false);
        };
        let Some(session_id) = user.session_id() else {
            return Ok(false);
        };
        Ok(gatekeeper.has_access(session_id, self.clock.now()))
    }

    /// The shared gating procedure.
    ///
    /// Load-check-act-save on the single gatekeeper record must not
    /// interleave with another attempt, so the whole procedure runs under
    /// the service's mutex.
    async fn authenticate_with<F, Fut>(&self, check: F) -> Result<Option<UserDescriptor>, AuthError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<User>, AuthError>>,
    {
        let _guard = self.auth_lock.lock().await;
        let now = self.clock.now();
        let mut gatekeeper = self
            .gatekeepers
            .gatekeeper()
            .await?
            .ok_or(AuthError::GatekeeperNotFound)?;

        if !gatekeeper.is_access_possible(now) {
            events::dispatch(AuthEvent::AuthenticationBlocked { at: now }).await;
            return Ok(None);
        }

        let Some(mut user) = check().await? else {
            gatekeeper.deny_access(now);
            let failed_attempt_count = gatekeeper.failed_attempt_count();
            self.gatekeepers.save(gatekeeper).await?;
            events::dispatch(AuthEvent::AuthenticationFailed {
                failed_attempt_count,
                at: now,
            })
            .await;
            return Ok(None);
        };

        let session_id = gatekeeper.allow_access(now)?;
        self.gatekeepers.save(gatekeeper).await?;
        user.attach_session(session_id.clone());
        let user_id = user.id().clone();
        self.users.save(user).await?;
        events::dispatch(AuthEvent::AuthenticationSucceeded {
            user_id: user_id.clone(),
            session_id: session_id.clone(),
            at: now,
        })
        .await;
        Ok(Some(UserDescriptor {
            user_id,
            session_id,
        }))
    }
}
