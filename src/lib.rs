//! Single-user authentication gatekeeper.
//!
//! `keygate` decides, for the single local user of a security-sensitive
//! client, whether a login attempt (password or biometric) is currently
//! permitted, and manages the resulting time-boxed access session: lockout
//! after repeated failures, session expiry and renewal, and the registration
//! and authentication flows around them.

pub mod config;
pub mod events;

mod biometry;
mod clock;
mod crypto;
mod gatekeeper;
mod id;
mod identity;
mod policy;
mod repository;
mod session;

pub use biometry::{BiometricAuthenticationService, MockBiometricService};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::KeygateConfig;
pub use crypto::{EncryptionService, Sha256Encryption};
pub use events::register_event_listeners;
pub use gatekeeper::Gatekeeper;
pub use id::{GatekeeperId, SessionId, UserId};
pub use identity::{IdentityService, UserDescriptor};
pub use policy::AuthenticationPolicy;
pub use repository::{
    FileGatekeeperRepository, FileUserRepository, InMemoryGatekeeperRepository,
    InMemoryUserRepository, SingleGatekeeperRepository, SingleUserRepository, User,
};
pub use session::Session;

use std::fmt;

/// Errors reported by the gatekeeper subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Policy session duration must be positive.
    SessionDurationNotPositive,
    /// Policy failed-attempt limit must be at least 1.
    MaxFailedAttemptsNotPositive,
    /// Policy block duration must not be negative.
    BlockDurationNegative,
    /// Identifier is not a 36-character UUID-formatted string.
    InvalidIdentifier(String),
    /// Password must not be empty.
    EmptyPassword,
    /// Authentication is blocked until the block window elapses.
    AccessBlocked,
    /// The session is not active at the given time.
    SessionIsNotActive,
    /// The session is already active and cannot be started again.
    SessionWasActiveAlready,
    /// The session has finished; no operation is valid anymore.
    SessionWasFinishedAlready,
    /// No gatekeeper has been provisioned.
    GatekeeperNotFound,
    /// A primary user is already registered.
    UserAlreadyRegistered,
    /// The expected user is not stored.
    UserNotFound,
    /// A different primary user is already stored.
    PrimaryUserAlreadyExists,
    /// The device has no usable biometric sensor.
    BiometryUnavailable,
    /// A storage backend failed.
    StorageError(String),
}

impl std::error::Error for AuthError {}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::SessionDurationNotPositive => {
                write!(f, "Session duration must be positive")
            }
            AuthError::MaxFailedAttemptsNotPositive => {
                write!(f, "Max failed attempts must be at least 1")
            }
            AuthError::BlockDurationNegative => write!(f, "Block duration must not be negative"),
            AuthError::InvalidIdentifier(value) => write!(f, "Invalid identifier: {value}"),
            AuthError::EmptyPassword => write!(f, "Password must not be empty"),
            AuthError::AccessBlocked => write!(f, "Authentication is blocked"),
            AuthError::SessionIsNotActive => write!(f, "Session is not active"),
            AuthError::SessionWasActiveAlready => write!(f, "Session was active already"),
            AuthError::SessionWasFinishedAlready => write!(f, "Session was finished already"),
            AuthError::GatekeeperNotFound => write!(f, "No gatekeeper provisioned"),
            AuthError::UserAlreadyRegistered => write!(f, "User already registered"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::PrimaryUserAlreadyExists => write!(f, "Primary user already exists"),
            AuthError::BiometryUnavailable => write!(f, "Biometry is unavailable"),
            AuthError::StorageError(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}
