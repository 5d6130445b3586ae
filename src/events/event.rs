use chrono::{DateTime, Utc};

use crate::id::{GatekeeperId, SessionId, UserId};

/// Events emitted by [`IdentityService`](crate::IdentityService) operations.
///
/// Events are always fired from the service. If no listeners are registered,
/// they are silently ignored (no-op). Register listeners via
/// [`register_event_listeners`](crate::register_event_listeners).
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// The primary user was registered.
    UserRegistered { user_id: UserId, at: DateTime<Utc> },

    /// An authentication attempt produced a session.
    AuthenticationSucceeded {
        user_id: UserId,
        session_id: SessionId,
        at: DateTime<Utc>,
    },

    /// The credential check found no user; a denial was recorded.
    AuthenticationFailed {
        failed_attempt_count: u32,
        at: DateTime<Utc>,
    },

    /// The gatekeeper refused the attempt without running the credential check.
    AuthenticationBlocked { at: DateTime<Utc> },

    /// A fresh gatekeeper was provisioned.
    GatekeeperProvisioned {
        gatekeeper_id: GatekeeperId,
        at: DateTime<Utc>,
    },
}

impl AuthEvent {
    /// Stable name of the event, for logging and metrics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "user_registered",
            Self::AuthenticationSucceeded { .. } => "authentication_succeeded",
            Self::AuthenticationFailed { .. } => "authentication_failed",
            Self::AuthenticationBlocked { .. } => "authentication_blocked",
            Self::GatekeeperProvisioned { .. } => "gatekeeper_provisioned",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let event = AuthEvent::AuthenticationBlocked { at: Utc::now() };
        assert_eq!(event.name(), "authentication_blocked");

        let event = AuthEvent::UserRegistered {
            user_id: UserId::generate(),
            at: Utc::now(),
        };
        assert_eq!(event.name(), "user_registered");
    }
}
