//! Authentication policy value object.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::clock::duration_millis;
use crate::AuthError;

/// Configures a [`Gatekeeper`](crate::Gatekeeper)'s behavior: how long an
/// access session lasts, how many failed attempts are tolerated, and how long
/// authentication stays blocked once they are exhausted.
///
/// The policy is immutable; the `with_*` methods return a new validated value
/// and never touch the original.
///
/// # Example
///
/// ```rust
/// use chrono::Duration;
/// use keygate::AuthenticationPolicy;
///
/// let policy = AuthenticationPolicy::new(Duration::minutes(5), 3, Duration::minutes(15))?;
/// let stricter = policy.with_max_failed_attempts(2)?;
///
/// assert_eq!(policy.max_failed_attempts(), 3);
/// assert_eq!(stricter.max_failed_attempts(), 2);
/// # Ok::<(), keygate::AuthError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationPolicy {
    #[serde(with = "duration_millis")]
    session_duration: Duration,
    max_failed_attempts: u32,
    #[serde(with = "duration_millis")]
    block_duration: Duration,
}

impl AuthenticationPolicy {
    /// Creates a new policy.
    ///
    /// # Errors
    ///
    /// - `SessionDurationNotPositive` unless `session_duration` is positive.
    /// - `MaxFailedAttemptsNotPositive` unless `max_failed_attempts` is at least 1.
    /// - `BlockDurationNegative` if `block_duration` is negative.
    pub fn new(
        session_duration: Duration,
        max_failed_attempts: u32,
        block_duration: Duration,
    ) -> Result<Self, AuthError> {
        if session_duration <= Duration::zero() {
            return Err(AuthError::SessionDurationNotPositive);
        }
        if max_failed_attempts == 0 {
            return Err(AuthError::MaxFailedAttemptsNotPositive);
        }
        if block_duration < Duration::zero() {
            return Err(AuthError::BlockDurationNegative);
        }
        Ok(Self {
            session_duration,
            max_failed_attempts,
            block_duration,
        })
    }

    /// Returns a new policy with a different session duration.
    ///
    /// # Errors
    ///
    /// Returns `SessionDurationNotPositive` if the new value is invalid.
    pub fn with_session_duration(&self, new_value: Duration) -> Result<Self, AuthError> {
        Self::new(new_value, self.max_failed_attempts, self.block_duration)
    }

    /// Returns a new policy with a different failed-attempt limit.
    ///
    /// # Errors
    ///
    /// Returns `MaxFailedAttemptsNotPositive` if the new value is invalid.
    pub fn with_max_failed_attempts(&self, new_value: u32) -> Result<Self, AuthError> {
        Self::new(self.session_duration, new_value, self.block_duration)
    }

    /// Returns a new policy with a different block duration.
    ///
    /// # Errors
    ///
    /// Returns `BlockDurationNegative` if the new value is invalid.
    pub fn with_block_duration(&self, new_value: Duration) -> Result<Self, AuthError> {
        Self::new(self.session_duration, self.max_failed_attempts, new_value)
    }

    /// How long a granted session stays active without renewal.
    #[must_use]
    pub fn session_duration(&self) -> Duration {
        self.session_duration
    }

    /// Failed attempts tolerated before authentication is blocked.
    #[must_use]
    pub fn max_failed_attempts(&self) -> u32 {
        self.max_failed_attempts
    }

    /// How long authentication stays blocked once attempts are exhausted.
    #[must_use]
    pub fn block_duration(&self) -> Duration {
        self.block_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AuthenticationPolicy {
        AuthenticationPolicy::new(Duration::seconds(2), 2, Duration::seconds(1)).unwrap()
    }

    #[test]
    fn test_valid_policy() {
        let policy = policy();
        assert_eq!(policy.session_duration(), Duration::seconds(2));
        assert_eq!(policy.max_failed_attempts(), 2);
        assert_eq!(policy.block_duration(), Duration::seconds(1));
    }

    #[test]
    fn test_zero_block_duration_is_allowed() {
        assert!(AuthenticationPolicy::new(Duration::seconds(1), 1, Duration::zero()).is_ok());
    }

    #[test]
    fn test_session_duration_must_be_positive() {
        assert_eq!(
            AuthenticationPolicy::new(Duration::zero(), 2, Duration::seconds(1)),
            Err(AuthError::SessionDurationNotPositive)
        );
        assert_eq!(
            AuthenticationPolicy::new(Duration::seconds(-1), 2, Duration::seconds(1)),
            Err(AuthError::SessionDurationNotPositive)
        );
    }

    #[test]
    fn test_max_failed_attempts_must_be_positive() {
        assert_eq!(
            AuthenticationPolicy::new(Duration::seconds(2), 0, Duration::seconds(1)),
            Err(AuthError::MaxFailedAttemptsNotPositive)
        );
    }

    #[test]
    fn test_block_duration_must_be_non_negative() {
        assert_eq!(
            AuthenticationPolicy::new(Duration::seconds(2), 2, Duration::seconds(-1)),
            Err(AuthError::BlockDurationNegative)
        );
    }

    #[test]
    fn test_with_session_duration_returns_new_value() {
        let original = policy();
        let changed = original.with_session_duration(Duration::seconds(10)).unwrap();

        assert_eq!(changed.session_duration(), Duration::seconds(10));
        assert_eq!(changed.max_failed_attempts(), original.max_failed_attempts());
        assert_eq!(original.session_duration(), Duration::seconds(2));
    }

    #[test]
    fn test_with_session_duration_rejects_invalid() {
        assert!(policy().with_session_duration(Duration::zero()).is_err());
    }

    #[test]
    fn test_with_max_failed_attempts() {
        let changed = policy().with_max_failed_attempts(5).unwrap();
        assert_eq!(changed.max_failed_attempts(), 5);
        assert!(policy().with_max_failed_attempts(0).is_err());
    }

    #[test]
    fn test_with_block_duration() {
        let changed = policy().with_block_duration(Duration::minutes(30)).unwrap();
        assert_eq!(changed.block_duration(), Duration::minutes(30));
        assert!(policy().with_block_duration(Duration::seconds(-1)).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let policy = policy();
        let json = serde_json::to_string(&policy).unwrap();
        let back: AuthenticationPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }
}
