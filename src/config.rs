//! Configuration presets for the gatekeeper policy.
//!
//! # Example
//!
//! ```rust
//! use chrono::Duration;
//! use keygate::config::{KeygateConfig, PolicyConfig};
//!
//! // Use defaults
//! let config = KeygateConfig::default();
//!
//! // Or customize
//! let config = KeygateConfig {
//!     policy: PolicyConfig {
//!         session_duration: Duration::minutes(1),
//!         ..Default::default()
//!     },
//! };
//! let policy = config.policy().unwrap();
//! ```

use chrono::Duration;

use crate::policy::AuthenticationPolicy;
use crate::AuthError;

/// Top-level configuration for the keygate library.
#[derive(Debug, Clone, Default)]
pub struct KeygateConfig {
    /// Lockout and session policy parameters.
    pub policy: PolicyConfig,
}

impl KeygateConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration suitable for development and testing.
    ///
    /// Long sessions, lenient lockout.
    #[must_use]
    pub fn development() -> Self {
        Self {
            policy: PolicyConfig {
                session_duration: Duration::hours(1),
                max_failed_attempts: 10,
                block_duration: Duration::minutes(1),
            },
        }
    }

    /// Creates a configuration with stricter security settings.
    ///
    /// Short sessions, few attempts, long block.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            policy: PolicyConfig {
                session_duration: Duration::minutes(1),
                max_failed_attempts: 3,
                block_duration: Duration::minutes(30),
            },
        }
    }

    /// Builds the authentication policy from the configured parameters.
    ///
    /// # Errors
    ///
    /// Propagates policy validation errors for out-of-bounds values.
    pub fn policy(&self) -> Result<AuthenticationPolicy, AuthError> {
        AuthenticationPolicy::new(
            self.policy.session_duration,
            self.policy.max_failed_attempts,
            self.policy.block_duration,
        )
    }
}

/// The three gatekeeper policy parameters.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// How long a granted session stays active without renewal.
    ///
    /// Default: 5 minutes.
    pub session_duration: Duration,

    /// Failed attempts tolerated before authentication is blocked.
    ///
    /// Default: 5.
    pub max_failed_attempts: u32,

    /// How long authentication stays blocked once attempts are exhausted.
    ///
    /// Default: 15 minutes.
    pub block_duration: Duration,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            session_duration: Duration::minutes(5),
            max_failed_attempts: 5,
            block_duration: Duration::minutes(15),
        }
    }
}
