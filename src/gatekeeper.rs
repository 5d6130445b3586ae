//! Lockout and session-issuance entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{GatekeeperId, SessionId};
use crate::policy::AuthenticationPolicy;
use crate::session::Session;
use crate::AuthError;

/// Controls access with a blocking behavior.
///
/// The gatekeeper keeps track of failed and successful access attempts per
/// its [`AuthenticationPolicy`]. Record outcomes with
/// [`allow_access`](Gatekeeper::allow_access) and
/// [`deny_access`](Gatekeeper::deny_access); once failed attempts reach the
/// policy maximum, access stays blocked until the block window elapses from
/// the most recent denial. Call [`use_access`](Gatekeeper::use_access) on
/// every use of an existing session to renew it.
///
/// The gatekeeper owns at most one live [`Session`]; issuing a new one drops
/// the previous session, so lookups against its id fail from then on. Any
/// policy change resets the gatekeeper as a side effect: a changed lockout or
/// session-duration policy never applies retroactively to a session granted
/// under the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gatekeeper {
    id: GatekeeperId,
    policy: AuthenticationPolicy,
    session: Option<Session>,
    failed_attempt_count: u32,
    access_denied_at: Option<DateTime<Utc>>,
}

impl Gatekeeper {
    /// Creates a new gatekeeper with no session and zero lockout state.
    #[must_use]
    pub fn new(id: GatekeeperId, policy: AuthenticationPolicy) -> Self {
        Self {
            id,
            policy,
            session: None,
            failed_attempt_count: 0,
            access_denied_at: None,
        }
    }

    /// Rehydrates a gatekeeper from persisted state.
    #[must_use]
    pub fn restore(
        id: GatekeeperId,
        policy: AuthenticationPolicy,
        session: Option<Session>,
        failed_attempt_count: u32,
        access_denied_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            policy,
            session,
            failed_attempt_count,
            access_denied_at,
        }
    }

    /// The gatekeeper's identifier.
    #[must_use]
    pub fn id(&self) -> &GatekeeperId {
        &self.id
    }

    /// The current authentication policy.
    #[must_use]
    pub fn policy(&self) -> &AuthenticationPolicy {
        &self.policy
    }

    /// Number of consecutive failed attempts since the last success or reset.
    #[must_use]
    pub fn failed_attempt_count(&self) -> u32 {
        self.failed_attempt_count
    }

    /// When access was last denied, if ever.
    #[must_use]
    pub fn access_denied_at(&self) -> Option<DateTime<Utc>> {
        self.access_denied_at
    }

    /// Id of the current live session, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref().map(Session::id)
    }

    /// Checks whether an authentication attempt is possible at `time`.
    ///
    /// Access is possible while failed attempts remain below the policy
    /// maximum, or once the block window has elapsed since the most recent
    /// denial. Every denial refreshes the denial timestamp, so a blocked
    /// gatekeeper stays blocked until attempts pause for the full window.
    #[must_use]
    pub fn is_access_possible(&self, time: DateTime<Utc>) -> bool {
        let Some(denied_at) = self.access_denied_at else {
            return true;
        };
        let block_lift_time = denied_at + self.policy.block_duration();
        let is_block_expired = time >= block_lift_time;
        let has_more_attempts = self.failed_attempt_count < self.policy.max_failed_attempts();
        has_more_attempts || is_block_expired
    }

    /// Records a successful authentication at `time` and issues a session.
    ///
    /// Starts a brand-new session with the policy's session duration,
    /// discards any previous session, and clears the lockout state. This is
    /// the only operation that resets the failed-attempt counter.
    ///
    /// # Errors
    ///
    /// Returns `AccessBlocked` if access is not possible at `time`.
    pub fn allow_access(&mut self, time: DateTime<Utc>) -> Result<SessionId, AuthError> {
        self.assert_not_blocked(time)?;
        let mut session = Session::new(SessionId::generate(), self.policy.session_duration())?;
        session.start(time)?;
        let id = session.id().clone();
        self.session = Some(session);
        self.failed_attempt_count = 0;
        self.access_denied_at = None;
        Ok(id)
    }

    /// Records a failed authentication at `time`.
    ///
    /// Drops the current session, increments the failed-attempt counter and
    /// refreshes the denial timestamp. Never fails: this is the operation
    /// that records lockout state, so the lockout it enforces cannot block it.
    pub fn deny_access(&mut self, time: DateTime<Utc>) {
        self.session = None;
        self.failed_attempt_count += 1;
        self.access_denied_at = Some(time);
    }

    /// Checks whether the given session is the current one and active at `time`.
    #[must_use]
    pub fn has_access(&self, session_id: &SessionId, time: DateTime<Utc>) -> bool {
        match &self.session {
            Some(session) if session.id() == session_id => session.is_active_at(time),
            _ => false,
        }
    }

    /// Renews the current session at `time` without re-authenticating.
    ///
    /// # Errors
    ///
    /// - `AccessBlocked` if access is not possible at `time`.
    /// - `SessionIsNotActive` if there is no session, or the session is no
    ///   longer active at `time`.
    pub fn use_access(&mut self, time: DateTime<Utc>) -> Result<(), AuthError> {
        self.assert_not_blocked(time)?;
        self.session
            .as_mut()
            .ok_or(AuthError::SessionIsNotActive)?
            .renew(time)
    }

    /// Changes the policy's session duration. Resets the gatekeeper.
    ///
    /// # Errors
    ///
    /// Returns `SessionDurationNotPositive` if the new value is invalid; the
    /// gatekeeper is left untouched in that case.
    pub fn change_session_duration(&mut self, new_value: Duration) -> Result<(), AuthError> {
        self.replace_policy(self.policy.with_session_duration(new_value)?);
        Ok(())
    }

    /// Changes the policy's failed-attempt limit. Resets the gatekeeper.
    ///
    /// # Errors
    ///
    /// Returns `MaxFailedAttemptsNotPositive` if the new value is invalid;
    /// the gatekeeper is left untouched in that case.
    pub fn change_max_failed_attempts(&mut self, new_value: u32) -> Result<(), AuthError> {
        self.replace_policy(self.policy.with_max_failed_attempts(new_value)?);
        Ok(())
    }

    /// Changes the policy's block duration. Resets the gatekeeper.
    ///
    /// # Errors
    ///
    /// Returns `BlockDurationNegative` if the new value is invalid; the
    /// gatekeeper is left untouched in that case.
    pub fn change_block_duration(&mut self, new_value: Duration) -> Result<(), AuthError> {
        self.replace_policy(self.policy.with_block_duration(new_value)?);
        Ok(())
    }

    /// Drops the current session and clears the lockout state.
    pub fn reset(&mut self) {
        self.session = None;
        self.failed_attempt_count = 0;
        self.access_denied_at = None;
    }

    fn replace_policy(&mut self, policy: AuthenticationPolicy) {
        self.policy = policy;
        self.reset();
    }

    fn assert_not_blocked(&self, time: DateTime<Utc>) -> Result<(), AuthError> {
        if self.is_access_possible(time) {
            Ok(())
        } else {
            Err(AuthError::AccessBlocked)
        }
    }
}
