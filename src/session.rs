//! Access session entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::duration_millis;
use crate::id::SessionId;
use crate::AuthError;

/// A time-boxed proof of successful authentication.
///
/// A session is created inactive, started once, renewed any number of times
/// while its activity window covers the current time, and finished at most
/// once. Finishing is terminal. At any moment the state can be queried with
/// [`is_active_at`](Session::is_active_at), which is pure and never fails.
///
/// Renewal shifts the activity window forward: after `renew(t)` the session
/// stays active until `t + duration`. The window is inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    #[serde(with = "duration_millis")]
    duration: Duration,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a new, not yet started session.
    ///
    /// # Errors
    ///
    /// Returns `SessionDurationNotPositive` unless `duration` is positive.
    pub fn new(id: SessionId, duration: Duration) -> Result<Self, AuthError> {
        if duration <= Duration::zero() {
            return Err(AuthError::SessionDurationNotPositive);
        }
        Ok(Self {
            id,
            duration,
            started_at: None,
            ended_at: None,
            updated_at: None,
        })
    }

    /// The session's identifier.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Checks whether the session is active at `time`.
    ///
    /// Active means: not finished, started, and `time` falls inside
    /// `[started_at, anchor + duration]` where the anchor is the last renewal
    /// time, falling back to the start time.
    #[must_use]
    pub fn is_active_at(&self, time: DateTime<Utc>) -> bool {
        if self.ended_at.is_some() {
            return false;
        }
        let Some(started_at) = self.started_at else {
            return false;
        };
        let anchor = self.updated_at.unwrap_or(started_at);
        let end = anchor + self.duration;
        started_at <= time && time <= end
    }

    /// Starts the session at `time`.
    ///
    /// # Errors
    ///
    /// - `SessionWasFinishedAlready` if the session has been finished.
    /// - `SessionWasActiveAlready` if the session is already active at `time`.
    pub fn start(&mut self, time: DateTime<Utc>) -> Result<(), AuthError> {
        if self.ended_at.is_some() {
            return Err(AuthError::SessionWasFinishedAlready);
        }
        if self.is_active_at(time) {
            return Err(AuthError::SessionWasActiveAlready);
        }
        self.started_at = Some(time);
        Ok(())
    }

    /// Renews the session at `time`, extending activity to `time + duration`.
    ///
    /// # Errors
    ///
    /// Returns `SessionIsNotActive` unless the session is active at `time`.
    pub fn renew(&mut self, time: DateTime<Utc>) -> Result<(), AuthError> {
        if !self.is_active_at(time) {
            return Err(AuthError::SessionIsNotActive);
        }
        self.updated_at = Some(time);
        Ok(())
    }

    /// Finishes the session at `time`. No operation is valid afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SessionIsNotActive` unless the session is active at `time`.
    pub fn finish(&mut self, time: DateTime<Utc>) -> Result<(), AuthError> {
        if !self.is_active_at(time) {
            return Err(AuthError::SessionIsNotActive);
        }
        self.ended_at = Some(time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(duration_secs: i64) -> Session {
        Session::new(SessionId::generate(), Duration::seconds(duration_secs)).unwrap()
    }

    #[test]
    fn test_duration_must_be_positive() {
        assert_eq!(
            Session::new(SessionId::generate(), Duration::zero()),
            Err(AuthError::SessionDurationNotPositive)
        );
        assert!(Session::new(SessionId::generate(), Duration::seconds(-5)).is_err());
    }

    #[test]
    fn test_new_session_is_not_active() {
        assert!(!session(10).is_active_at(Utc::now()));
    }

    #[test]
    fn test_active_window_is_inclusive() {
        let mut session = session(10);
        let t0 = Utc::now();
        session.start(t0).unwrap();

        assert!(session.is_active_at(t0));
        assert!(session.is_active_at(t0 + Duration::seconds(10)));
        assert!(!session.is_active_at(t0 + Duration::seconds(10) + Duration::milliseconds(1)));
        assert!(!session.is_active_at(t0 - Duration::milliseconds(1)));
    }

    #[test]
    fn test_double_start_fails() {
        let mut session = session(10);
        let t0 = Utc::now();
        session.start(t0).unwrap();

        assert_eq!(session.start(t0), Err(AuthError::SessionWasActiveAlready));
    }

    #[test]
    fn test_expired_session_can_be_started_again() {
        let mut session = session(10);
        let t0 = Utc::now();
        session.start(t0).unwrap();

        let later = t0 + Duration::seconds(11);
        session.start(later).unwrap();
        assert!(session.is_active_at(later));
    }

    #[test]
    fn test_renew_extends_window() {
        let mut session = session(10);
        let t0 = Utc::now();
        session.start(t0).unwrap();

        let mid = t0 + Duration::seconds(5);
        session.renew(mid).unwrap();

        assert!(session.is_active_at(mid + Duration::seconds(10)));
        assert!(!session.is_active_at(mid + Duration::seconds(11)));
    }

    #[test]
    fn test_renew_inactive_session_fails() {
        let mut session = session(10);
        let t0 = Utc::now();

        assert_eq!(session.renew(t0), Err(AuthError::SessionIsNotActive));

        session.start(t0).unwrap();
        assert_eq!(
            session.renew(t0 + Duration::seconds(11)),
            Err(AuthError::SessionIsNotActive)
        );
    }

    #[test]
    fn test_finish_ends_session() {
        let mut session = session(10);
        let t0 = Utc::now();
        session.start(t0).unwrap();
        session.finish(t0 + Duration::seconds(1)).unwrap();

        assert!(!session.is_active_at(t0 + Duration::seconds(1)));
        assert!(!session.is_active_at(t0 + Duration::seconds(2)));
    }

    #[test]
    fn test_finish_inactive_session_fails() {
        let mut session = session(10);
        assert_eq!(session.finish(Utc::now()), Err(AuthError::SessionIsNotActive));
    }

    #[test]
    fn test_finished_session_cannot_restart() {
        let mut session = session(10);
        let t0 = Utc::now();
        session.start(t0).unwrap();
        session.finish(t0).unwrap();

        assert_eq!(
            session.start(t0 + Duration::seconds(20)),
            Err(AuthError::SessionWasFinishedAlready)
        );
        assert_eq!(
            session.finish(t0 + Duration::seconds(1)),
            Err(AuthError::SessionIsNotActive)
        );
    }

    #[test]
    fn test_serde_round_trip_preserves_activity() {
        let mut session = session(10);
        let t0 = Utc::now();
        session.start(t0).unwrap();
        session.renew(t0 + Duration::seconds(3)).unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, session);
        assert!(restored.is_active_at(t0 + Duration::seconds(12)));
        assert!(!restored.is_active_at(t0 + Duration::seconds(14)));
    }
}
