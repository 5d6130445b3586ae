//! Lockout and session-window scenarios at the entity level.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use keygate::{AuthError, AuthenticationPolicy, Gatekeeper, GatekeeperId, Session, SessionId};

fn gatekeeper() -> Gatekeeper {
    let policy = AuthenticationPolicy::new(Duration::seconds(2), 2, Duration::seconds(1)).unwrap();
    Gatekeeper::new(GatekeeperId::generate(), policy)
}

#[test]
fn denials_below_the_limit_do_not_block() {
    let mut gatekeeper = gatekeeper();
    let t0 = Utc::now();

    gatekeeper.deny_access(t0);
    assert!(gatekeeper.is_access_possible(t0));

    gatekeeper.deny_access(t0);
    assert!(!gatekeeper.is_access_possible(t0));
}

#[test]
fn block_lasts_from_the_most_recent_denial() {
    let mut gatekeeper = gatekeeper();
    let t0 = Utc::now();

    gatekeeper.deny_access(t0);
    gatekeeper.deny_access(t0 + Duration::milliseconds(500));

    // one second from the *second* denial, not the first
    assert!(!gatekeeper.is_access_possible(t0 + Duration::seconds(1)));
    assert!(gatekeeper.is_access_possible(t0 + Duration::milliseconds(1500)));
}

#[test]
fn two_denials_then_lift_then_allow_resets_counter() {
    let mut gatekeeper = gatekeeper();
    let t0 = Utc::now();

    gatekeeper.deny_access(t0);
    gatekeeper.deny_access(t0);
    assert!(!gatekeeper.is_access_possible(t0));

    let t1 = t0 + Duration::seconds(1);
    assert!(gatekeeper.is_access_possible(t1));

    let session = gatekeeper.allow_access(t1).unwrap();
    assert_eq!(gatekeeper.failed_attempt_count(), 0);
    assert!(gatekeeper.has_access(&session, t1));
}

#[test]
fn issuing_a_new_session_invalidates_the_old_one() {
    let mut gatekeeper = gatekeeper();
    let t0 = Utc::now();

    let first = gatekeeper.allow_access(t0).unwrap();
    assert!(gatekeeper.has_access(&first, t0));

    let second = gatekeeper.allow_access(t0 + Duration::seconds(3)).unwrap();
    assert_ne!(first, second);
    assert!(!gatekeeper.has_access(&first, t0 + Duration::seconds(3)));
}

#[test]
fn every_policy_change_invalidates_the_session() {
    let t0 = Utc::now();

    let mut gk = gatekeeper();
    let session = gk.allow_access(t0).unwrap();
    gk.change_session_duration(Duration::seconds(5)).unwrap();
    assert!(!gk.has_access(&session, t0));

    let mut gk = gatekeeper();
    let session = gk.allow_access(t0).unwrap();
    gk.change_max_failed_attempts(7).unwrap();
    assert!(!gk.has_access(&session, t0));

    let mut gk = gatekeeper();
    let session = gk.allow_access(t0).unwrap();
    gk.change_block_duration(Duration::seconds(9)).unwrap();
    assert!(!gk.has_access(&session, t0));
}

#[test]
fn use_access_renews_the_session_window() {
    let mut gatekeeper = gatekeeper();
    let t0 = Utc::now();

    let session = gatekeeper.allow_access(t0).unwrap();
    gatekeeper.use_access(t0 + Duration::seconds(1)).unwrap();

    // renewed at t0+1 with a 2s duration: active through t0+3
    assert!(gatekeeper.has_access(&session, t0 + Duration::seconds(3)));
    assert!(!gatekeeper.has_access(&session, t0 + Duration::seconds(4)));
}

#[test]
fn session_window_round_trip() {
    let t0 = Utc::now();
    let duration = Duration::seconds(10);
    let mut session = Session::new(SessionId::generate(), duration).unwrap();

    session.start(t0).unwrap();
    assert!(session.is_active_at(t0));
    assert!(session.is_active_at(t0 + duration));
    assert!(!session.is_active_at(t0 + duration + Duration::milliseconds(1)));

    let mid = t0 + Duration::seconds(5);
    session.renew(mid).unwrap();
    assert!(session.is_active_at(mid + duration));
    assert!(!session.is_active_at(mid + duration + Duration::milliseconds(1)));
}

#[test]
fn finished_session_stays_finished() {
    let t0 = Utc::now();
    let mut session = Session::new(SessionId::generate(), Duration::seconds(10)).unwrap();

    session.start(t0).unwrap();
    session.finish(t0 + Duration::seconds(1)).unwrap();

    assert!(!session.is_active_at(t0 + Duration::seconds(2)));
    assert_eq!(
        session.start(t0 + Duration::seconds(2)),
        Err(AuthError::SessionWasFinishedAlready)
    );
    assert_eq!(
        session.renew(t0 + Duration::seconds(2)),
        Err(AuthError::SessionIsNotActive)
    );
}

#[test]
fn blocked_gatekeeper_rejects_allow_and_use() {
    let mut gatekeeper = gatekeeper();
    let t0 = Utc::now();

    gatekeeper.deny_access(t0);
    gatekeeper.deny_access(t0);

    assert_eq!(gatekeeper.allow_access(t0), Err(AuthError::AccessBlocked));
    assert_eq!(gatekeeper.use_access(t0), Err(AuthError::AccessBlocked));
}

#[test]
fn zero_block_duration_never_blocks_for_long() {
    let policy = AuthenticationPolicy::new(Duration::seconds(2), 1, Duration::zero()).unwrap();
    let mut gatekeeper = Gatekeeper::new(GatekeeperId::generate(), policy);
    let t0 = Utc::now();

    gatekeeper.deny_access(t0);
    // the block window elapses immediately
    assert!(gatekeeper.is_access_possible(t0));
}
