// ========================
// tests/unit/gate_tests.rs
// ========================
//! Unit tests for profile authorization
use crate::test_utils::{ALICE_ID, BOB_ID};
use portal_backend_lib::auth::{authorize_view, SessionState};
use portal_common::UserId;

#[test]
fn test_owner_is_authorized() {
    let session = SessionState {
        authenticated_user: Some(ALICE_ID),
        ..SessionState::default()
    };
    assert!(authorize_view(&session, ALICE_ID));
}

#[test]
fn test_other_ids_are_refused() {
    let session = SessionState {
        authenticated_user: Some(ALICE_ID),
        ..SessionState::default()
    };
    assert!(!authorize_view(&session, BOB_ID));
    assert!(!authorize_view(&session, UserId(0)));
    assert!(!authorize_view(&session, UserId(-7)));
}

#[test]
fn test_logout_revokes_access() {
    let mut session = SessionState {
        authenticated_user: Some(ALICE_ID),
        failed_attempts: 1,
        ..SessionState::default()
    };
    session.logout();

    assert!(!authorize_view(&session, ALICE_ID));
    // Lockout bookkeeping survives a logout
    assert_eq!(session.failed_attempts, 1);
}
