// =====================================
// tests/integration/login_flow_tests.rs
// =====================================
//! End-to-end tests of login, lockout and profile access
use crate::test_utils::{
    setup_test_app, ALICE_CARD, ALICE_ID, ALICE_PASSWORD, ALICE_USERNAME, BOB_CARD, BOB_ID,
};
use axum::http::StatusCode;
use portal_backend_lib::auth::SessionStore;

const INVALID: &str = "Invalid credentials. Please try again.";
const LOCKED: &str = "Too many failed attempts. Try again in 1 minute.";

#[tokio::test]
async fn test_three_failures_lock_the_session() {
    let app = setup_test_app().await;
    let mut client = app.client();

    // Two wrong passwords are reported as invalid credentials
    for _ in 0..2 {
        let response = client.login(ALICE_USERNAME, "wrong").await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.body.contains(INVALID));
    }

    // The third one starts the lockout
    let response = client.login(ALICE_USERNAME, "wrong").await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(response.body.contains(LOCKED));

    // Even the right password is refused while locked
    let response = client.login(ALICE_USERNAME, ALICE_PASSWORD).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(response.body.contains(LOCKED));

    // The login page shows the notice as well
    let response = client.get("/login").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(LOCKED));

    // And the profile stays out of reach
    let response = client.get(&format!("/profile/{ALICE_ID}")).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/login"));
}

#[tokio::test]
async fn test_lockout_is_per_session() {
    let app = setup_test_app().await;
    let mut attacker = app.client();
    for _ in 0..3 {
        attacker.login(ALICE_USERNAME, "wrong").await;
    }

    // Another client is not affected
    let mut owner = app.client();
    let response = owner.login(ALICE_USERNAME, ALICE_PASSWORD).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/profile/7"));
}

#[tokio::test]
async fn test_login_shows_only_own_profile() {
    let app = setup_test_app().await;
    let mut client = app.client();

    let response = client.login(ALICE_USERNAME, ALICE_PASSWORD).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/profile/7"));
    assert!(response.set_cookie().is_some());

    // Own profile, with the success notice shown once and the card masked
    let response = client.get(&format!("/profile/{ALICE_ID}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Profile of alice"));
    assert!(response.body.contains("Login successful!"));
    assert!(response.body.contains("**** **** **** 1111"));
    assert!(!response.body.contains(ALICE_CARD));

    let response = client.get(&format!("/profile/{ALICE_ID}")).await;
    assert!(!response.body.contains("Login successful!"));

    // Someone else's profile is forbidden and leaks nothing
    let response = client.get(&format!("/profile/{BOB_ID}")).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.body.contains("You are not allowed to view this profile."));
    assert!(!response.body.contains("bob"));
    assert!(!response.body.contains(&BOB_CARD[12..]));

    // `/profile` leads to the signed-in account
    let response = client.get("/profile").await;
    assert_eq!(response.location(), Some("/profile/7"));
}

#[tokio::test]
async fn test_logout_revokes_profile_access() {
    let app = setup_test_app().await;
    let mut client = app.client();
    client.login(ALICE_USERNAME, ALICE_PASSWORD).await;

    let response = client.get("/logout").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/"));

    let response = client.get("/").await;
    assert!(response.body.contains("You were successfully logged out"));

    let response = client.get(&format!("/profile/{ALICE_ID}")).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/login"));
}

#[tokio::test]
async fn test_login_rotates_the_session_token() {
    let app = setup_test_app().await;
    let mut client = app.client();

    // A failed attempt establishes a pre-login session
    client.login(ALICE_USERNAME, "wrong").await;
    let before = client.token().unwrap().to_string();

    client.login(ALICE_USERNAME, ALICE_PASSWORD).await;
    let after = client.token().unwrap().to_string();
    assert_ne!(before, after);

    // The old token no longer names a session
    assert!(app.sessions.load(&before).await.is_none());
    let signed_in = app.sessions.load(&after).await.unwrap();
    assert_eq!(signed_in.authenticated_user, Some(ALICE_ID));
    assert_eq!(signed_in.failed_attempts, 0);

    let mut replay = app.client();
    replay.set_cookie(&format!("portal_session={before}"));
    let response = replay.get(&format!("/profile/{ALICE_ID}")).await;
    assert_eq!(response.location(), Some("/login"));
}

#[tokio::test]
async fn test_forged_cookies_are_not_adopted() {
    let app = setup_test_app().await;

    for forged in [
        "portal_session=user_id:7".to_string(),
        format!("portal_session={}", "A".repeat(43)),
    ] {
        let mut client = app.client();
        client.set_cookie(&forged);

        let response = client.get(&format!("/profile/{ALICE_ID}")).await;
        assert_eq!(response.status, StatusCode::FOUND);
        assert_eq!(response.location(), Some("/login"));

        // A fresh token replaces the presented one
        let issued = response.set_cookie().unwrap();
        assert!(!issued.starts_with(&forged));
    }
}

#[tokio::test]
async fn test_missing_field_does_not_count_as_failure() {
    let app = setup_test_app().await;
    let mut client = app.client();
    client.login(ALICE_USERNAME, "wrong").await;
    let token = client.token().unwrap().to_string();

    let response = client.post_form("/login", "username=alice").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let session = app.sessions.load(&token).await.unwrap();
    assert_eq!(session.failed_attempts, 1);
}

#[tokio::test]
async fn test_blank_password_counts_as_failure() {
    let app = setup_test_app().await;
    let mut client = app.client();
    client.login(ALICE_USERNAME, "wrong").await;
    let token = client.token().unwrap().to_string();

    let response = client.post_form("/login", "username=alice&password=%20%20").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.contains(INVALID));

    let session = app.sessions.load(&token).await.unwrap();
    assert_eq!(session.failed_attempts, 2);
}

#[tokio::test]
async fn test_store_outage_is_not_a_failed_attempt() {
    let app = setup_test_app().await;
    let mut client = app.client();
    client.login(ALICE_USERNAME, "wrong").await;
    let token = client.token().unwrap().to_string();

    app.storage.close().await;

    let response = client.login(ALICE_USERNAME, "wrong").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);

    let session = app.sessions.load(&token).await.unwrap();
    assert_eq!(session.failed_attempts, 1);
    assert!(session.lockout_until.is_none());
    assert!(session.authenticated_user.is_none());
}

#[tokio::test]
async fn test_lockout_does_not_need_the_store() {
    let app = setup_test_app().await;
    let mut client = app.client();
    for _ in 0..3 {
        client.login(ALICE_USERNAME, "wrong").await;
    }

    app.storage.close().await;

    let response = client.login(ALICE_USERNAME, ALICE_PASSWORD).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
}
