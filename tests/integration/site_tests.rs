// ===============================
// tests/integration/site_tests.rs
// ===============================
//! End-to-end tests of the content pages
use crate::test_utils::{setup_test_app, ALICE_PASSWORD, ALICE_USERNAME};
use axum::http::{
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    StatusCode,
};

#[tokio::test]
async fn test_static_pages() {
    let app = setup_test_app().await;
    let mut client = app.client();

    for path in ["/", "/quotes", "/sitemap", "/forum", "/downloads", "/login"] {
        let response = client.get(path).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert!(response.body.contains("href=\"/login\""), "{path}");
    }
}

#[tokio::test]
async fn test_navigation_follows_sign_in() {
    let app = setup_test_app().await;
    let mut client = app.client();

    let response = client.get("/profile").await;
    assert_eq!(response.location(), Some("/login"));

    client.login(ALICE_USERNAME, ALICE_PASSWORD).await;
    let response = client.get("/quotes").await;
    assert!(response.body.contains("href=\"/profile/7\""));
    assert!(response.body.contains("href=\"/logout\""));
}

#[tokio::test]
async fn test_comments_are_rendered_as_text() {
    let app = setup_test_app().await;
    let mut client = app.client();

    let response = client
        .post_form(
            "/comments",
            "username=mallory&comment=%3Cscript%3Ealert(1)%3C%2Fscript%3E",
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/comments"));

    let response = client.get("/comments").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("mallory"));
    assert!(response.body.contains("&lt;script&gt;alert(1)"));
    assert!(!response.body.contains("<script>alert(1)"));
}

#[tokio::test]
async fn test_comment_requires_text() {
    let app = setup_test_app().await;
    let mut client = app.client();

    let response = client.post_form("/comments", "username=mallory").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = client.get("/comments").await;
    assert!(response.body.contains("No comments yet."));
}

#[tokio::test]
async fn test_download_serves_attachment() {
    let app = setup_test_app().await;
    let mut client = app.client();

    let response = client.get("/download?file=report.pdf").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(CONTENT_TYPE), Some("application/octet-stream"));
    assert_eq!(
        response.header(CONTENT_DISPOSITION),
        Some("attachment; filename=\"report.pdf\"")
    );
    assert_eq!(response.body, "%PDF-1.4 quarterly");
}

#[tokio::test]
async fn test_download_stays_in_docs_dir() {
    let app = setup_test_app().await;
    let mut client = app.client();

    // Traversal collapses into a plain name that does not exist
    let response = client.get("/download?file=..%2F..%2Fetc%2Fpasswd").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = client.get("/download?file=missing.pdf").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = client.get("/download?file=..").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = client.get("/download").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_refuses_directories() {
    let app = setup_test_app().await;
    std::fs::create_dir(app.docs_dir.path().join("archive")).unwrap();
    let mut client = app.client();

    let response = client.get("/download?file=archive").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[cfg(unix)]
#[tokio::test]
async fn test_download_refuses_symlinks_out_of_docs_dir() {
    let app = setup_test_app().await;
    let outside = tempfile::NamedTempFile::new().unwrap();
    std::os::unix::fs::symlink(outside.path(), app.docs_dir.path().join("escape.txt")).unwrap();
    let mut client = app.client();

    let response = client.get("/download?file=escape.txt").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_redirect_allow_list() {
    let app = setup_test_app().await;
    let mut client = app.client();

    let response = client.get("/redirect?destination=%2Fquotes").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/quotes"));

    let response = client
        .get("/redirect?destination=%2Fsearch%3Fquery%3Dtrump")
        .await;
    assert_eq!(response.location(), Some("/search?query=trump"));

    for bad in [
        "https%3A%2F%2Fevil.example",
        "%2F%2Fevil.example",
        "%2Fadmin_panel",
    ] {
        let response = client.get(&format!("/redirect?destination={bad}")).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{bad}");
        assert!(response.location().is_none());
    }
}

#[tokio::test]
async fn test_search_echoes_query_as_text() {
    let app = setup_test_app().await;
    let mut client = app.client();

    let response = client
        .get("/search?query=%22%3E%3Cimg%20src%3Dx%20onerror%3Dalert(1)%3E")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("&lt;img src=x onerror=alert(1)&gt;"));
    assert!(!response.body.contains("<img src=x"));
}
