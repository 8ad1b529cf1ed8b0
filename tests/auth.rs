mod common;

use axum::http::StatusCode;
use quire::domain::types::UserRole;

use common::{SESSION_COOKIE, TestClient};

#[tokio::test]
async fn login_page_keeps_local_next_only() {
    let mut client = TestClient::new();

    let response = client.get("/login?next=%2Fadmin%2Fposts%3Fpage%3D2").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("name=\"next\""));
    assert!(response.body.contains("Sign in"));

    let response = client.get("/login?next=https%3A%2F%2Fevil.example").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("name=\"next\""));
    assert!(!response.body.contains("evil.example"));
}

#[tokio::test]
async fn successful_login_opens_a_session_and_follows_next() {
    let mut client = TestClient::new();
    client
        .store
        .seed_user("writer@example.com", "Writer", UserRole::Editor)
        .await;

    let response = client
        .post_form(
            "/login",
            &[
                ("email", "  Writer@Example.com "),
                ("password", common::PASSWORD),
                ("next", "/admin/posts?page=1"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/admin/posts?page=1"));
    assert!(client.has_cookie(SESSION_COOKIE));
    assert_eq!(client.store.session_count().await, 1);

    let response = client.get("/admin/posts").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Writer (Editor)"));
}

#[tokio::test]
async fn login_without_next_lands_on_posts() {
    let mut client = TestClient::new();
    client
        .store
        .seed_user("admin@example.com", "Admin", UserRole::Admin)
        .await;

    let response = client.login("admin@example.com").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/admin/posts"));
}

#[tokio::test]
async fn offsite_next_is_ignored() {
    let mut client = TestClient::new();
    client
        .store
        .seed_user("admin@example.com", "Admin", UserRole::Admin)
        .await;

    let response = client
        .post_form(
            "/login",
            &[
                ("email", "admin@example.com"),
                ("password", common::PASSWORD),
                ("next", "//evil.example/phish"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/admin/posts"));
}

#[tokio::test]
async fn bad_credentials_are_rejected_uniformly() {
    let mut client = TestClient::new();
    client
        .store
        .seed_user("admin@example.com", "Admin", UserRole::Admin)
        .await;

    let wrong_password = client
        .post_form(
            "/login",
            &[("email", "admin@example.com"), ("password", "not the password")],
        )
        .await;
    let unknown_email = client
        .post_form(
            "/login",
            &[("email", "ghost@example.com"), ("password", common::PASSWORD)],
        )
        .await;

    for response in [&wrong_password, &unknown_email] {
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.body.contains("Invalid email or password"));
    }
    assert!(!client.has_cookie(SESSION_COOKIE));
    assert_eq!(client.store.session_count().await, 0);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let mut client = TestClient::new();
    client.sign_in_as(UserRole::Admin).await;
    assert_eq!(client.store.session_count().await, 1);

    let response = client.post_form("/logout", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));
    assert!(!client.has_cookie(SESSION_COOKIE));
    assert_eq!(client.store.session_count().await, 0);

    let response = client.get("/admin/posts").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn expired_sessions_no_longer_authenticate() {
    let mut client = TestClient::new();
    client.sign_in_as(UserRole::Admin).await;
    client.store.expire_sessions().await;

    let response = client.get("/admin/posts").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location.as_deref(),
        Some("/login?next=%2Fadmin%2Fposts")
    );
    assert_eq!(client.store.session_count().await, 0);
}

#[tokio::test]
async fn forged_session_cookie_is_ignored() {
    let mut client = TestClient::new();
    client.sign_in_as(UserRole::Admin).await;
    client.forget_cookies();

    let request = axum::http::Request::builder()
        .uri("/admin/posts")
        .header("cookie", format!("{SESSION_COOKIE}=deadbeef"))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = client.send(request).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}
