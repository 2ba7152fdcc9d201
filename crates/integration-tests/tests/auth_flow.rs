//! Login, signup, session and password flows.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;

use store_ratings_integration_tests::{ADMIN, CUSTOMER, TestContext, expect_json};

#[tokio::test]
async fn test_login_returns_user_without_password() {
    let ctx = TestContext::new().await;
    let client = ctx.client();

    let resp = client
        .post(ctx.url("/auth/login"))
        .json(&json!({"email": CUSTOMER.0, "password": CUSTOMER.1}))
        .send()
        .await
        .unwrap();
    let user = expect_json(resp, StatusCode::OK).await;

    assert_eq!(user["id"], 2);
    assert_eq!(user["role"], "user");
    assert_eq!(user["email"], CUSTOMER.0);
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let ctx = TestContext::new().await;
    let client = ctx.client();

    let resp = client
        .post(ctx.url("/auth/login"))
        .json(&json!({"email": CUSTOMER.0, "password": "Wrong123!"}))
        .send()
        .await
        .unwrap();
    let body = expect_json(resp, StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["error"], "Invalid email or password");

    // Email matching is exact.
    let resp = client
        .post(ctx.url("/auth/login"))
        .json(&json!({"email": "JOHN@example.com", "password": CUSTOMER.1}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Nobody got logged in.
    let resp = client.get(ctx.url("/auth/session")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_blank_fields_are_validation_errors() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client()
        .post(ctx.url("/auth/login"))
        .json(&json!({"email": "", "password": "x"}))
        .send()
        .await
        .unwrap();
    let body = expect_json(resp, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["field"], "email");
}

#[tokio::test]
async fn test_session_survives_requests_until_logout() {
    let ctx = TestContext::new().await;
    let client = ctx.login(CUSTOMER).await;

    let resp = client.get(ctx.url("/auth/session")).send().await.unwrap();
    let user = expect_json(resp, StatusCode::OK).await;
    assert_eq!(user["email"], CUSTOMER.0);

    let resp = client.post(ctx.url("/auth/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client.get(ctx.url("/auth/session")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = client.get(ctx.url("/api/profile")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Logging out twice is harmless.
    let resp = client.post(ctx.url("/auth/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_signup_creates_customer_and_logs_in() {
    let ctx = TestContext::new().await;
    let client = ctx.client();

    let resp = client
        .post(ctx.url("/auth/signup"))
        .json(&json!({
            "name": "Ann",
            "email": "ann@example.com",
            "address": "12 Long Enough Road",
            "password": "Passw0rd!",
        }))
        .send()
        .await
        .unwrap();
    let user = expect_json(resp, StatusCode::CREATED).await;
    assert_eq!(user["role"], "user");
    // ID 4 stays reserved for the missing owner of store 2.
    assert_eq!(user["id"], 5);

    let resp = client.get(ctx.url("/auth/session")).send().await.unwrap();
    let session = expect_json(resp, StatusCode::OK).await;
    assert_eq!(session["email"], "ann@example.com");

    // The new account can log in from a fresh session.
    ctx.login(("ann@example.com", "Passw0rd!")).await;
}

#[tokio::test]
async fn test_signup_duplicate_email_does_not_mutate() {
    let ctx = TestContext::new().await;
    let admin = ctx.login(ADMIN).await;

    let resp = admin.get(ctx.url("/api/admin/users")).send().await.unwrap();
    let before = expect_json(resp, StatusCode::OK).await;

    let resp = ctx
        .client()
        .post(ctx.url("/auth/signup"))
        .json(&json!({
            "name": "Another John",
            "email": CUSTOMER.0,
            "address": "99 Somewhere Else",
            "password": "Passw0rd!",
        }))
        .send()
        .await
        .unwrap();
    let body = expect_json(resp, StatusCode::CONFLICT).await;
    assert_eq!(
        body["error"],
        "Email already exists. Please use a different email."
    );

    let resp = admin.get(ctx.url("/api/admin/users")).send().await.unwrap();
    let after = expect_json(resp, StatusCode::OK).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_signup_uses_signup_rules() {
    let ctx = TestContext::new().await;

    // Passes the admin password rule but lacks a digit and lowercase letter.
    let resp = ctx
        .client()
        .post(ctx.url("/auth/signup"))
        .json(&json!({
            "name": "Ann",
            "email": "ann@example.com",
            "address": "12 Long Enough Road",
            "password": "SECRET!!",
        }))
        .send()
        .await
        .unwrap();
    let body = expect_json(resp, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["field"], "password");

    let resp = ctx
        .client()
        .post(ctx.url("/auth/signup"))
        .json(&json!({
            "name": "Ann",
            "email": "ann@example.com",
            "address": "Short",
            "password": "Passw0rd!",
        }))
        .send()
        .await
        .unwrap();
    let body = expect_json(resp, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["field"], "address");
}

#[tokio::test]
async fn test_change_password() {
    let ctx = TestContext::new().await;
    let client = ctx.login(CUSTOMER).await;

    let resp = client
        .post(ctx.url("/auth/password"))
        .json(&json!({"new_password": "Newpass1!", "confirm_password": "Newpass2!"}))
        .send()
        .await
        .unwrap();
    let body = expect_json(resp, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["field"], "confirm_password");

    let resp = client
        .post(ctx.url("/auth/password"))
        .json(&json!({"new_password": "Newpass1!", "confirm_password": "Newpass1!"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ctx
        .client()
        .post(ctx.url("/auth/login"))
        .json(&json!({"email": CUSTOMER.0, "password": CUSTOMER.1}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    ctx.login((CUSTOMER.0, "Newpass1!")).await;
}

#[tokio::test]
async fn test_change_password_requires_login() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client()
        .post(ctx.url("/auth/password"))
        .json(&json!({"new_password": "Newpass1!", "confirm_password": "Newpass1!"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_of_deleted_user_is_cleared() {
    let ctx = TestContext::new().await;
    let customer = ctx.login(CUSTOMER).await;
    let admin = ctx.login(ADMIN).await;

    let resp = admin
        .delete(ctx.url("/api/admin/users/2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = customer.get(ctx.url("/auth/session")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
