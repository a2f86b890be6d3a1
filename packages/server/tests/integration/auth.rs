use serde_json::json;

use crate::common::{PASSWORD, TestApp, USERNAME, routes};

#[tokio::test]
async fn login_with_valid_credentials_returns_a_token() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": USERNAME, "password": PASSWORD}),
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["username"], USERNAME);
    assert!(res.body["token"].is_string());
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": USERNAME, "password": "wrong"}),
        )
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_with_unknown_username_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": "nobody", "password": PASSWORD}),
        )
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_requires_username_and_password_fields() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::LOGIN, &json!({"username": USERNAME}))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    let res = app
        .post_without_token(routes::LOGIN, &json!({"username": "", "password": ""}))
        .await;
    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn me_reflects_the_principal() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let res = app.get_with_token(routes::ME, &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["username"], USERNAME);

    let res = app.get_without_token(routes::ME).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn mutations_require_a_token() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::AUTHORS, &json!({"name": "Prof. Example"}))
        .await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");

    let res = app
        .patch_without_token(&routes::author(1), &json!({"name": "X"}))
        .await;
    assert_eq!(res.status, 401);

    let res = app.delete_without_token(&routes::author(1)).await;
    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn garbage_tokens_are_rejected_not_anonymous() {
    let app = TestApp::spawn().await;

    let res = app.get_with_token(routes::ITEMS, "not-a-token").await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let res = app.post_empty_with_token(routes::LOGOUT, &token).await;
    assert_eq!(res.status, 204);

    let res = app.get_with_token(routes::ME, &token).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");

    // A fresh login issues a usable token again.
    let token = app.login().await;
    let res = app.get_with_token(routes::ME, &token).await;
    assert_eq!(res.status, 200);
}
