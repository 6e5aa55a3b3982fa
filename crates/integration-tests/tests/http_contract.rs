//! Wire contract of the authority over real HTTP: bodies, status codes and
//! `Set-Cookie` attributes.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use appsession_authority::config::{AuthorityConfig, Environment};
use appsession_authority::credentials::CredentialSeed;
use appsession_authority::state::AppState;
use appsession_integration_tests::{TestAuthority, cookie_pair, session_set_cookie};
use reqwest::{StatusCode, header};
use serde_json::{Value, json};

async fn login(
    authority: &TestAuthority,
    path: &str,
    body: &Value,
) -> (StatusCode, Option<String>, Value) {
    let response = TestAuthority::raw_client()
        .post(authority.url(path))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    let cookie = session_set_cookie(&response);
    (status, cookie, response.json().await.unwrap())
}

async fn session(authority: &TestAuthority, cookie: Option<&str>) -> (Option<String>, Value) {
    let mut request = TestAuthority::raw_client().get(authority.url("/api/auth/session"));
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let response = request.send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_set_cookie(&response);
    (cookie, response.json().await.unwrap())
}

#[tokio::test]
async fn test_phone_login_contract() {
    let authority = TestAuthority::start().await;

    let (status, cookie, body) = login(
        &authority,
        "/api/auth/login/phone",
        &json!({ "phone": "+1234567890", "otp": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "userType": "regular", "phone": "+1234567890" })
    );

    let cookie = cookie.unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_failed_logins_set_no_cookie() {
    let authority = TestAuthority::start().await;

    for (path, body, message) in [
        (
            "/api/auth/login/phone",
            json!({ "phone": "+1234567890", "otp": "000000" }),
            "Invalid phone or OTP",
        ),
        (
            "/api/auth/login/phone",
            json!({ "phone": "+15550000000", "otp": "123456" }),
            "Invalid phone or OTP",
        ),
        (
            "/api/auth/login/admin",
            json!({ "email": "admin@example.com", "password": "wrong" }),
            "Invalid email or password",
        ),
        (
            "/api/auth/login/admin",
            json!({ "email": "nobody@example.com", "password": "admin123" }),
            "Invalid email or password",
        ),
    ] {
        let (status, cookie, response) = login(&authority, path, &body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");
        assert_eq!(cookie, None, "{body}");
        assert_eq!(response, json!({ "success": false, "message": message }));
    }
}

#[tokio::test]
async fn test_cookie_round_trip_reproduces_login_claims() {
    let authority = TestAuthority::start().await;

    let (_, cookie, _) = login(
        &authority,
        "/api/auth/login/admin",
        &json!({ "email": "supervisor@example.com", "password": "super456" }),
    )
    .await;
    let (_, view) = session(&authority, Some(&cookie_pair(&cookie.unwrap()))).await;

    assert_eq!(
        view,
        json!({
            "authenticated": true,
            "userType": "admin",
            "name": "Supervisor",
            "email": "supervisor@example.com",
        })
    );
}

#[tokio::test]
async fn test_session_check_slides_expiry() {
    let authority = TestAuthority::start().await;

    let (_, cookie, _) = login(
        &authority,
        "/api/auth/login/phone",
        &json!({ "phone": "+9876543210", "otp": "654321" }),
    )
    .await;
    let cookie = cookie_pair(&cookie.unwrap());

    let (refreshed, view) = session(&authority, Some(&cookie)).await;
    assert_eq!(view["authenticated"], true);
    let refreshed = refreshed.unwrap();
    assert!(refreshed.contains("Max-Age=86400"));

    let (_, view) = session(&authority, Some(&cookie_pair(&refreshed))).await;
    assert_eq!(view["phone"], "+9876543210");
}

#[tokio::test]
async fn test_anonymous_session_check_sets_no_cookie() {
    let authority = TestAuthority::start().await;

    let (cookie, view) = session(&authority, None).await;
    assert_eq!(cookie, None);
    assert_eq!(view, json!({ "authenticated": false }));

    let (cookie, view) = session(&authority, Some("AppSession=not-a-token")).await;
    assert_eq!(cookie, None);
    assert_eq!(view, json!({ "authenticated": false }));
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let authority = TestAuthority::start().await;

    let response = TestAuthority::raw_client()
        .post(authority.url("/api/auth/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = session_set_cookie(&response).unwrap();
    assert!(cleared.starts_with("AppSession=;"));
    assert!(cleared.contains("Max-Age=0"));
    assert_eq!(response.json::<Value>().await.unwrap(), json!({ "success": true }));
}

#[tokio::test]
async fn test_production_cookie_policy() {
    let mut config = AuthorityConfig::development();
    config.environment = Environment::Production;
    config.cookie_domain = Some("auth.example.org".to_string());
    let authority = TestAuthority::with_state(AppState::from_config(config).unwrap()).await;

    let (_, cookie, _) = login(
        &authority,
        "/api/auth/login/phone",
        &json!({ "phone": "+1234567890", "otp": "123456" }),
    )
    .await;
    let cookie = cookie.unwrap();
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=None"));
    assert!(cookie.contains("Domain=auth.example.org"));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_injected_credential_store() {
    let seed = CredentialSeed::from_yaml(
        "regular:\n  \"+15551234567\": \"424242\"\nadmin:\n  ops.lead@example.org: \"s3cret-pass\"\n",
        "inline",
    )
    .unwrap();
    let (regular, admins) = seed.into_stores();
    let state = AppState::new(
        AuthorityConfig::development(),
        Arc::new(regular),
        Arc::new(admins),
    );
    let authority = TestAuthority::with_state(state).await;

    let (status, _, body) = login(
        &authority,
        "/api/auth/login/admin",
        &json!({ "email": "ops.lead@example.org", "password": "s3cret-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ops.lead");

    let (status, _, _) = login(
        &authority,
        "/api/auth/login/phone",
        &json!({ "phone": "+15551234567", "otp": "424242" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Demo credentials are not present in an injected store
    let (status, _, _) = login(
        &authority,
        "/api/auth/login/phone",
        &json!({ "phone": "+1234567890", "otp": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
