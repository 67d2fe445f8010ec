mod common;

use axum::http::StatusCode;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use mockito::Server;
use serde_json::json;
use tower::ServiceExt;
use webapp_login::auth::{SessionCodec, SESSION_COOKIE};
use webapp_login::models::Identity;

use common::{
    body_json, build_app, build_app_with, get, location, set_cookies, StaticProvider, TEST_SECRET,
};

fn jane() -> Identity {
    Identity::new("Jane Doe", "jane@example.com")
}

fn jane_session() -> String {
    SessionCodec::new(TEST_SECRET, None)
        .sign(&jane())
        .expect("session token")
}

fn id_token_for_jane() -> String {
    encode(
        &Header::default(),
        &json!({
            "sub": "subject-1",
            "aud": "client-123",
            "exp": Utc::now().timestamp() + 3600,
            "name": "Jane Doe",
            "preferred_username": "jane@example.com",
        }),
        &EncodingKey::from_secret(b"issuer-key"),
    )
    .expect("id_token")
}

#[tokio::test]
async fn login_redirects_to_authorization_url() {
    let app = build_app(None);

    let response = app.oneshot(get("/login", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let url = reqwest::Url::parse(&location(&response)).expect("absolute URL");
    assert_eq!(url.host_str(), Some("login.microsoftonline.com"));
    assert_eq!(url.path(), "/tenant/oauth2/v2.0/authorize");

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("client_id".to_string(), "client-123".to_string())));
    assert!(pairs.contains(&(
        "redirect_uri".to_string(),
        "http://localhost:3000".to_string()
    )));
    let scope = pairs
        .iter()
        .find(|(k, _)| k == "scope")
        .map(|(_, v)| v.clone())
        .expect("scope parameter");
    assert!(scope.split(' ').any(|s| s == "user.read"));
}

#[tokio::test]
async fn signin_is_an_alias_for_login() {
    let provider = StaticProvider::new(None, Some("https://idp.example.com/authorize?x=1"));
    let app = build_app_with(provider);

    let response = app.oneshot(get("/signin", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://idp.example.com/authorize?x=1");
}

#[tokio::test]
async fn login_reports_unavailable_provider() {
    let provider = StaticProvider::new(None, None);
    let app = build_app_with(provider);

    let response = app.oneshot(get("/login", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Sign-in is currently unavailable");
}

#[tokio::test]
async fn home_with_valid_session_returns_name() {
    let provider = StaticProvider::new(Some(Identity::new("Other", "other")), None);
    let app = build_app_with(provider.clone());

    let response = app
        .oneshot(get("/", Some(&jane_session())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(body_json(response).await, json!({ "whoami": "Jane Doe" }));
    assert_eq!(provider.exchange_count(), 0);
}

#[tokio::test]
async fn valid_session_wins_over_code() {
    let provider = StaticProvider::new(Some(Identity::new("Other", "other")), None);
    let app = build_app_with(provider.clone());

    let response = app
        .oneshot(get("/home?code=abc", Some(&jane_session())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "whoami": "Jane Doe" }));
    assert_eq!(provider.exchange_count(), 0);
}

#[tokio::test]
async fn home_without_session_or_code_redirects_to_login() {
    let provider = StaticProvider::new(Some(jane()), None);
    let app = build_app_with(provider.clone());

    let response = app.oneshot(get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login");
    assert_eq!(provider.exchange_count(), 0);
}

#[tokio::test]
async fn tampered_session_without_code_redirects_to_login() {
    let app = build_app_with(StaticProvider::new(Some(jane()), None));
    let mut token = jane_session();
    token.push('x');

    let response = app.oneshot(get("/home", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn code_is_exchanged_and_session_cookie_set() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/tenant/oauth2/v2.0/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "access_token": "at", "id_token": id_token_for_jane() }).to_string())
        .expect(1)
        .create_async()
        .await;
    let app = build_app(Some(&server.url()));

    let response = app.oneshot(get("/?code=abc", None)).await.unwrap();

    m.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    let cookie = &cookies[0];
    assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));

    let token = cookie
        .trim_start_matches(&format!("{}=", SESSION_COOKIE))
        .split(';')
        .next()
        .unwrap();
    assert_eq!(SessionCodec::new(TEST_SECRET, None).verify(token), Some(jane()));

    assert_eq!(body_json(response).await, json!({ "whoami": "Jane Doe" }));
}

#[tokio::test]
async fn rejected_code_is_forbidden_without_cookie() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/tenant/oauth2/v2.0/token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "invalid_grant", "error_description": "bad code"}"#)
        .expect(1)
        .create_async()
        .await;
    let app = build_app(Some(&server.url()));

    let response = app.oneshot(get("/?code=abc", None)).await.unwrap();

    m.assert_async().await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn health_does_not_require_session() {
    let app = build_app(None);

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
