#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde_json::Value;
use webapp_login::auth::SESSION_COOKIE;
use webapp_login::config::{extract_config, ConfigV1};
use webapp_login::models::Identity;
use webapp_login::providers::{create_identity_provider, CodeExchange, IdentityProvider};
use webapp_login::routes::create_router;
use webapp_login::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

const TEST_CONFIG: &str = r#"
client_id: "client-123"
client_secret: "shh"
tenant_id: "tenant"
jwt_token_secret: "test-secret"
website_hostname: "localhost:3000"
scheme: "http://"
logging:
  level: "debug"
  format: "console"
"#;

pub fn load_test_config() -> ConfigV1 {
    extract_config(&Figment::new().merge(Yaml::string(TEST_CONFIG)))
        .expect("Failed to parse test config YAML")
}

/// The app wired to the real Microsoft provider, pointed at `authority_host`.
pub fn build_app(authority_host: Option<&str>) -> Router {
    let mut config = load_test_config();
    if let Some(host) = authority_host {
        config.authority_host = host.to_string();
    }
    let provider = create_identity_provider(&config);
    create_router(AppState::new(Arc::new(config), provider))
}

/// The app wired to an in-process provider.
pub fn build_app_with(provider: Arc<dyn IdentityProvider>) -> Router {
    create_router(AppState::new(Arc::new(load_test_config()), provider))
}

pub fn get(path: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(token) = session {
        builder = builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token));
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// A provider answering every exchange with a fixed result and counting calls.
pub struct StaticProvider {
    pub identity: Option<Identity>,
    pub authorization_url: Option<String>,
    pub exchanges: AtomicUsize,
}

impl StaticProvider {
    pub fn new(identity: Option<Identity>, authorization_url: Option<&str>) -> Arc<Self> {
        Arc::new(StaticProvider {
            identity,
            authorization_url: authorization_url.map(str::to_string),
            exchanges: AtomicUsize::new(0),
        })
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StaticProvider {
    fn get_name(&self) -> &str {
        "static"
    }

    async fn authorization_url(&self, _: &[String], _: &str) -> Result<String, String> {
        self.authorization_url
            .clone()
            .ok_or_else(|| "authorize endpoint unavailable".to_string())
    }

    async fn exchange_code(&self, _: CodeExchange<'_>) -> Result<Identity, String> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        self.identity
            .clone()
            .ok_or_else(|| "invalid_grant".to_string())
    }
}
