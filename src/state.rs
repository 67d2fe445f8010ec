//! Shared application state.
//!
//! Built once at startup and only read afterwards; every field is an `Arc`
//! so cloning per request is cheap.

use std::sync::Arc;

use crate::auth::{Authenticator, SessionCodec, USER_READ_SCOPE};
use crate::config::ConfigV1;
use crate::providers::IdentityProvider;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// The identity provider client, injected so tests can substitute it.
    pub provider: Arc<dyn IdentityProvider>,
    /// Session-cookie-then-code authentication used by the middleware.
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(config: Arc<ConfigV1>, provider: Arc<dyn IdentityProvider>) -> Self {
        let authenticator = Authenticator::new(
            provider.clone(),
            SessionCodec::new(&config.jwt_token_secret, config.session.ttl_in_s),
            config.redirect_uri(),
            Self::scopes(),
            config.session.cookie_secure,
        );

        AppState {
            config,
            provider,
            authenticator: Arc::new(authenticator),
        }
    }

    /// Scopes requested from the identity provider.
    pub fn scopes() -> Vec<String> {
        vec![USER_READ_SCOPE.to_string()]
    }
}
