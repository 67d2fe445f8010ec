use std::fmt;
use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar};
use http::Uri;
use tracing::{debug, info, warn};

use super::code::extract_code;
use super::session::{SessionCodec, SESSION_COOKIE};
use crate::models::Identity;
use crate::providers::{CodeExchange, IdentityProvider};

/// Why a request could not be authenticated.
#[derive(Debug)]
pub enum AuthError {
    /// No usable session cookie and no authorization code.
    Unauthenticated,
    /// The provider rejected the code or could not be reached.
    ExchangeFailed(String),
    /// The freshly obtained identity could not be signed.
    SessionEncoding(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unauthenticated => write!(f, "not authenticated"),
            AuthError::ExchangeFailed(e) => write!(f, "code exchange failed: {}", e),
            AuthError::SessionEncoding(e) => write!(f, "session token could not be signed: {}", e),
        }
    }
}

/// Resolves the identity behind a request: session cookie first, authorization code second.
pub struct Authenticator {
    provider: Arc<dyn IdentityProvider>,
    codec: SessionCodec,
    redirect_uri: String,
    scopes: Vec<String>,
    cookie_secure: bool,
}

impl Authenticator {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        codec: SessionCodec,
        redirect_uri: String,
        scopes: Vec<String>,
        cookie_secure: bool,
    ) -> Self {
        Authenticator {
            provider,
            codec,
            redirect_uri,
            scopes,
            cookie_secure,
        }
    }

    /// Authenticates a request.
    ///
    /// A valid session cookie wins and the provider is never contacted. Otherwise
    /// the `code` query parameter is redeemed once; on success the returned jar
    /// carries a new session cookie.
    pub async fn authenticate(
        &self,
        jar: CookieJar,
        uri: &Uri,
    ) -> Result<(CookieJar, Identity), AuthError> {
        if let Some(identity) = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| self.codec.verify(cookie.value()))
        {
            debug!("Session cookie accepted for '{}'", identity.username);
            return Ok((jar, identity));
        }

        let code = extract_code(uri).ok_or(AuthError::Unauthenticated)?;

        info!(
            "Exchanging authorization code with provider '{}'",
            self.provider.get_name()
        );
        let identity = self
            .provider
            .exchange_code(CodeExchange {
                code: &code,
                scopes: &self.scopes,
                redirect_uri: &self.redirect_uri,
            })
            .await
            .map_err(|e| {
                warn!(
                    "Provider '{}' rejected authorization code: {}",
                    self.provider.get_name(),
                    e
                );
                AuthError::ExchangeFailed(e)
            })?;

        let token = self
            .codec
            .sign(&identity)
            .map_err(|e| AuthError::SessionEncoding(e.to_string()))?;
        info!("Established session for '{}'", identity.username);

        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure);

        Ok((jar.add(cookie), identity))
    }
}
