use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use tracing::{debug, error, warn};

use super::authenticator::AuthError;
use super::LOGIN_PATH;
use crate::models::Identity;
use crate::state::AppState;
use crate::utils::http_helpers::found;

/// Per-request authentication result, placed in the request extensions by
/// [`auth_middleware`] and read by handlers as an extractor.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: Identity,
}

/// Gates every route layered beneath it.
///
/// On success the identity is stored for downstream handlers and any newly
/// minted session cookie is added to their response. Requests without a
/// session or code are redirected to the login page; every other failure is
/// answered with a bare 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let result = state.authenticator.authenticate(jar, request.uri()).await;

    match result {
        Ok((jar, identity)) => {
            request.extensions_mut().insert(AuthContext { identity });
            (jar, next.run(request).await).into_response()
        }
        Err(AuthError::Unauthenticated) => {
            debug!(
                "No session for '{}', redirecting to {}",
                request.uri().path(),
                LOGIN_PATH
            );
            found(LOGIN_PATH)
        }
        Err(e) => {
            warn!("Authentication failed for '{}': {}", request.uri().path(), e);
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthContext>().cloned().ok_or_else(|| {
            error!(
                "Route '{}' reached without an authenticated identity",
                parts.uri.path()
            );
            StatusCode::FORBIDDEN
        })
    }
}
