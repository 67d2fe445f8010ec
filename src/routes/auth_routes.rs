//! Sign-in endpoint handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::{routing::get, Router};
use tracing::{debug, error};

use crate::state::AppState;
use crate::utils::http_helpers::{found, HTTPError};

/// Registers the sign-in routes. Both names are served by the same handler.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/signin", get(login))
}

/// Redirects the browser to the identity provider's authorization URL.
async fn login(State(state): State<AppState>) -> Result<Response, HTTPError> {
    let redirect_uri = state.config.redirect_uri();
    let url = state
        .provider
        .authorization_url(&AppState::scopes(), &redirect_uri)
        .await
        .map_err(|e| {
            error!(
                "Provider '{}' could not produce an authorization URL: {}",
                state.provider.get_name(),
                e
            );
            HTTPError::new(StatusCode::BAD_GATEWAY, "Sign-in is currently unavailable")
        })?;

    debug!("Redirecting to authorization URL for '{}'", redirect_uri);
    Ok(found(&url))
}
