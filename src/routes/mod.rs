//! HTTP route definitions and handlers.
//!
//! Sign-in and health routes are public; everything in `home_routes` sits
//! behind the authentication middleware.

mod auth_routes;
mod health_routes;
mod home_routes;

use crate::auth::auth_middleware;
use crate::state::AppState;
use axum::middleware::from_fn_with_state;
use axum::Router;

/// Creates the application router with all configured routes.
///
/// `route_layer` only wraps the routes merged before it, so the login and
/// health routes merged afterwards stay reachable without a session.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(home_routes::routes())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
        .merge(auth_routes::routes())
        .merge(health_routes::routes())
        .with_state(state)
}
