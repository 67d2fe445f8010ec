//! Routes that require an authenticated identity.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::auth::AuthContext;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(home)).route("/home", get(home))
}

/// Echoes the name of the signed-in user.
async fn home(AuthContext { identity }: AuthContext) -> Json<Value> {
    Json(json!({ "whoami": identity.name }))
}
