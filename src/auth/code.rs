use axum::extract::Query;
use http::Uri;
use tracing::{debug, warn};

/// Pulls the authorization code out of the request query.
///
/// A missing or empty `code` yields `None`. Repeated `code` parameters are
/// joined in order of appearance.
pub fn extract_code(uri: &Uri) -> Option<String> {
    let Query(params) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|e| debug!("Unable to parse query string: {}", e))
        .ok()?;

    let values: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == "code")
        .map(|(_, value)| value)
        .collect();

    if values.len() > 1 {
        warn!(
            "Received {} 'code' query parameters; joining them",
            values.len()
        );
    }

    let code = values.concat();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}
