//! Trailing slash normalization

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Redirect `GET /users/` to `/users` with a 307 so method and body
/// survive the hop. The root path and configured prefixes are left
/// alone.
pub async fn trailing_slash_middleware(
    exclusions: Arc<Vec<String>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    let query = request.uri().query();

    if let Some(target) = redirect_target(path, query, &exclusions) {
        return match target.parse::<axum::http::HeaderValue>() {
            Ok(location) => (
                StatusCode::TEMPORARY_REDIRECT,
                [(header::LOCATION, location)],
            )
                .into_response(),
            Err(_) => StatusCode::BAD_REQUEST.into_response(),
        };
    }

    next.run(request).await
}

/// Compute the redirect target for a path with a trailing slash, or
/// None when the request should pass through untouched
pub fn redirect_target(path: &str, query: Option<&str>, exclusions: &[String]) -> Option<String> {
    if path == "/" || !path.ends_with('/') {
        return None;
    }

    if exclusions.iter().any(|prefix| path.starts_with(prefix)) {
        return None;
    }

    let trimmed = path.trim_end_matches('/');

    // A path of only slashes would otherwise redirect to an empty
    // Location.
    if trimmed.is_empty() {
        return None;
    }

    match query {
        Some(query) => Some(format!("{}?{}", trimmed, query)),
        None => Some(trimmed.to_string()),
    }
}
