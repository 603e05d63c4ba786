//! Route table and middleware wiring

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{
    logging_middleware, security_headers_middleware, trailing_slash_middleware,
};
use super::state::AppState;
use super::users;
use crate::config::ServerConfig;

/// Create the application router
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let exclusions = Arc::new(server.redirect_exclusions.clone());

    let user_routes = Router::new()
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/me", get(users::current_user))
        .route("/users/login", post(users::login))
        .route("/users/logout", post(users::logout))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    let router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", user_routes)
        .with_state(state)
        .layer(from_fn(logging_middleware))
        .layer(from_fn(move |request, next| {
            trailing_slash_middleware(exclusions.clone(), request, next)
        }))
        .layer(from_fn(security_headers_middleware))
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    match cors_layer(&server.cors_allowed_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS layer for the configured origins, or None when no origin is
/// allowed. Credentials are sent via the session cookie, so the origin
/// list must be explicit.
fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    if allowed_origins.is_empty() {
        return None;
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}
