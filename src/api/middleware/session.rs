//! Session authentication middleware

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::session::SessionId;
use crate::domain::user::User;

/// Extractor that requires a valid session cookie.
///
/// Fails closed: a missing cookie, an unknown or expired session, a
/// session pointing at a deleted user, and even a store lookup error
/// all produce the same 401. Lookup errors are logged, never surfaced
/// as a 500.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session_id: SessionId,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = || ApiError::unauthorized("Unauthorized");

        let session_id =
            extract_session_id(&parts.headers, state).ok_or_else(unauthorized)?;

        debug!(session_id = %session_id, "Resolving session");

        let data = state
            .sessions
            .get(&session_id)
            .await
            .map_err(|e| {
                warn!(error = %e, "Session lookup failed, rejecting request");
                unauthorized()
            })?
            .ok_or_else(unauthorized)?;

        // The user may have been deleted while the session was live;
        // treat a dangling session exactly like no session.
        let user = state
            .users
            .get(data.user_id)
            .await
            .map_err(|e| {
                if !matches!(e, crate::domain::DomainError::NotFound { .. }) {
                    warn!(error = %e, "User lookup failed, rejecting request");
                }
                unauthorized()
            })?;

        Ok(CurrentUser { user, session_id })
    }
}

/// Pull the session id out of the Cookie header, if any
pub fn extract_session_id(
    headers: &axum::http::HeaderMap,
    state: &AppState,
) -> Option<SessionId> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    state.cookies.session_id_from_header(cookie_header)
}
