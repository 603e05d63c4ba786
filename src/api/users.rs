//! User endpoints

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::{CurrentUser, RequestMeta};
use crate::api::state::AppState;
use crate::api::types::{ApiError, IdPath, Json, Query};
use crate::domain::pagination::PageRequest;
use crate::domain::session::{SessionData, SessionId};
use crate::domain::user::{User, UserInput};
use crate::domain::validation;
use crate::infrastructure::audit::{self, AuditAction, AuditEntry};

/// Login request body
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Simple message body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /users - register a user and establish a session
pub async fn create_user(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(input): Json<UserInput>,
) -> Result<Response, ApiError> {
    let user = state.users.create(&input).await?;

    let session_id = open_session(&state, &user).await?;

    audit::record(
        AuditEntry::new(AuditAction::UserCreated)
            .user(user.id)
            .actor(user.id)
            .meta(&meta),
    );

    Ok(with_session_cookie(
        (StatusCode::CREATED, Json(user)).into_response(),
        &state,
        &session_id,
    ))
}

/// GET /users - paginated listing
pub async fn list_users(
    State(state): State<AppState>,
    _current: CurrentUser,
    Query(request): Query<PageRequest>,
) -> Result<Response, ApiError> {
    let page = state.users.list(request).await?;

    Ok(Json(page).into_response())
}

/// GET /users/me - the authenticated user
pub async fn current_user(current: CurrentUser) -> Json<User> {
    Json(current.user)
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _current: CurrentUser,
    IdPath(id): IdPath,
) -> Result<Json<User>, ApiError> {
    let user = state.users.get(id).await?;

    Ok(Json(user))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    meta: RequestMeta,
    IdPath(id): IdPath,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, ApiError> {
    let user = state.users.update(id, &input).await?;

    audit::record(
        AuditEntry::new(AuditAction::UserUpdated)
            .user(user.id)
            .actor(current.user.id)
            .meta(&meta),
    );

    Ok(Json(user))
}

/// DELETE /users/{id} - returns the record as it was before removal
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    meta: RequestMeta,
    IdPath(id): IdPath,
) -> Result<Json<User>, ApiError> {
    let user = state.users.delete(id).await?;

    audit::record(
        AuditEntry::new(AuditAction::UserDeleted)
            .user(user.id)
            .actor(current.user.id)
            .meta(&meta),
    );

    Ok(Json(user))
}

/// POST /users/login - look the user up by email and open a session
pub async fn login(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    validation::check(&request)?;

    let user = match state.users.get_by_email(&request.email).await? {
        Some(user) => user,
        None => {
            audit::record(AuditEntry::new(AuditAction::LoginFailed).meta(&meta));

            return Err(ApiError::not_found("User not found"));
        }
    };

    let session_id = open_session(&state, &user).await?;

    audit::record(
        AuditEntry::new(AuditAction::UserLogin)
            .user(user.id)
            .actor(user.id)
            .meta(&meta),
    );

    Ok(with_session_cookie(
        Json(user).into_response(),
        &state,
        &session_id,
    ))
}

/// POST /users/logout - destroy the session and clear the cookie
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
    meta: RequestMeta,
) -> Response {
    match state.sessions.delete(&current.session_id).await {
        Ok(_) => {
            audit::record(
                AuditEntry::new(AuditAction::UserLogout)
                    .user(current.user.id)
                    .actor(current.user.id)
                    .meta(&meta),
            );

            let mut response = Json(MessageResponse {
                message: "Logged out".to_string(),
            })
            .into_response();

            if let Ok(value) = state.cookies.clear_cookie().parse() {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }

            response
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to destroy session");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    message: "Could not log out".to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn open_session(state: &AppState, user: &User) -> Result<SessionId, ApiError> {
    state
        .sessions
        .create(SessionData { user_id: user.id })
        .await
        .map_err(ApiError::from)
}

fn with_session_cookie(mut response: Response, state: &AppState, id: &SessionId) -> Response {
    if let Ok(value) = state.cookies.session_cookie(id).parse() {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }

    response
}

trait AuditEntryExt {
    fn meta(self, meta: &RequestMeta) -> Self;
}

impl AuditEntryExt for AuditEntry {
    fn meta(self, meta: &RequestMeta) -> Self {
        let mut entry = self;

        if let Some(ip) = &meta.ip_address {
            entry = entry.ip_address(ip.clone());
        }

        if let Some(agent) = &meta.user_agent {
            entry = entry.user_agent(agent.clone());
        }

        if let Some(id) = &meta.request_id {
            entry = entry.request_id(id.clone());
        }

        entry
    }
}
