//! Audit trail emitted through the structured log stream
//!
//! Entries are logged, not persisted: a log pipeline can filter on the
//! `audit` field to build a durable trail.

use serde_json::Value;
use tracing::info;

/// Auditable actions, tagged in SCREAMING_SNAKE_CASE for log filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserCreated,
    UserUpdated,
    UserDeleted,
    UserLogin,
    UserLogout,
    LoginFailed,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserCreated => "USER_CREATED",
            Self::UserUpdated => "USER_UPDATED",
            Self::UserDeleted => "USER_DELETED",
            Self::UserLogin => "USER_LOGIN",
            Self::UserLogout => "USER_LOGOUT",
            Self::LoginFailed => "LOGIN_FAILED",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit record: who did what to whom, from where
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub action: AuditAction,
    /// The user the action was performed on
    pub user_id: Option<i64>,
    /// The authenticated user performing the action
    pub actor_id: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
    pub details: Option<Value>,
}

impl AuditEntry {
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            user_id: None,
            actor_id: None,
            ip_address: None,
            user_agent: None,
            request_id: None,
            details: None,
        }
    }

    pub fn user(mut self, id: i64) -> Self {
        self.user_id = Some(id);
        self
    }

    pub fn actor(mut self, id: i64) -> Self {
        self.actor_id = Some(id);
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Emit an audit entry at info level with the `audit` marker field
pub fn record(entry: AuditEntry) {
    info!(
        audit = true,
        action = %entry.action,
        user_id = entry.user_id,
        actor_id = entry.actor_id,
        ip_address = entry.ip_address.as_deref(),
        user_agent = entry.user_agent.as_deref(),
        request_id = entry.request_id.as_deref(),
        details = entry.details.as_ref().map(|d| d.to_string()),
        "Audit: {}",
        entry.action
    );
}
