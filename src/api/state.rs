//! Application state for shared services

use std::sync::Arc;
use std::time::Duration;

use crate::domain::session::{SessionId, SessionStore};
use crate::infrastructure::user::UserService;

/// Session cookie settings
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Cookie name
    pub name: String,
    /// Whether to set the Secure attribute
    pub secure: bool,
    /// Max-Age; matches the session TTL so browser and store expire
    /// together
    pub ttl: Duration,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "sid".to_string(),
            secure: false,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CookieConfig {
    /// Render the Set-Cookie value establishing a session
    pub fn session_cookie(&self, id: &SessionId) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.name,
            id,
            self.ttl.as_secs()
        );

        if self.secure {
            cookie.push_str("; Secure");
        }

        cookie
    }

    /// Render the Set-Cookie value clearing the session cookie
    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.name
        );

        if self.secure {
            cookie.push_str("; Secure");
        }

        cookie
    }

    /// Extract the session id from a Cookie header value, if present
    pub fn session_id_from_header(&self, header: &str) -> Option<SessionId> {
        header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;

            if name == self.name {
                SessionId::from_cookie(value)
            } else {
                None
            }
        })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub sessions: Arc<dyn SessionStore>,
    pub cookies: CookieConfig,
}

impl AppState {
    pub fn new(
        users: Arc<UserService>,
        sessions: Arc<dyn SessionStore>,
        cookies: CookieConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            cookies,
        }
    }
}
