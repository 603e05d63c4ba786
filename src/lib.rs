//! User API starter
//!
//! A session-authenticated CRUD service for a user directory:
//! - PostgreSQL storage with transactional writes
//! - Redis-backed sessions with rolling expiration
//! - Cached, paginated listings
//! - Audit trail through the structured log stream

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod server;

pub use config::AppConfig;
