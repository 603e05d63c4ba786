//! Shared request/response types for the HTTP layer

pub mod error;
pub mod extract;

pub use error::{ApiError, ApiErrorBody};
pub use extract::{IdPath, Json, Query};
