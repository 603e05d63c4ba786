//! Domain layer - entities, traits, and errors with no I/O

pub mod cache;
mod error;
pub mod pagination;
pub mod session;
pub mod user;
pub mod validation;

pub use error::DomainError;
