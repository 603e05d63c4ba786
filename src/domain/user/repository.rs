//! User repository abstraction

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::{User, UserInput};
use crate::domain::DomainError;

/// Persistence seam for users.
///
/// `create` and `update` are atomic units of work: implementations run
/// their uniqueness check and write inside a single transaction.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Not-found is a `None` return, never an error; callers decide
    /// whether absence is a 404.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a user. Fails with `Conflict` when the email is taken.
    async fn create(&self, input: &UserInput) -> Result<User, DomainError>;

    /// Update email and name. Fails with `NotFound` when the id is
    /// absent and `Conflict` when the email belongs to another user.
    async fn update(&self, id: i64, input: &UserInput) -> Result<User, DomainError>;

    /// Hard-delete, returning the prior record. Fails with `NotFound`
    /// when the id is absent, so a second delete of the same id fails.
    async fn delete(&self, id: i64) -> Result<User, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    /// Fetch one page ordered by id ascending
    async fn page(&self, offset: u64, limit: u32) -> Result<Vec<User>, DomainError>;
}
