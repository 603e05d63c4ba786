//! User service
//!
//! Wraps the repository with input validation and read-through caching
//! for the paginated list.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::domain::cache::{Cache, CacheExt};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{User, UserInput, UserRepository};
use crate::domain::validation;
use crate::domain::DomainError;

/// User service coordinating the repository and the list cache
#[derive(Debug, Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    cache: Arc<dyn Cache>,
    cache_ttl: Duration,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        cache: Arc<dyn Cache>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            cache_ttl,
        }
    }

    /// Validate and create a user. Fails with Conflict if the email is
    /// already in use.
    pub async fn create(&self, input: &UserInput) -> Result<User, DomainError> {
        validation::check(input)?;

        self.repository.create(input).await
    }

    /// Fetch a user by id, failing with NotFound when absent
    pub async fn get(&self, id: i64) -> Result<User, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    /// Look up a user by email. Absence is not an error here; callers
    /// decide what None means.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.find_by_email(email).await
    }

    /// Validate and update a user. Fails with NotFound when the user
    /// does not exist and Conflict when the email belongs to another
    /// user.
    pub async fn update(&self, id: i64, input: &UserInput) -> Result<User, DomainError> {
        validation::check(input)?;

        self.repository.update(id, input).await
    }

    /// Delete a user, returning the record as it was before removal
    pub async fn delete(&self, id: i64) -> Result<User, DomainError> {
        self.repository.delete(id).await
    }

    /// Paginated user listing with read-through caching.
    ///
    /// Cache failures never fail the request; they are logged and the
    /// listing falls through to storage. Writes do not invalidate the
    /// cache, so a page can be stale for up to the configured TTL.
    pub async fn list(&self, request: PageRequest) -> Result<Page<User>, DomainError> {
        let (page, page_size) = request.normalize();
        let cache_key = list_cache_key(page, page_size);

        match self.cache.get::<Page<User>>(&cache_key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => {
                warn!(key = %cache_key, error = %e, "Cache read failed, falling back to storage");
            }
        }

        let offset = request.offset();
        let (total, users) = futures::try_join!(
            self.repository.count(),
            self.repository.page(offset, page_size)
        )?;

        let result = Page::new(users, total, page, page_size);

        if let Err(e) = self.cache.set(&cache_key, &result, self.cache_ttl).await {
            warn!(key = %cache_key, error = %e, "Cache write failed");
        }

        Ok(result)
    }
}

fn list_cache_key(page: u32, page_size: u32) -> String {
    format!("users:list:{}:{}", page, page_size)
}
