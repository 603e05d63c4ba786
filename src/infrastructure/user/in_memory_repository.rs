//! In-memory user repository for tests

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::{User, UserInput, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<BTreeMap<i64, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let users = self
            .users
            .lock()
            .map_err(|_| DomainError::storage("User store lock poisoned"))?;

        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self
            .users
            .lock()
            .map_err(|_| DomainError::storage("User store lock poisoned"))?;

        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, input: &UserInput) -> Result<User, DomainError> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| DomainError::storage("User store lock poisoned"))?;

        if users.values().any(|u| u.email == input.email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already in use",
                input.email
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let user = User {
            id,
            email: input.email.clone(),
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };

        users.insert(id, user.clone());

        Ok(user)
    }

    async fn update(&self, id: i64, input: &UserInput) -> Result<User, DomainError> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| DomainError::storage("User store lock poisoned"))?;

        if !users.contains_key(&id) {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        if users.values().any(|u| u.id != id && u.email == input.email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already in use",
                input.email
            )));
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        user.email = input.email.clone();
        user.name = input.name.clone();
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<User, DomainError> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| DomainError::storage("User store lock poisoned"))?;

        users
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let users = self
            .users
            .lock()
            .map_err(|_| DomainError::storage("User store lock poisoned"))?;

        Ok(users.len() as u64)
    }

    async fn page(&self, offset: u64, limit: u32) -> Result<Vec<User>, DomainError> {
        let users = self
            .users
            .lock()
            .map_err(|_| DomainError::storage("User store lock poisoned"))?;

        Ok(users
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str, name: &str) -> UserInput {
        UserInput::new(email, name)
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let a = repo.create(&input("a@example.com", "Alice")).await.unwrap();
        let b = repo.create(&input("b@example.com", "Bob")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();

        repo.create(&input("a@example.com", "Alice")).await.unwrap();
        let err = repo
            .create(&input("a@example.com", "Other"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let repo = InMemoryUserRepository::new();

        let err = repo.update(99, &input("a@example.com", "A")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_rejects_email_taken_by_other_user() {
        let repo = InMemoryUserRepository::new();

        repo.create(&input("a@example.com", "Alice")).await.unwrap();
        let b = repo.create(&input("b@example.com", "Bob")).await.unwrap();

        let err = repo
            .update(b.id, &input("a@example.com", "Bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_keeping_own_email_is_allowed() {
        let repo = InMemoryUserRepository::new();

        let a = repo.create(&input("a@example.com", "Alice")).await.unwrap();
        let updated = repo
            .update(a.id, &input("a@example.com", "Alicia"))
            .await
            .unwrap();

        assert_eq!(updated.name, "Alicia");
    }

    #[tokio::test]
    async fn test_delete_returns_prior_record() {
        let repo = InMemoryUserRepository::new();

        let a = repo.create(&input("a@example.com", "Alice")).await.unwrap();
        let removed = repo.delete(a.id).await.unwrap();

        assert_eq!(removed, a);

        let err = repo.delete(a.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_page_ordered_by_id() {
        let repo = InMemoryUserRepository::new();

        for i in 0..5 {
            repo.create(&input(&format!("u{}@example.com", i), "User"))
                .await
                .unwrap();
        }

        let page = repo.page(2, 2).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|u| u.id).collect();

        assert_eq!(ids, vec![3, 4]);
        assert_eq!(repo.count().await.unwrap(), 5);
    }
}
