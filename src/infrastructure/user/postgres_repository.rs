//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};

use crate::domain::user::{User, UserInput, UserRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row))),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to acquire connection: {}", e)))?;

        find_by_email(&mut conn, email).await
    }

    async fn create(&self, input: &UserInput) -> Result<User, DomainError> {
        // The conflict check and the insert share a transaction so a
        // concurrent insert cannot slip in between; the unique index
        // backstops the race either way.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        if find_by_email(&mut tx, &input.email).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already in use",
                input.email
            )));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO users (email, name)
            VALUES ($1, $2)
            RETURNING id, email, name, created_at, updated_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &input.email, "create"))?;

        let user = row_to_user(&row);

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(user)
    }

    async fn update(&self, id: i64, input: &UserInput) -> Result<User, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let existing = sqlx::query(
            r#"
            SELECT id, email, name, created_at, updated_at
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        if existing.is_none() {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        let row = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, name = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.email)
        .bind(&input.name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &input.email, "update"))?;

        let user = row_to_user(&row);

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<User, DomainError> {
        let row = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING id, email, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        match row {
            Some(row) => Ok(row_to_user(&row)),
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as u64)
    }

    async fn page(&self, offset: u64, limit: u32) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, name, created_at, updated_at
            FROM users
            ORDER BY id
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(offset as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row));
        }

        Ok(users)
    }
}

async fn find_by_email(
    conn: &mut PgConnection,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let row = sqlx::query(
        r#"
        SELECT id, email, name, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(conn)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

    Ok(row.map(|row| row_to_user(&row)))
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_unique_violation(e: sqlx::Error, email: &str, action: &str) -> DomainError {
    let msg = e.to_string();

    if msg.contains("duplicate key") || msg.contains("unique constraint") {
        DomainError::conflict(format!("Email '{}' is already in use", email))
    } else {
        DomainError::storage(format!("Failed to {} user: {}", action, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let error = sqlx::Error::Protocol(
            "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
        );

        let mapped = map_unique_violation(error, "a@example.com", "create");
        assert!(matches!(mapped, DomainError::Conflict { .. }));
    }

    #[test]
    fn test_other_errors_map_to_storage() {
        let error = sqlx::Error::PoolTimedOut;

        let mapped = map_unique_violation(error, "a@example.com", "update");
        assert!(matches!(mapped, DomainError::Storage { .. }));
    }
}
