//! User entity and its input shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The sole persisted entity: a user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Storage-generated identifier
    pub id: i64,
    /// Globally unique email address
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a user. Both operations accept the
/// same fields with the same bounds.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserInput {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 2, max = 100, message = "Must be between 2 and 100 characters"))]
    pub name: String,
}

impl UserInput {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::check;
    use crate::domain::DomainError;

    #[test]
    fn test_valid_input() {
        let input = UserInput::new("alice@example.com", "Alice");
        assert!(check(&input).is_ok());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let input = UserInput::new("alice", "Alice");
        let err = check(&input).unwrap_err();
        let DomainError::Validation { issues } = err else {
            panic!("expected validation error");
        };
        assert_eq!(issues[0].path, "email");
    }

    #[test]
    fn test_name_length_bounds() {
        assert!(check(&UserInput::new("a@b.co", "x")).is_err());
        assert!(check(&UserInput::new("a@b.co", "xy")).is_ok());
        assert!(check(&UserInput::new("a@b.co", "x".repeat(100))).is_ok());
        assert!(check(&UserInput::new("a@b.co", "x".repeat(101))).is_err());
    }

    #[test]
    fn test_user_serialization_roundtrip() {
        let user = User {
            id: 1,
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        let parsed: User = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, user);
    }
}
