//! Input validation helpers built on the `validator` crate

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::DomainError;

/// A single violated field: a dotted path plus a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validate a value, collecting every violated field rather than
/// stopping at the first.
pub fn check<T: Validate>(value: &T) -> Result<(), DomainError> {
    match value.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let mut issues = Vec::new();

            for (field, field_errors) in errors.field_errors() {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                    issues.push(ValidationIssue::new(field.to_string(), message));
                }
            }

            // field_errors() iterates a map; keep output deterministic
            issues.sort_by(|a, b| a.path.cmp(&b.path));

            Err(DomainError::validation(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Validate)]
    struct Form {
        #[validate(email(message = "Invalid email address"))]
        email: String,
        #[validate(length(min = 2, max = 100, message = "Must be between 2 and 100 characters"))]
        name: String,
    }

    #[test]
    fn test_valid_input_passes() {
        let form = Form {
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
        };
        assert!(check(&form).is_ok());
    }

    #[test]
    fn test_collects_all_violations() {
        let form = Form {
            email: "not-an-email".to_string(),
            name: "a".to_string(),
        };

        let err = check(&form).unwrap_err();
        let DomainError::Validation { issues } = err else {
            panic!("expected validation error");
        };

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "email");
        assert_eq!(issues[0].message, "Invalid email address");
        assert_eq!(issues[1].path, "name");
    }

    #[test]
    fn test_issue_serialization() {
        let issue = ValidationIssue::new("email", "Invalid email address");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"path\":\"email\""));
        assert!(json.contains("\"message\":\"Invalid email address\""));
    }
}
