//! Password strength policy
//!
//! A password is accepted when it is at least six characters long and
//! contains at least two of: a lowercase letter, an uppercase letter, a
//! digit. The maximum length (40) is enforced on the request DTOs before
//! the policy runs.

use crate::support::{DomainError, DomainResult};

pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Enforced by the request DTOs through `validator`.
pub const MAX_PASSWORD_LENGTH: u64 = 40;

/// Why a candidate password was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyRejection {
    TooShort,
    TooFewCharacterClasses,
}

/// Which password field is being checked; only the message differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordField {
    Password,
    NewPassword,
}

impl PasswordField {
    fn label(&self) -> &'static str {
        match self {
            Self::Password => "Password",
            Self::NewPassword => "New password",
        }
    }
}

pub fn classify_password(candidate: &str) -> Result<(), PolicyRejection> {
    if candidate.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PolicyRejection::TooShort);
    }

    let has_lower = candidate.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = candidate.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = candidate.chars().any(|c| c.is_ascii_digit());

    let classes = [has_lower, has_upper, has_digit]
        .iter()
        .filter(|present| **present)
        .count();

    if classes < 2 {
        return Err(PolicyRejection::TooFewCharacterClasses);
    }
    Ok(())
}

/// Run the policy and turn a rejection into a user-facing error.
pub fn enforce_password_policy(candidate: &str, field: PasswordField) -> DomainResult<()> {
    classify_password(candidate).map_err(|rejection| {
        let label = field.label();
        let msg = match rejection {
            PolicyRejection::TooShort => format!(
                "{} must be at least {} characters long",
                label, MIN_PASSWORD_LENGTH
            ),
            PolicyRejection::TooFewCharacterClasses => format!(
                "{} must contain at least two of: a lowercase letter, an uppercase letter, a digit",
                label
            ),
        };
        DomainError::PolicyViolation(msg)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_passwords_rejected() {
        for p in ["", "a", "Ab1", "Abc12"] {
            assert_eq!(classify_password(p), Err(PolicyRejection::TooShort), "{p}");
        }
    }

    #[test]
    fn test_single_class_rejected() {
        for p in ["abcdef", "ABCDEF", "123456", "!!!!!!!", "abc!!!def"] {
            assert_eq!(
                classify_password(p),
                Err(PolicyRejection::TooFewCharacterClasses),
                "{p}"
            );
        }
    }

    #[test]
    fn test_two_of_three_classes_accepted() {
        for p in ["abc123", "ABC123", "abcDEF", "Abc123", "aaaaa1", "A1!!!!"] {
            assert_eq!(classify_password(p), Ok(()), "{p}");
        }
    }

    #[test]
    fn test_messages_differ_per_field() {
        let initial = enforce_password_policy("abcdef", PasswordField::Password).unwrap_err();
        let changed = enforce_password_policy("abcdef", PasswordField::NewPassword).unwrap_err();

        assert!(initial.to_string().starts_with("Password must"));
        assert!(changed.to_string().starts_with("New password must"));
        assert!(matches!(initial, DomainError::PolicyViolation(_)));
    }
}
