//! Account request types
//!
//! Inputs are normalized (emails trimmed and lower-cased, blank optional
//! fields dropped) before `validator` checks run.

use serde::Deserialize;
use validator::Validate;

use super::password_policy::MAX_PASSWORD_LENGTH;
use crate::domain::normalize_email;

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(
        max = "MAX_PASSWORD_LENGTH",
        message = "password must be at most 40 characters"
    ))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: String,
}

impl RegisterRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            email: normalize_email(&self.email),
            name: self.name.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    pub password: Option<String>,
    #[validate(length(
        max = "MAX_PASSWORD_LENGTH",
        message = "new password must be at most 40 characters"
    ))]
    pub new_password: Option<String>,
    pub repeat_new_password: Option<String>,
    #[validate(length(max = 100, message = "name must be at most 100 characters"))]
    pub name: Option<String>,
}

impl UpdateProfileRequest {
    pub fn normalized(self) -> Self {
        Self {
            email: non_blank(self.email).map(|e| normalize_email(&e)),
            password: non_blank(self.password),
            new_password: non_blank(self.new_password),
            repeat_new_password: non_blank(self.repeat_new_password),
            name: non_blank(self.name).map(|n| n.trim().to_string()),
        }
    }

    pub fn wants_password_change(&self) -> bool {
        self.password.is_some() || self.new_password.is_some() || self.repeat_new_password.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResetRequest {
    #[validate(length(min = 1, message = "token is required"))]
    pub token: String,
    #[validate(length(
        max = "MAX_PASSWORD_LENGTH",
        message = "password must be at most 40 characters"
    ))]
    pub password: String,
    #[validate(length(
        max = "MAX_PASSWORD_LENGTH",
        message = "new password must be at most 40 characters"
    ))]
    pub new_password: String,
}
