//! Identity module: account lifecycle & authentication
//!
//! Contains the `AccountService` which orchestrates registration, login,
//! profile updates and password resets, plus the password policy.

pub mod commands;
pub mod password_policy;
pub mod service;

pub use commands::{RedeemResetRequest, RegisterRequest, UpdateProfileRequest};
pub use password_policy::{classify_password, enforce_password_policy, PasswordField, PolicyRejection};
pub use service::{
    AccountService, INVALID_RESET_TOKEN_MESSAGE, RESET_COMPLETED_MESSAGE, RESET_REQUESTED_MESSAGE,
};
