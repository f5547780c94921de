//! Credential hashing and reset-token signing

pub mod password;
pub mod reset_token;

pub use password::{hash_password, verify_password, BCRYPT_COST, DUMMY_PASSWORD_HASH};
pub use reset_token::{
    decode_reset_token_unverified, issue_reset_token, issue_reset_token_at, verify_reset_token,
    ResetClaims, TokenError, RESET_TOKEN_TTL_MINUTES,
};
