//! Password hashing utilities

use bcrypt::{hash, verify};

/// Fixed bcrypt work factor.
pub const BCRYPT_COST: u32 = 10;

/// Well-formed cost-10 hash that no account uses. Verifying against it
/// costs the same as a real check when no stored hash exists.
pub const DUMMY_PASSWORD_HASH: &str =
    "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, BCRYPT_COST)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_hash_is_verifiable() {
        assert_eq!(verify_password("Abc123", DUMMY_PASSWORD_HASH).ok(), Some(false));
    }

    #[test]
    fn test_hash_and_verify() {
        let password = "Abc123";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("Abc124", &hashed).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("Abc123").unwrap();
        let b = hash_password("Abc123").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$2b$10$"));
    }

    #[test]
    fn test_verify_against_malformed_hash_errors() {
        assert!(verify_password("Abc123", "not-a-hash").is_err());
    }
}
