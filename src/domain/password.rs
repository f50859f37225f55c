//! Password value object - Domain layer password handling.
//!
//! Hashes plain text on construction so raw passwords never travel
//! past the workflow layer. Centralized Argon2 configuration.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

/// A freshly hashed password, ready for storage.
///
/// Value object - immutable, the plain text never leaves the
/// constructor.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a validation error if the password is empty.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.is_empty() {
            return Err(AppError::validation("Password must not be empty"));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Consume and return the hash string for storage.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Hash a password using Argon2.
    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Get Argon2 instance with default config.
    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

#[cfg(test)]
mod tests {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    use super::*;

    fn verifies(plain: &str, stored: &str) -> bool {
        let parsed = PasswordHash::new(stored).unwrap();
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }

    #[test]
    fn test_password_hashes_with_argon2() {
        let plain = "SecurePassword123!";
        let hash = Password::new(plain).unwrap().into_string();

        assert!(hash.starts_with("$argon2"));
        assert!(verifies(plain, &hash));
        assert!(!verifies("WrongPassword123", &hash));
    }

    #[test]
    fn test_different_passwords_different_hashes() {
        let hash1 = Password::new("Password123!").unwrap().into_string();
        let hash2 = Password::new("Password456!").unwrap().into_string();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let hash1 = Password::new(plain).unwrap().into_string();
        let hash2 = Password::new(plain).unwrap().into_string();

        // Different salts produce different hashes
        assert_ne!(hash1, hash2);
        // But both verify correctly
        assert!(verifies(plain, &hash1));
        assert!(verifies(plain, &hash2));
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = Password::new("");
        assert!(result.is_err());
    }

    #[test]
    fn test_short_password_accepted() {
        // Length rules live in the forms that collect new passwords,
        // not in the value object
        let result = Password::new("secret");
        assert!(result.is_ok());
    }
}
