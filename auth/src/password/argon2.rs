use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Produces and checks Argon2id verifiers in PHC string format. The cost
/// parameters travel inside the verifier, so verification always recomputes
/// with the parameters the verifier was created under; hashes made with an
/// older profile keep validating until rehashed.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// Generates a fresh random salt per call, so hashing the same password
    /// twice yields two different verifiers.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format verifier (algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored verifier.
    ///
    /// The underlying comparison is constant-time. A malformed verifier is
    /// reported as a mismatch rather than an error, so callers cannot
    /// distinguish a corrupt stored hash from a wrong password.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `verifier` - Stored verifier in PHC string format
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    pub fn verify(&self, password: &str, verifier: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(verifier) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
