//! Password hashing with bcrypt.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a plaintext password for storage.
pub fn hash_password(plain: &str) -> Result<String, BcryptError> {
    hash(plain, DEFAULT_COST)
}

/// Check a plaintext password against a stored hash.
pub fn verify_password(plain: &str, password_hash: &str) -> Result<bool, BcryptError> {
    verify(plain, password_hash)
}
