// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Salted password hashing (argon2id, PHC string format).

use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::AuthError;

/// Stand-in hash checked when a login names an unknown user, so that every
/// failed login pays for one argon2 verification.
static PLACEHOLDER_HASH: LazyLock<Result<String, AuthError>> =
    LazyLock::new(|| hash_password("placeholder-for-unknown-users"));

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::InternalError(format!("Hashing failed: {e}")))
}

/// Check a plaintext password against a stored PHC hash.
///
/// # Errors
/// `AuthError::InternalError` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::InternalError(format!("Invalid hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// The placeholder hash, built on first use.
pub fn placeholder_hash() -> Result<&'static str, AuthError> {
    PLACEHOLDER_HASH
        .as_deref()
        .map_err(|e| AuthError::InternalError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_never_equals_plaintext() {
        let hash = hash_password("password").unwrap();
        assert_ne!(hash, "password");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let first = hash_password("password").unwrap();
        let second = hash_password("password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_accepts_only_the_right_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        let result = verify_password("password", "not-a-phc-string");
        assert!(matches!(result, Err(AuthError::InternalError(_))));
    }

    #[test]
    fn placeholder_hash_is_built_once_and_rejects_guesses() {
        let first = placeholder_hash().unwrap();
        let second = placeholder_hash().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.starts_with("$argon2"));
        assert!(!verify_password("password", first).unwrap());
    }
}
