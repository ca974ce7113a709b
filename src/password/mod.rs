//! Password hashing and the strength policy.
//!
//! Hashes are Argon2id in PHC string format. The policy runs at registration
//! only; login and password change accept whatever hash verification
//! accepts, so accounts created under older rules keep working.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Strength policy: at least [`MIN_PASSWORD_LENGTH`] characters with one
/// lowercase letter, one uppercase letter, one digit, and one symbol.
#[must_use]
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Hash a plaintext password with a fresh random salt.
///
/// # Errors
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?;
    Ok(hash.to_string())
}

/// Compare a plaintext password against a stored PHC hash.
///
/// Unparseable stored hashes verify as false rather than erroring; the
/// caller cannot do anything more useful with a corrupt hash than reject.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_accepts_strong_password() {
        assert!(validate_password("Str0ng!Pass"));
    }

    #[test]
    fn policy_requires_each_character_class() {
        assert!(!validate_password("str0ng!pass")); // no uppercase
        assert!(!validate_password("STR0NG!PASS")); // no lowercase
        assert!(!validate_password("Strong!Pass")); // no digit
        assert!(!validate_password("Str0ngPass")); // no symbol
    }

    #[test]
    fn policy_length_boundary() {
        assert!(!validate_password("S0r!ngs")); // 7 characters
        assert!(validate_password("S0r!ngst")); // 8 characters
    }

    #[test]
    fn hash_and_verify_round_trip() -> Result<()> {
        let hash = hash_password("Str0ng!Pass")?;
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Str0ng!Pass", &hash));
        assert!(!verify_password("Wr0ng!Pass", &hash));
        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> Result<()> {
        let first = hash_password("Str0ng!Pass")?;
        let second = hash_password("Str0ng!Pass")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn malformed_stored_hash_verifies_false() {
        assert!(!verify_password("Str0ng!Pass", "not-a-phc-string"));
    }
}
