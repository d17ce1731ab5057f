//! Salted SHA-256 password hasher.
//!
//! Stored format: `sha256$<salt_hex>$<digest_hex>` where the digest is
//! `SHA-256(salt || password)` and the salt is 16 bytes from the OS RNG.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::warn;

use peoplehub_application::PasswordHasher as PasswordHasherPort;
use peoplehub_core::{AppError, AppResult};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Password hasher that stores a per-password random salt next to the digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256PasswordHasher;

impl Sha256PasswordHasher {
    /// Creates a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn digest(salt: &[u8], password: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().into()
    }
}

impl PasswordHasherPort for Sha256PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let mut salt = [0_u8; SALT_LEN];
        getrandom::fill(&mut salt).map_err(|error| {
            AppError::Internal(format!("failed to generate password salt: {error}"))
        })?;

        let digest = Self::digest(&salt, password);
        Ok(format!(
            "{SCHEME}${}${}",
            hex::encode(salt),
            hex::encode(digest)
        ))
    }

    fn verify_password(&self, password: &str, stored_hash: &str) -> AppResult<bool> {
        let malformed = || {
            warn!("refusing to verify against a malformed stored password hash");
            AppError::Internal("stored password hash is malformed".to_owned())
        };

        let mut parts = stored_hash.split('$');
        let (Some(scheme), Some(salt_hex), Some(digest_hex), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        if scheme != SCHEME {
            return Err(malformed());
        }

        let salt = hex::decode(salt_hex).map_err(|_| malformed())?;
        let expected = hex::decode(digest_hex).map_err(|_| malformed())?;
        if salt.len() != SALT_LEN || expected.len() != 32 {
            return Err(malformed());
        }

        let actual = Self::digest(&salt, password);
        Ok(bool::from(actual.as_slice().ct_eq(expected.as_slice())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peoplehub_core::AppResult;

    #[test]
    fn hash_and_verify_correct_password() -> AppResult<()> {
        let hasher = Sha256PasswordHasher::new();
        let hash = hasher.hash_password("my-secret-password")?;
        assert!(hasher.verify_password("my-secret-password", &hash)?);
        Ok(())
    }

    #[test]
    fn verify_wrong_password_returns_false() -> AppResult<()> {
        let hasher = Sha256PasswordHasher::new();
        let hash = hasher.hash_password("correct-password")?;
        assert!(!hasher.verify_password("wrong-password", &hash)?);
        Ok(())
    }

    #[test]
    fn hashes_use_fresh_salt() -> AppResult<()> {
        let hasher = Sha256PasswordHasher::new();
        let first = hasher.hash_password("same-password")?;
        let second = hasher.hash_password("same-password")?;

        assert_ne!(first, second);
        let parts: Vec<&str> = first.split('$').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "sha256");
        assert_eq!(parts[1].len(), 32);
        assert_eq!(parts[2].len(), 64);
        Ok(())
    }

    #[test]
    fn verifies_hash_with_fixed_salt() -> AppResult<()> {
        let salt = [0_u8; SALT_LEN];
        let stored = format!(
            "sha256${}${}",
            hex::encode(salt),
            hex::encode(Sha256PasswordHasher::digest(&salt, "password123"))
        );

        let hasher = Sha256PasswordHasher::new();
        assert!(hasher.verify_password("password123", &stored)?);
        assert!(!hasher.verify_password("password124", &stored)?);
        Ok(())
    }

    #[test]
    fn malformed_hash_is_internal_error() {
        let hasher = Sha256PasswordHasher::new();
        for stored in [
            "",
            "sha256$zz$00",
            "argon2$00$00",
            "sha256$00000000000000000000000000000000",
            "sha256$0000$0000$extra",
        ] {
            assert!(matches!(
                hasher.verify_password("whatever", stored),
                Err(AppError::Internal(_))
            ));
        }
    }
}
