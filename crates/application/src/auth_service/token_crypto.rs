use std::fmt::Write;

use sha2::{Digest, Sha256};

use super::*;

/// Number of random bytes in a session token.
const TOKEN_BYTES: usize = 32;

/// Generates a random session token and its SHA-256 digest.
///
/// Returns `(raw_token_hex, sha256_hash_hex)`.
pub(super) fn generate_token() -> AppResult<(String, String)> {
    let mut bytes = [0u8; TOKEN_BYTES];
    getrandom::fill(&mut bytes)
        .map_err(|error| AppError::Internal(format!("failed to generate session token: {error}")))?;

    let raw_token = to_hex(&bytes);
    let hash = hash_token(&raw_token);
    Ok((raw_token, hash))
}

/// Computes the SHA-256 digest of a token string for storage and lookup.
pub(super) fn hash_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    to_hex(&hasher.finalize())
}

/// Returns whether a presented token has the shape of an issued one.
pub(super) fn is_well_formed(raw_token: &str) -> bool {
    raw_token.len() == TOKEN_BYTES * 2 && raw_token.chars().all(|c| c.is_ascii_hexdigit())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
