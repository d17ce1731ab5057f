//! User account types and credential rules.

use chrono::{DateTime, TimeDelta, Utc};
use peoplehub_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Minimum username length.
pub const USERNAME_MIN_LENGTH: usize = 3;

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 64;

/// Normalised login name: lower-case ASCII letters, digits, `.`, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated, lower-cased username.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let normalized = value.into().trim().to_lowercase();
        let length = normalized.chars().count();

        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
            return Err(AppError::Validation(format!(
                "username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
            )));
        }

        if !normalized
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || "._-".contains(character))
        {
            return Err(AppError::Validation(
                "username may only contain letters, digits, '.', '_' and '-'".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalised username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Minimum password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length, long enough for passphrases.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a plaintext password for the given account.
///
/// - Length must be within [`PASSWORD_MIN_LENGTH`]..=[`PASSWORD_MAX_LENGTH`].
/// - Rejects passwords from an embedded list of common passwords.
/// - Rejects passwords equal to the username, ignoring case.
pub fn validate_password(password: &str, username: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    let lowered = password.to_lowercase();
    if lowered == username.trim().to_lowercase() {
        return Err(AppError::Validation(
            "password must not match the username".to_owned(),
        ));
    }

    if COMMON_PASSWORDS.iter().any(|entry| *entry == lowered) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

static COMMON_PASSWORDS: &[&str] = &[
    "password",
    "12345678",
    "123456789",
    "1234567890",
    "qwertyuiop",
    "iloveyou",
    "trustno1",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "superman",
    "qwerty123",
    "password1",
    "password123",
    "welcome1",
    "welcome123",
    "letmein1",
    "starwars",
    "passw0rd",
    "whatever",
    "11111111",
    "00000000",
    "abc12345",
    "admin123",
    "changeme",
    "employee",
    "company1",
];

/// Failed-login lockout rule.
///
/// After `max_failed_attempts` consecutive failures the account is locked for
/// `lockout_duration`. The counter restarts once the lock is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    max_failed_attempts: i32,
    lockout_duration: TimeDelta,
}

impl LockoutPolicy {
    /// Creates a validated lockout policy.
    pub fn new(max_failed_attempts: i32, lockout_duration: TimeDelta) -> AppResult<Self> {
        if max_failed_attempts < 1 {
            return Err(AppError::Validation(
                "max failed login attempts must be at least 1".to_owned(),
            ));
        }

        if lockout_duration <= TimeDelta::zero() {
            return Err(AppError::Validation(
                "lockout duration must be positive".to_owned(),
            ));
        }

        Ok(Self {
            max_failed_attempts,
            lockout_duration,
        })
    }

    /// Returns the number of consecutive failures that trigger a lock.
    #[must_use]
    pub fn max_failed_attempts(&self) -> i32 {
        self.max_failed_attempts
    }

    /// Returns how long a lock lasts.
    #[must_use]
    pub fn lockout_duration(&self) -> TimeDelta {
        self.lockout_duration
    }

    /// Returns the lock expiry to apply after `failed_count` consecutive failures.
    #[must_use]
    pub fn lock_until(&self, failed_count: i32, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (failed_count >= self.max_failed_attempts).then(|| now + self.lockout_duration)
    }

    /// Returns whether a stored lock is still in force.
    #[must_use]
    pub fn is_locked(locked_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        locked_until.is_some_and(|until| now < until)
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_duration: TimeDelta::minutes(15),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn username_is_normalised() {
        let username = Username::new("  J.Doe ");
        assert_eq!(username.ok().map(String::from).as_deref(), Some("j.doe"));
    }

    #[test]
    fn username_with_spaces_is_rejected() {
        assert!(Username::new("john doe").is_err());
    }

    #[test]
    fn short_username_is_rejected() {
        assert!(Username::new("jd").is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("short", "jdoe").is_err());
    }

    #[test]
    fn adequate_password_is_accepted() {
        assert!(validate_password("a-reasonable-passphrase", "jdoe").is_ok());
    }

    #[test]
    fn common_password_is_rejected() {
        assert!(validate_password("Password123", "jdoe").is_err());
    }

    #[test]
    fn password_matching_username_is_rejected() {
        assert!(validate_password("Jane.Smith", "jane.smith").is_err());
    }

    #[test]
    fn very_long_password_is_rejected() {
        let long = "a".repeat(PASSWORD_MAX_LENGTH + 1);
        assert!(validate_password(&long, "jdoe").is_err());
    }

    #[test]
    fn lockout_applies_at_threshold() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();

        assert_eq!(policy.lock_until(4, now), None);
        assert_eq!(policy.lock_until(5, now), Some(now + TimeDelta::minutes(15)));
    }

    #[test]
    fn expired_lock_is_not_in_force() {
        let now = Utc::now();
        assert!(LockoutPolicy::is_locked(Some(now + TimeDelta::seconds(1)), now));
        assert!(!LockoutPolicy::is_locked(Some(now - TimeDelta::seconds(1)), now));
        assert!(!LockoutPolicy::is_locked(None, now));
    }

    #[test]
    fn invalid_lockout_policy_is_rejected() {
        assert!(LockoutPolicy::new(0, TimeDelta::minutes(5)).is_err());
        assert!(LockoutPolicy::new(3, TimeDelta::zero()).is_err());
    }

    proptest! {
        #[test]
        fn accepted_usernames_are_lowercase(value in "[A-Za-z0-9._-]{3,64}") {
            let username = Username::new(value.clone());
            prop_assert!(username.is_ok());
            let normalized = username.map(String::from).unwrap_or_default();
            prop_assert_eq!(normalized, value.to_lowercase());
        }
    }
}
