//! Session identifiers and expiry rules.

use chrono::{DateTime, TimeDelta, Utc};
use peoplehub_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a persisted login session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random session identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a session identifier from an existing UUID value.
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

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Idle and absolute session timeouts.
///
/// A session expires after `idle_timeout` without activity and never outlives
/// `absolute_lifetime` from creation, whichever comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    idle_timeout: TimeDelta,
    absolute_lifetime: TimeDelta,
}

impl SessionPolicy {
    /// Creates a validated session policy.
    pub fn new(idle_timeout: TimeDelta, absolute_lifetime: TimeDelta) -> AppResult<Self> {
        if idle_timeout <= TimeDelta::zero() {
            return Err(AppError::Validation(
                "session idle timeout must be positive".to_owned(),
            ));
        }

        if absolute_lifetime < idle_timeout {
            return Err(AppError::Validation(
                "session absolute lifetime must not be shorter than the idle timeout".to_owned(),
            ));
        }

        Ok(Self {
            idle_timeout,
            absolute_lifetime,
        })
    }

    /// Returns the idle timeout.
    #[must_use]
    pub fn idle_timeout(&self) -> TimeDelta {
        self.idle_timeout
    }

    /// Returns the absolute lifetime.
    #[must_use]
    pub fn absolute_lifetime(&self) -> TimeDelta {
        self.absolute_lifetime
    }

    /// Returns `(expires_at, absolute_expires_at)` for a session created at `now`.
    #[must_use]
    pub fn initial_expiry(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let absolute_expires_at = now + self.absolute_lifetime;
        (
            self.refreshed_expiry(now, absolute_expires_at),
            absolute_expires_at,
        )
    }

    /// Returns the sliding expiry after activity at `now`, capped at the absolute expiry.
    #[must_use]
    pub fn refreshed_expiry(
        &self,
        now: DateTime<Utc>,
        absolute_expires_at: DateTime<Utc>,
    ) -> DateTime<Utc> {
        (now + self.idle_timeout).min(absolute_expires_at)
    }

    /// Returns whether a session with the given expiries is no longer usable at `now`.
    #[must_use]
    pub fn is_expired(
        expires_at: DateTime<Utc>,
        absolute_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        now >= expires_at || now >= absolute_expires_at
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            idle_timeout: TimeDelta::minutes(30),
            absolute_lifetime: TimeDelta::hours(12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_expiry_uses_idle_timeout() {
        let policy = SessionPolicy::default();
        let now = Utc::now();
        let (expires_at, absolute_expires_at) = policy.initial_expiry(now);

        assert_eq!(expires_at, now + TimeDelta::minutes(30));
        assert_eq!(absolute_expires_at, now + TimeDelta::hours(12));
    }

    #[test]
    fn refreshed_expiry_is_capped_by_absolute_lifetime() {
        let policy = SessionPolicy::default();
        let now = Utc::now();
        let absolute_expires_at = now + TimeDelta::minutes(10);

        assert_eq!(
            policy.refreshed_expiry(now, absolute_expires_at),
            absolute_expires_at
        );
    }

    #[test]
    fn session_is_expired_at_either_deadline() {
        let now = Utc::now();
        let later = now + TimeDelta::minutes(5);

        assert!(SessionPolicy::is_expired(now, later, now));
        assert!(SessionPolicy::is_expired(later, now, now));
        assert!(!SessionPolicy::is_expired(later, later, now));
    }

    #[test]
    fn absolute_lifetime_shorter_than_idle_is_rejected() {
        let policy = SessionPolicy::new(TimeDelta::hours(2), TimeDelta::hours(1));
        assert!(policy.is_err());
    }
}
