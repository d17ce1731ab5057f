use chrono::TimeDelta;
use tracing::info;

use super::token_crypto::{hash_token, is_well_formed};
use super::*;

/// How long revoked or expired sessions are kept before purging.
const SESSION_RETENTION_HOURS: i64 = 24;

impl AuthService {
    /// Resolves a raw session token into the caller identity.
    ///
    /// Unknown, revoked or expired tokens are rejected with `Unauthorized`.
    /// Sessions of inactive or deleted accounts are revoked on sight. A valid
    /// session has its idle expiry extended.
    pub async fn validate_session(&self, raw_token: &str) -> AppResult<ValidatedSession> {
        let raw_token = raw_token.trim();
        if !is_well_formed(raw_token) {
            return Err(invalid_session());
        }

        let session = self
            .session_repository
            .find_by_token_hash(&hash_token(raw_token))
            .await?
            .ok_or_else(invalid_session)?;

        let now = Utc::now();
        if session.revoked_at.is_some()
            || SessionPolicy::is_expired(session.expires_at, session.absolute_expires_at, now)
        {
            return Err(invalid_session());
        }

        let user = self.user_repository.find_by_id(session.user_id).await?;
        let Some(user) = user.filter(|user| user.is_active) else {
            self.session_repository.revoke(session.id, now).await?;
            return Err(invalid_session());
        };

        let expires_at = self
            .session_policy
            .refreshed_expiry(now, session.absolute_expires_at);
        self.session_repository
            .touch(session.id, now, expires_at)
            .await?;

        Ok(ValidatedSession {
            identity: identity_for(&user, session.id),
            expires_at,
            absolute_expires_at: session.absolute_expires_at,
        })
    }

    /// Revokes the session behind a raw token. Unknown tokens are ignored.
    pub async fn logout(&self, raw_token: &str, context: ClientContext) -> AppResult<()> {
        let raw_token = raw_token.trim();
        if !is_well_formed(raw_token) {
            return Ok(());
        }

        let Some(session) = self
            .session_repository
            .find_by_token_hash(&hash_token(raw_token))
            .await?
        else {
            return Ok(());
        };

        if session.revoked_at.is_some() {
            return Ok(());
        }

        self.session_repository
            .revoke(session.id, Utc::now())
            .await?;

        let subject = self
            .user_repository
            .find_by_id(session.user_id)
            .await?
            .map(|user| user.username);
        self.record(subject, "logout", "success", &context).await
    }

    /// Deletes sessions that ended more than a day ago. Returns the number removed.
    pub async fn purge_expired_sessions(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - TimeDelta::hours(SESSION_RETENTION_HOURS);
        let removed = self.session_repository.purge_expired(cutoff).await?;
        info!(removed, "purged stale sessions");
        Ok(removed)
    }
}

fn invalid_session() -> AppError {
    AppError::Unauthorized("session is invalid or has expired".to_owned())
}
