use tracing::{info, warn};

use peoplehub_domain::USERNAME_MAX_LENGTH;

use super::token_crypto::generate_token;
use super::*;

impl AuthService {
    /// Authenticates a user with username and password.
    ///
    /// Every failure (unknown user, inactive or locked account, wrong password)
    /// returns `AuthOutcome::Failed`; the precise reason only goes to the auth
    /// event log.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        context: ClientContext,
    ) -> AppResult<AuthOutcome> {
        let Ok(username) = Username::new(username) else {
            let _ = self.password_hasher.hash_password(password);
            let subject: String = username.trim().chars().take(USERNAME_MAX_LENGTH).collect();
            self.record(
                Some(subject).filter(|subject| !subject.is_empty()),
                "login_attempt",
                "unknown_user",
                &context,
            )
            .await?;
            return Ok(AuthOutcome::Failed);
        };

        let Some(user) = self
            .user_repository
            .find_by_username(username.as_str())
            .await?
        else {
            // Hash anyway so unknown usernames take as long as known ones.
            let _ = self.password_hasher.hash_password(password);
            self.record(
                Some(username.as_str().to_owned()),
                "login_attempt",
                "unknown_user",
                &context,
            )
            .await?;
            return Ok(AuthOutcome::Failed);
        };

        let now = Utc::now();

        if !user.is_active {
            let _ = self.password_hasher.hash_password(password);
            self.record(Some(user.username.clone()), "login_attempt", "inactive", &context)
                .await?;
            return Ok(AuthOutcome::Failed);
        }

        if LockoutPolicy::is_locked(user.locked_until, now) {
            let _ = self.password_hasher.hash_password(password);
            self.record(
                Some(user.username.clone()),
                "login_attempt",
                "account_locked",
                &context,
            )
            .await?;
            return Ok(AuthOutcome::Failed);
        }

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            let failed_count = self.user_repository.increment_failed_logins(user.id).await?;
            let outcome = match self.lockout_policy.lock_until(failed_count, now) {
                Some(locked_until) => {
                    self.user_repository.lock_until(user.id, locked_until).await?;
                    warn!(
                        username = %user.username,
                        failed_count,
                        %locked_until,
                        "account locked after repeated login failures"
                    );
                    "locked_out"
                }
                None => "invalid_password",
            };

            self.record(Some(user.username.clone()), "login_attempt", outcome, &context)
                .await?;
            return Ok(AuthOutcome::Failed);
        }

        self.user_repository
            .record_successful_login(user.id, now)
            .await?;

        let grant = self.issue_session(&user, now, &context).await?;

        // The session already exists, so a lost event must not fail the login.
        if let Err(error) = self
            .record(Some(user.username.clone()), "login_attempt", "success", &context)
            .await
        {
            warn!(username = %user.username, %error, "failed to record successful login");
        }
        info!(username = %user.username, role = %user.role, "user logged in");

        Ok(AuthOutcome::Authenticated(grant))
    }

    pub(super) async fn issue_session(
        &self,
        user: &UserRecord,
        now: DateTime<Utc>,
        context: &ClientContext,
    ) -> AppResult<SessionGrant> {
        let (token, token_hash) = generate_token()?;
        let (expires_at, absolute_expires_at) = self.session_policy.initial_expiry(now);
        let session_id = SessionId::new();

        self.session_repository
            .create(NewSession {
                id: session_id,
                user_id: user.id,
                token_hash,
                created_at: now,
                expires_at,
                absolute_expires_at,
                ip_address: context.ip_address.clone(),
                user_agent: context.user_agent.clone(),
            })
            .await?;

        Ok(SessionGrant {
            token,
            expires_at,
            absolute_expires_at,
            identity: identity_for(user, session_id),
        })
    }
}
