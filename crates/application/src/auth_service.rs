//! Authentication ports and application service.
//!
//! Owns credential verification, failed-login lockout, and the lifecycle of
//! opaque session tokens. Callers only ever see the raw token once; the
//! repository stores its SHA-256 digest.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use peoplehub_core::{AppError, AppResult, Role, UserIdentity};
use peoplehub_domain::{
    EmployeeId, LockoutPolicy, SessionId, SessionPolicy, UserId, Username, validate_password,
};

use crate::{AuthEvent, AuthEventService};

mod bootstrap;
mod login;
mod password;
mod session;
mod token_crypto;


pub use bootstrap::BootstrapAdminParams;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User account returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique account identifier.
    pub id: UserId,
    /// Normalised login name.
    pub username: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Encoded salted password hash.
    pub password_hash: String,
    /// Assigned role.
    pub role: Role,
    /// Inactive accounts cannot log in.
    pub is_active: bool,
    /// Linked employee record, if any.
    pub employee_id: Option<EmployeeId>,
    /// Consecutive failed login attempts since the last success or lock.
    pub failed_login_count: i32,
    /// Account is locked until this time, if set.
    pub locked_until: Option<DateTime<Utc>>,
    /// Time of the last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Normalised login name.
    pub username: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Encoded salted password hash.
    pub password_hash: String,
    /// Assigned role.
    pub role: Role,
    /// Linked employee record, if any.
    pub employee_id: Option<EmployeeId>,
}

/// Repository port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by normalised username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Lists all accounts ordered by username.
    async fn list_users(&self) -> AppResult<Vec<UserRecord>>;

    /// Creates an account. Returns `Conflict` when the username is taken.
    async fn create(&self, user: NewUser) -> AppResult<UserId>;

    /// Replaces the stored password hash.
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;

    /// Atomically increments the failed login counter and returns the new value.
    async fn increment_failed_logins(&self, user_id: UserId) -> AppResult<i32>;

    /// Locks the account until the given time and restarts the failure counter.
    async fn lock_until(&self, user_id: UserId, locked_until: DateTime<Utc>) -> AppResult<()>;

    /// Clears failures and lock and stamps the login time.
    async fn record_successful_login(&self, user_id: UserId, at: DateTime<Utc>)
    -> AppResult<()>;

    /// Clears failures and lock without touching the login time.
    async fn clear_lockout(&self, user_id: UserId) -> AppResult<()>;

    /// Changes the account role.
    async fn update_role(&self, user_id: UserId, role: Role) -> AppResult<()>;

    /// Activates or deactivates the account.
    async fn set_active(&self, user_id: UserId, is_active: bool) -> AppResult<()>;

    /// Counts admin accounts, active or not.
    async fn count_admins(&self) -> AppResult<i64>;

    /// Inserts the account unless an admin account already exists.
    ///
    /// The check and the insert are atomic. Returns `None` when an admin exists.
    async fn create_if_no_admin(&self, user: NewUser) -> AppResult<Option<UserId>>;
}

/// Port for password hashing so the application layer stays free of
/// cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password with a freshly generated salt.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash in constant time.
    fn verify_password(&self, password: &str, stored_hash: &str) -> AppResult<bool>;
}

/// Persisted session state.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Session identifier.
    pub id: SessionId,
    /// Owning account.
    pub user_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last validated request.
    pub last_seen_at: DateTime<Utc>,
    /// Sliding idle expiry.
    pub expires_at: DateTime<Utc>,
    /// Hard expiry regardless of activity.
    pub absolute_expires_at: DateTime<Utc>,
    /// Set when the session was logged out or revoked.
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new session.
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Session identifier.
    pub id: SessionId,
    /// Owning account.
    pub user_id: UserId,
    /// SHA-256 hex digest of the raw token.
    pub token_hash: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Initial idle expiry.
    pub expires_at: DateTime<Utc>,
    /// Hard expiry.
    pub absolute_expires_at: DateTime<Utc>,
    /// Caller IP address.
    pub ip_address: Option<String>,
    /// Caller user-agent.
    pub user_agent: Option<String>,
}

/// Repository port for login sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persists a new session.
    async fn create(&self, session: NewSession) -> AppResult<()>;

    /// Finds a session by token digest, including revoked and expired ones.
    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<SessionRecord>>;

    /// Records activity and moves the idle expiry.
    async fn touch(
        &self,
        session_id: SessionId,
        last_seen_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Revokes one session. Revoking twice is a no-op.
    async fn revoke(&self, session_id: SessionId, at: DateTime<Utc>) -> AppResult<()>;

    /// Revokes every live session of a user, optionally sparing one.
    async fn revoke_all_for_user(
        &self,
        user_id: UserId,
        except: Option<SessionId>,
        at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Deletes sessions that expired or were revoked before the cutoff.
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Caller metadata captured for auth events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    /// Caller IP address.
    pub ip_address: Option<String>,
    /// Caller user-agent.
    pub user_agent: Option<String>,
}

/// Freshly issued session returned once to the client.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    /// Raw bearer token. Never persisted.
    pub token: String,
    /// Current idle expiry.
    pub expires_at: DateTime<Utc>,
    /// Hard expiry.
    pub absolute_expires_at: DateTime<Utc>,
    /// Identity bound to the session.
    pub identity: UserIdentity,
}

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Credentials accepted and a session was issued.
    Authenticated(SessionGrant),
    /// Authentication failed. The reason is only recorded in auth events.
    Failed,
}

/// Session state returned by a successful validation.
#[derive(Debug, Clone)]
pub struct ValidatedSession {
    /// Identity bound to the session.
    pub identity: UserIdentity,
    /// Idle expiry after this validation.
    pub expires_at: DateTime<Utc>,
    /// Hard expiry.
    pub absolute_expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for login, logout and session validation.
#[derive(Clone)]
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    session_repository: Arc<dyn SessionRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    auth_event_service: AuthEventService,
    lockout_policy: LockoutPolicy,
    session_policy: SessionPolicy,
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        session_repository: Arc<dyn SessionRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        auth_event_service: AuthEventService,
        lockout_policy: LockoutPolicy,
        session_policy: SessionPolicy,
    ) -> Self {
        Self {
            user_repository,
            session_repository,
            password_hasher,
            auth_event_service,
            lockout_policy,
            session_policy,
        }
    }

    async fn record(
        &self,
        subject: Option<String>,
        event_type: &str,
        outcome: &str,
        context: &ClientContext,
    ) -> AppResult<()> {
        self.auth_event_service
            .record_event(AuthEvent {
                subject,
                event_type: event_type.to_owned(),
                outcome: outcome.to_owned(),
                detail: None,
                ip_address: context.ip_address.clone(),
                user_agent: context.user_agent.clone(),
            })
            .await
    }
}

fn identity_for(user: &UserRecord, session_id: SessionId) -> UserIdentity {
    UserIdentity::new(
        user.id.as_uuid(),
        user.username.clone(),
        user.display_name.clone(),
        user.role,
        user.employee_id.map(|employee_id| employee_id.as_uuid()),
        session_id.as_uuid(),
    )
}
