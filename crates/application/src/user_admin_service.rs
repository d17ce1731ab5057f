//! Administrator operations on user accounts.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use peoplehub_core::{AppError, AppResult, NonEmptyString, Role, UserIdentity};
use peoplehub_domain::{EmployeeId, UserId, Username, validate_password};

use crate::{
    AuthEvent, AuthEventEntry, AuthEventService, ClientContext, NewUser, PasswordHasher,
    SessionRepository, UserRecord, UserRepository, require_role,
};


/// Input payload for account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserParams {
    /// Requested login name.
    pub username: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Initial password.
    pub password: String,
    /// Assigned role.
    pub role: Role,
    /// Linked employee record.
    pub employee_id: Option<EmployeeId>,
}

/// Application service for account administration. Every operation requires the admin role.
#[derive(Clone)]
pub struct UserAdminService {
    user_repository: Arc<dyn UserRepository>,
    session_repository: Arc<dyn SessionRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    auth_event_service: AuthEventService,
}

impl UserAdminService {
    /// Creates a new user admin service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        session_repository: Arc<dyn SessionRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        auth_event_service: AuthEventService,
    ) -> Self {
        Self {
            user_repository,
            session_repository,
            password_hasher,
            auth_event_service,
        }
    }

    /// Lists every account ordered by username.
    pub async fn list_users(&self, actor: &UserIdentity) -> AppResult<Vec<UserRecord>> {
        require_role(actor, &[Role::Admin])?;
        self.user_repository.list_users().await
    }

    /// Creates an account.
    pub async fn create_user(
        &self,
        actor: &UserIdentity,
        params: CreateUserParams,
        context: ClientContext,
    ) -> AppResult<UserRecord> {
        require_role(actor, &[Role::Admin])?;

        let username = Username::new(params.username)?;
        let display_name = NonEmptyString::new(params.display_name)?;
        validate_password(&params.password, username.as_str())?;
        let password_hash = self.password_hasher.hash_password(&params.password)?;

        let user_id = self
            .user_repository
            .create(NewUser {
                username: username.as_str().to_owned(),
                display_name: display_name.into(),
                password_hash,
                role: params.role,
                employee_id: params.employee_id,
            })
            .await?;

        info!(
            actor = actor.username(),
            username = username.as_str(),
            role = %params.role,
            "user account created"
        );
        self.record(
            actor,
            "user_created",
            format!("{} as {}", username.as_str(), params.role),
            context,
        )
        .await?;

        self.load_user(user_id).await
    }

    /// Changes the role of an account. Admins cannot demote themselves.
    pub async fn update_user_role(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        role: Role,
        context: ClientContext,
    ) -> AppResult<UserRecord> {
        require_role(actor, &[Role::Admin])?;

        if user_id.as_uuid() == actor.user_id() && role != Role::Admin {
            return Err(AppError::Conflict(
                "administrators cannot remove their own admin role".to_owned(),
            ));
        }

        let user = self.load_user(user_id).await?;
        self.user_repository.update_role(user_id, role).await?;
        self.record(
            actor,
            "user_role_changed",
            format!("{}: {} -> {role}", user.username, user.role),
            context,
        )
        .await?;

        self.load_user(user_id).await
    }

    /// Activates or deactivates an account. Deactivation revokes every session.
    pub async fn set_user_active(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        is_active: bool,
        context: ClientContext,
    ) -> AppResult<UserRecord> {
        require_role(actor, &[Role::Admin])?;

        if user_id.as_uuid() == actor.user_id() && !is_active {
            return Err(AppError::Conflict(
                "administrators cannot deactivate their own account".to_owned(),
            ));
        }

        let user = self.load_user(user_id).await?;
        self.user_repository.set_active(user_id, is_active).await?;

        let detail = if is_active {
            format!("{} activated", user.username)
        } else {
            let revoked = self
                .session_repository
                .revoke_all_for_user(user_id, None, Utc::now())
                .await?;
            info!(
                username = %user.username,
                revoked,
                "deactivated account sessions revoked"
            );
            format!("{} deactivated", user.username)
        };
        self.record(actor, "user_active_changed", detail, context)
            .await?;

        self.load_user(user_id).await
    }

    /// Clears the failed-login counter and any lock on an account.
    pub async fn unlock_user(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        context: ClientContext,
    ) -> AppResult<UserRecord> {
        require_role(actor, &[Role::Admin])?;

        let user = self.load_user(user_id).await?;
        self.user_repository.clear_lockout(user_id).await?;
        self.record(actor, "user_unlocked", user.username, context)
            .await?;

        self.load_user(user_id).await
    }

    /// Lists recent auth events, newest first.
    pub async fn list_auth_events(
        &self,
        actor: &UserIdentity,
        limit: i64,
    ) -> AppResult<Vec<AuthEventEntry>> {
        self.auth_event_service.list_recent(actor, limit).await
    }

    async fn load_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))
    }

    async fn record(
        &self,
        actor: &UserIdentity,
        event_type: &str,
        detail: String,
        context: ClientContext,
    ) -> AppResult<()> {
        self.auth_event_service
            .record_event(AuthEvent {
                subject: Some(actor.username().to_owned()),
                event_type: event_type.to_owned(),
                outcome: "success".to_owned(),
                detail: Some(detail),
                ip_address: context.ip_address,
                user_agent: context.user_agent,
            })
            .await
    }
}
